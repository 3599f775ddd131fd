//! Host byte streams.
//!
//! `Body` owns a host body handle and closes it on drop. It implements both
//! [`embedded_io::Read`]/[`embedded_io::Write`] and the `std::io` traits.
//!
//! # Example
//! ```no_run
//! use compute_abi::FfiHost;
//! use compute_stores::Body;
//! use std::io::Write;
//!
//! let mut body = Body::new(FfiHost::new()).unwrap();
//! body.write_all(b"Hello, world!").unwrap();
//! body.close().unwrap();
//! ```

use compute_abi::{BodyHandle, HostError, HostRuntime};

use crate::error_mapping::{host_error_kind, host_error_to_io};
use crate::logging::trace;

/// Size of the copy buffer used when draining or filling a body.
pub const CHUNK_SIZE: usize = 4096;

pub struct Body<R: HostRuntime> {
    runtime: R,
    handle: Option<BodyHandle>,
}

impl<R: HostRuntime> Body<R> {
    /// Create an empty host body.
    ///
    /// # Errors
    /// Returns the host error if the body could not be created.
    pub fn new(runtime: R) -> Result<Self, HostError> {
        let handle = runtime.body_new()?;
        Ok(Self::from_handle(runtime, handle))
    }

    /// Take ownership of a body handle returned by the host.
    #[must_use]
    pub fn from_handle(runtime: R, handle: BodyHandle) -> Self {
        Self {
            runtime,
            handle: Some(handle),
        }
    }

    /// The handle, or `None` once closed.
    #[must_use]
    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    /// Forget the handle without closing it, once the host has taken it.
    pub(crate) fn release(mut self) {
        self.handle = None;
    }

    /// Close the body.
    /// Can be called multiple times.
    /// "drop" will call "close" automatically.
    ///
    /// # Errors
    /// Returns an error if closing fails.
    pub fn close(&mut self) -> Result<(), HostError> {
        if let Some(handle) = self.handle {
            self.runtime.body_close(handle)?;
            self.handle = None;
        }
        Ok(())
    }

    /// Read the next chunk. Zero means end of stream or a closed body.
    ///
    /// # Errors
    /// Returns the host error of the read.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, HostError> {
        let Some(handle) = self.handle else {
            return Ok(0);
        };
        self.runtime.body_read(handle, buf)
    }

    /// Append a chunk, returns how much the host took.
    ///
    /// # Errors
    /// Returns the host error of the write.
    pub fn write_chunk(&mut self, buf: &[u8]) -> Result<usize, HostError> {
        let Some(handle) = self.handle else {
            return Ok(0);
        };
        self.runtime.body_write(handle, buf)
    }

    /// Read everything that is left.
    ///
    /// # Errors
    /// Returns the first host error; the bytes read before it are dropped.
    pub fn read_all(&mut self) -> Result<Vec<u8>, HostError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = self.read_chunk(&mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        trace!(bytes = out.len(), "drained body");
        Ok(out)
    }

    /// Copy `source` into the body until the source is exhausted.
    ///
    /// # Errors
    /// A failure reading `source` is returned as [`HostError::Io`] unchanged.
    /// A host that stops taking bytes is reported as `WriteZero`.
    pub fn fill_from(&mut self, mut source: impl std::io::Read) -> Result<u64, HostError> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HostError::Io(e)),
            };

            let mut written = 0;
            while written < n {
                let m = self.write_chunk(&chunk[written..n])?;
                if m == 0 {
                    return Err(HostError::Io(std::io::ErrorKind::WriteZero.into()));
                }
                written += m;
            }
            total += n as u64;
        }
        trace!(bytes = total, "filled body");
        Ok(total)
    }
}

impl<R: HostRuntime> Drop for Body<R> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl<R: HostRuntime> embedded_io::ErrorType for Body<R> {
    type Error = embedded_io::ErrorKind;
}

impl<R: HostRuntime> embedded_io::Read for Body<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read_chunk(buf).map_err(|e| host_error_kind(&e))
    }
}

impl<R: HostRuntime> embedded_io::Write for Body<R> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_chunk(buf).map_err(|e| host_error_kind(&e))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<R: HostRuntime> std::io::Read for Body<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_chunk(buf).map_err(host_error_to_io)
    }
}

impl<R: HostRuntime> std::io::Write for Body<R> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_chunk(buf).map_err(host_error_to_io)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<R: HostRuntime> core::fmt::Debug for Body<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Body").field("handle", &self.handle).finish()
    }
}
