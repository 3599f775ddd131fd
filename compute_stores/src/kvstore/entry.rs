use std::io::Cursor;
use std::str::Utf8Error;

use compute_abi::{FfiHost, HostRuntime};

use super::{classify, KvStoreError};
use crate::body::Body;

enum EntryState<R: HostRuntime> {
    Streaming(Body<R>),
    Buffered(String),
    Raw(Vec<u8>, Utf8Error),
    Poisoned,
}

/// A looked-up KV store value.
///
/// The value is a single-pass stream. Read it either incrementally through
/// [`Entry::into_reader`], or at once through [`Entry::text`] (cached) or
/// [`Entry::into_bytes`]. Large values may exceed the per-request memory
/// limit when buffered.
pub struct Entry<R: HostRuntime = FfiHost> {
    state: EntryState<R>,
}

impl<R: HostRuntime> Entry<R> {
    pub(crate) fn new(body: Body<R>) -> Self {
        Self {
            state: EntryState::Streaming(body),
        }
    }

    /// Drain the value and return it as a string.
    ///
    /// The first call reads the whole stream; later calls return the same
    /// string without touching the host.
    ///
    /// # Errors
    /// A failed read is returned and the entry is unusable afterwards
    /// ([`KvStoreError::EntryPoisoned`] on later calls). Non UTF-8 content is
    /// [`KvStoreError::InvalidUtf8`]; the bytes stay available through
    /// [`Entry::into_bytes`] and [`Entry::into_reader`].
    pub fn text(&mut self) -> Result<&str, KvStoreError> {
        let state = std::mem::replace(&mut self.state, EntryState::Poisoned);
        self.state = match state {
            EntryState::Streaming(mut body) => {
                let bytes = drain(&mut body)?;
                match String::from_utf8(bytes) {
                    Ok(text) => EntryState::Buffered(text),
                    Err(err) => {
                        let utf8_error = err.utf8_error();
                        EntryState::Raw(err.into_bytes(), utf8_error)
                    }
                }
            }
            other => other,
        };

        match &self.state {
            EntryState::Buffered(text) => Ok(text.as_str()),
            EntryState::Raw(_, utf8_error) => Err(KvStoreError::InvalidUtf8(*utf8_error)),
            EntryState::Streaming(_) | EntryState::Poisoned => Err(KvStoreError::EntryPoisoned),
        }
    }

    /// Drain the value as raw bytes.
    ///
    /// # Errors
    /// Returns the read failure, or [`KvStoreError::EntryPoisoned`].
    pub fn into_bytes(self) -> Result<Vec<u8>, KvStoreError> {
        match self.state {
            EntryState::Streaming(mut body) => drain(&mut body),
            EntryState::Buffered(text) => Ok(text.into_bytes()),
            EntryState::Raw(bytes, _) => Ok(bytes),
            EntryState::Poisoned => Err(KvStoreError::EntryPoisoned),
        }
    }

    /// Turn the entry into a reader.
    ///
    /// If [`Entry::text`] already drained the stream, the reader yields the
    /// cached bytes.
    ///
    /// # Errors
    /// [`KvStoreError::EntryPoisoned`] if an earlier read failed.
    pub fn into_reader(self) -> Result<EntryReader<R>, KvStoreError> {
        let source = match self.state {
            EntryState::Streaming(body) => ReaderSource::Body(body),
            EntryState::Buffered(text) => ReaderSource::Buffered(Cursor::new(text.into_bytes())),
            EntryState::Raw(bytes, _) => ReaderSource::Buffered(Cursor::new(bytes)),
            EntryState::Poisoned => return Err(KvStoreError::EntryPoisoned),
        };
        Ok(EntryReader { source })
    }
}

fn drain<R: HostRuntime>(body: &mut Body<R>) -> Result<Vec<u8>, KvStoreError> {
    body.read_all().map_err(|err| classify(err, |_| None))
}

impl<R: HostRuntime> core::fmt::Debug for Entry<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = match &self.state {
            EntryState::Streaming(_) => "streaming",
            EntryState::Buffered(_) => "buffered",
            EntryState::Raw(..) => "raw",
            EntryState::Poisoned => "poisoned",
        };
        f.debug_struct("Entry").field("state", &state).finish()
    }
}

enum ReaderSource<R: HostRuntime> {
    Body(Body<R>),
    Buffered(Cursor<Vec<u8>>),
}

/// Incremental reader over an [`Entry`].
pub struct EntryReader<R: HostRuntime = FfiHost> {
    source: ReaderSource<R>,
}

impl<R: HostRuntime> std::io::Read for EntryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.source {
            ReaderSource::Body(body) => std::io::Read::read(body, buf),
            ReaderSource::Buffered(cursor) => std::io::Read::read(cursor, buf),
        }
    }
}

impl<R: HostRuntime> core::fmt::Debug for EntryReader<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.source {
            ReaderSource::Body(body) => f.debug_tuple("EntryReader").field(body).finish(),
            ReaderSource::Buffered(cursor) => f
                .debug_struct("EntryReader")
                .field("buffered", &cursor.get_ref().len())
                .finish(),
        }
    }
}
