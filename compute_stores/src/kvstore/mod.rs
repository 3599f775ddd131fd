//! Access to KV stores.
//!
//! KV stores hold durable key/value data that is readable and writable at
//! the edge and synchronized globally. Values are streamed: a lookup returns
//! an [`Entry`] and an insert consumes an `std::io::Read`.
//!
//! # Example
//!
//! ```no_run
//! use compute_stores::kvstore::{KvStoreError, Store};
//!
//! let store = Store::open("example-store")?;
//! store.insert("animal", &b"cat"[..])?;
//!
//! let mut entry = store.lookup("animal")?;
//! assert_eq!(entry.text()?, "cat");
//!
//! match store.lookup("plant") {
//!     Err(KvStoreError::KeyNotFound) => {}
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), KvStoreError>(())
//! ```

mod entry;
mod error;

pub use entry::{Entry, EntryReader};
pub use error::KvStoreError;

use compute_abi::{FfiHost, HostError, HostRuntime, HostStatus, KvStoreHandle};

use crate::body::Body;
use crate::logging::debug;

/// A handle to an opened KV store.
pub struct Store<R: HostRuntime = FfiHost> {
    runtime: R,
    handle: KvStoreHandle,
}

impl Store<FfiHost> {
    /// Open the named KV store on the host.
    ///
    /// # Errors
    /// [`KvStoreError::StoreNotFound`] if the host doesn't know the name.
    pub fn open(name: &str) -> Result<Self, KvStoreError> {
        Self::open_with(FfiHost::new(), name)
    }
}

impl<R: HostRuntime + Clone> Store<R> {
    /// Open the named KV store through `runtime`.
    ///
    /// # Errors
    /// [`KvStoreError::StoreNotFound`] if the host doesn't know the name.
    pub fn open_with(runtime: R, name: &str) -> Result<Self, KvStoreError> {
        debug!(name, "opening kv store");
        let handle = runtime
            .kv_open(name)
            .map_err(|err| classify(err, open_status))?;
        Ok(Self { runtime, handle })
    }

    /// Fetch a key.
    ///
    /// # Errors
    /// [`KvStoreError::KeyNotFound`] if the key doesn't exist,
    /// [`KvStoreError::InvalidKey`] if the host rejects it.
    pub fn lookup(&self, key: &str) -> Result<Entry<R>, KvStoreError> {
        let body = self
            .runtime
            .kv_lookup(self.handle, key)
            .map_err(|err| classify(err, lookup_status))?;
        Ok(Entry::new(Body::from_handle(self.runtime.clone(), body)))
    }

    /// Store the contents of `value` under `key`.
    ///
    /// `value` is read once to the end and streamed to the host in chunks.
    ///
    /// # Errors
    /// [`KvStoreError::InvalidKey`] if the host rejects the key. A failure
    /// reading `value` is returned as [`KvStoreError::Transport`].
    pub fn insert(&self, key: &str, value: impl std::io::Read) -> Result<(), KvStoreError> {
        let mut body =
            Body::new(self.runtime.clone()).map_err(|err| classify(err, insert_status))?;
        body.fill_from(value)
            .map_err(|err| classify(err, insert_status))?;

        let Some(handle) = body.handle() else {
            return Err(KvStoreError::Unexpected(HostStatus::Badf));
        };
        // The host takes the body only on success.
        self.runtime
            .kv_insert(self.handle, key, handle)
            .map_err(|err| classify(err, insert_status))?;
        body.release();
        Ok(())
    }

    /// Remove a key.
    ///
    /// # Errors
    /// [`KvStoreError::KeyNotFound`] if the key doesn't exist,
    /// [`KvStoreError::InvalidKey`] if the host rejects it.
    pub fn delete(&self, key: &str) -> Result<(), KvStoreError> {
        self.runtime
            .kv_delete(self.handle, key)
            .map_err(|err| classify(err, delete_status))
    }
}

impl<R: HostRuntime> core::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store").field("handle", &self.handle).finish()
    }
}

fn open_status(status: HostStatus) -> Option<KvStoreError> {
    match status {
        HostStatus::Inval => Some(KvStoreError::StoreNotFound),
        _ => None,
    }
}

fn lookup_status(status: HostStatus) -> Option<KvStoreError> {
    match status {
        HostStatus::None => Some(KvStoreError::KeyNotFound),
        HostStatus::Inval => Some(KvStoreError::InvalidKey),
        _ => None,
    }
}

fn insert_status(status: HostStatus) -> Option<KvStoreError> {
    match status {
        HostStatus::Inval => Some(KvStoreError::InvalidKey),
        _ => None,
    }
}

fn delete_status(status: HostStatus) -> Option<KvStoreError> {
    lookup_status(status)
}

/// Map a host failure through an operation's status table.
///
/// Statuses the table doesn't name become [`KvStoreError::Unexpected`];
/// failures without a status are passed through.
fn classify(err: HostError, table: fn(HostStatus) -> Option<KvStoreError>) -> KvStoreError {
    match err.status() {
        Some(status) => {
            debug!(%status, "kv store call failed");
            table(status).unwrap_or(KvStoreError::Unexpected(status))
        }
        None => KvStoreError::Transport(err),
    }
}
