//! Read-only access to config stores.
//!
//! Names are case sensitive. Values are small strings and are returned
//! whole.

mod error;

pub use error::ConfigStoreError;

use compute_abi::{ConfigStoreHandle, FfiHost, HostError, HostRuntime, HostStatus};

use crate::logging::{debug, trace};

/// Initial value buffer; the host reports the real length if it is larger.
pub const VALUE_INITIAL_LEN: usize = 8000;

/// A read-only config store.
///
/// A store that was never opened (see [`Store::unopened`]) answers every
/// lookup with [`ConfigStoreError::KeyNotFound`].
pub struct Store<R: HostRuntime = FfiHost> {
    runtime: R,
    handle: Option<ConfigStoreHandle>,
}

impl Store<FfiHost> {
    /// Open the named config store on the host.
    ///
    /// # Errors
    /// See [`Store::open_with`].
    pub fn open(name: &str) -> Result<Self, ConfigStoreError> {
        Self::open_with(FfiHost::new(), name)
    }
}

impl<R: HostRuntime> Store<R> {
    /// Open the named config store through `runtime`.
    ///
    /// # Errors
    /// - [`ConfigStoreError::StoreNotFound`]: no such store
    /// - [`ConfigStoreError::StoreNameEmpty`]
    /// - [`ConfigStoreError::StoreNameTooLong`]
    /// - [`ConfigStoreError::StoreNameInvalid`]
    pub fn open_with(runtime: R, name: &str) -> Result<Self, ConfigStoreError> {
        debug!(name, "opening config store");
        let handle = runtime
            .config_store_open(name)
            .map_err(|err| classify(err, open_status))?;
        Ok(Self {
            runtime,
            handle: Some(handle),
        })
    }

    /// A store handle that was never opened.
    #[must_use]
    pub fn unopened(runtime: R) -> Self {
        Self {
            runtime,
            handle: None,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the value of `key`.
    ///
    /// # Errors
    /// - [`ConfigStoreError::KeyNotFound`]: no such key, or the store is unopened
    /// - [`ConfigStoreError::StoreNotFound`]: the store went away after open
    pub fn get(&self, key: &str) -> Result<String, ConfigStoreError> {
        let Some(handle) = self.handle else {
            return Err(ConfigStoreError::KeyNotFound);
        };

        let mut value = vec![0u8; VALUE_INITIAL_LEN];
        let mut nwritten = 0;
        match self
            .runtime
            .config_store_get(handle, key, &mut value, &mut nwritten)
        {
            Ok(()) => {}
            Err(err) if err.status() == Some(HostStatus::Buflen) && nwritten > value.len() => {
                trace!(needed = nwritten, "config value larger than buffer");
                value.resize(nwritten, 0);
                self.runtime
                    .config_store_get(handle, key, &mut value, &mut nwritten)
                    .map_err(|err| classify(err, get_status))?;
            }
            Err(err) => return Err(classify(err, get_status)),
        }

        value.truncate(nwritten);
        String::from_utf8(value).map_err(ConfigStoreError::InvalidUtf8)
    }

    /// Whether `key` has a value.
    ///
    /// # Errors
    /// Any error of [`Store::get`] other than `KeyNotFound`.
    pub fn contains(&self, key: &str) -> Result<bool, ConfigStoreError> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(ConfigStoreError::KeyNotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl<R: HostRuntime + Default> Default for Store<R> {
    fn default() -> Self {
        Self::unopened(R::default())
    }
}

impl<R: HostRuntime> core::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store").field("handle", &self.handle).finish()
    }
}

fn open_status(status: HostStatus) -> Option<ConfigStoreError> {
    match status {
        HostStatus::Badf => Some(ConfigStoreError::StoreNotFound),
        HostStatus::None => Some(ConfigStoreError::StoreNameEmpty),
        HostStatus::Unsupported => Some(ConfigStoreError::StoreNameTooLong),
        HostStatus::Inval => Some(ConfigStoreError::StoreNameInvalid),
        _ => None,
    }
}

fn get_status(status: HostStatus) -> Option<ConfigStoreError> {
    match status {
        HostStatus::Badf => Some(ConfigStoreError::StoreNotFound),
        HostStatus::None => Some(ConfigStoreError::KeyNotFound),
        _ => None,
    }
}

fn classify(err: HostError, table: fn(HostStatus) -> Option<ConfigStoreError>) -> ConfigStoreError {
    match err.status() {
        Some(status) => {
            debug!(%status, "config store call failed");
            table(status).unwrap_or(ConfigStoreError::Unexpected(status))
        }
        None => ConfigStoreError::Transport(err),
    }
}
