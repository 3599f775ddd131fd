use crate::{BodyHandle, ConfigStoreHandle, HostError, KvStoreHandle};

/// Trait for host runtime operations.
/// Provides an abstraction layer over the raw host imports.
/// This allows for both the FFI implementation (wasm guest) and in-process
/// implementations (testing).
pub trait HostRuntime {
    /// Open a KV store by name
    ///
    /// # Errors
    /// Host status or transport failure.
    fn kv_open(&self, name: &str) -> Result<KvStoreHandle, HostError>;

    /// Look up a key, returning a body with the value
    ///
    /// # Errors
    /// Host status or transport failure.
    fn kv_lookup(&self, store: KvStoreHandle, key: &str) -> Result<BodyHandle, HostError>;

    /// Store the contents of `body` under `key`. The host takes the body.
    ///
    /// # Errors
    /// Host status or transport failure.
    fn kv_insert(&self, store: KvStoreHandle, key: &str, body: BodyHandle)
        -> Result<(), HostError>;

    /// Remove a key
    ///
    /// # Errors
    /// Host status or transport failure.
    fn kv_delete(&self, store: KvStoreHandle, key: &str) -> Result<(), HostError>;

    /// Open a config store by name
    ///
    /// # Errors
    /// Host status or transport failure.
    fn config_store_open(&self, name: &str) -> Result<ConfigStoreHandle, HostError>;

    /// Copy the value of `key` into `value`.
    ///
    /// `nwritten` receives the value length. When the host answers
    /// [`crate::HostStatus::Buflen`] it is the length the buffer needs.
    ///
    /// # Errors
    /// Host status or transport failure.
    fn config_store_get(
        &self,
        store: ConfigStoreHandle,
        key: &str,
        value: &mut [u8],
        nwritten: &mut usize,
    ) -> Result<(), HostError>;

    /// Create an empty body
    ///
    /// # Errors
    /// Host status or transport failure.
    fn body_new(&self) -> Result<BodyHandle, HostError>;

    /// Read from a body into the buffer. Zero means end of stream.
    ///
    /// # Errors
    /// Host status or transport failure.
    fn body_read(&self, body: BodyHandle, buffer: &mut [u8]) -> Result<usize, HostError>;

    /// Append the buffer to a body, returns the number of bytes taken
    ///
    /// # Errors
    /// Host status or transport failure.
    fn body_write(&self, body: BodyHandle, buffer: &[u8]) -> Result<usize, HostError>;

    /// Close a body
    ///
    /// # Errors
    /// Host status or transport failure.
    fn body_close(&self, body: BodyHandle) -> Result<(), HostError>;
}
