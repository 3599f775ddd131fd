#[cfg(not(target_arch = "wasm32"))]
use crate::runtime_trait::HostRuntime;
#[cfg(not(target_arch = "wasm32"))]
use crate::{BodyHandle, ConfigStoreHandle, HostError, KvStoreHandle};

/// FFI-based implementation of `HostRuntime`.
/// Calls the host imports when running as a wasm guest. On other targets the
/// imports do not exist and every call fails with [`crate::HostError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FfiHost;

impl FfiHost {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::FfiHost;
    use crate::host_abi::{fastly_config_store, fastly_http_body, fastly_object_store};
    use crate::runtime_trait::HostRuntime;
    use crate::{
        BodyHandle, ConfigStoreHandle, HostError, HostStatus, KvStoreHandle, INVALID_HANDLE,
    };

    /// Append to the back of the body.
    const BODY_WRITE_END_BACK: u32 = 0;

    fn check(code: u32) -> Result<(), HostError> {
        HostStatus::from(code).result()
    }

    impl HostRuntime for FfiHost {
        fn kv_open(&self, name: &str) -> Result<KvStoreHandle, HostError> {
            let mut handle = INVALID_HANDLE;
            check(unsafe { fastly_object_store::open(name.as_ptr(), name.len(), &mut handle) })?;
            Ok(KvStoreHandle(handle))
        }

        fn kv_lookup(&self, store: KvStoreHandle, key: &str) -> Result<BodyHandle, HostError> {
            let mut handle = INVALID_HANDLE;
            check(unsafe {
                fastly_object_store::lookup(store.0, key.as_ptr(), key.len(), &mut handle)
            })?;
            // A missing key can come back as success with no body.
            if handle == INVALID_HANDLE {
                return Err(HostError::Status(HostStatus::None));
            }
            Ok(BodyHandle(handle))
        }

        fn kv_insert(
            &self,
            store: KvStoreHandle,
            key: &str,
            body: BodyHandle,
        ) -> Result<(), HostError> {
            check(unsafe { fastly_object_store::insert(store.0, key.as_ptr(), key.len(), body.0) })
        }

        fn kv_delete(&self, store: KvStoreHandle, key: &str) -> Result<(), HostError> {
            check(unsafe { fastly_object_store::delete(store.0, key.as_ptr(), key.len()) })
        }

        fn config_store_open(&self, name: &str) -> Result<ConfigStoreHandle, HostError> {
            let mut handle = INVALID_HANDLE;
            check(unsafe { fastly_config_store::open(name.as_ptr(), name.len(), &mut handle) })?;
            Ok(ConfigStoreHandle(handle))
        }

        fn config_store_get(
            &self,
            store: ConfigStoreHandle,
            key: &str,
            value: &mut [u8],
            nwritten: &mut usize,
        ) -> Result<(), HostError> {
            check(unsafe {
                fastly_config_store::get(
                    store.0,
                    key.as_ptr(),
                    key.len(),
                    value.as_mut_ptr(),
                    value.len(),
                    nwritten,
                )
            })
        }

        fn body_new(&self) -> Result<BodyHandle, HostError> {
            let mut handle = INVALID_HANDLE;
            check(unsafe { fastly_http_body::new(&mut handle) })?;
            Ok(BodyHandle(handle))
        }

        fn body_read(&self, body: BodyHandle, buffer: &mut [u8]) -> Result<usize, HostError> {
            let mut nread = 0;
            check(unsafe {
                fastly_http_body::read(body.0, buffer.as_mut_ptr(), buffer.len(), &mut nread)
            })?;
            Ok(nread)
        }

        fn body_write(&self, body: BodyHandle, buffer: &[u8]) -> Result<usize, HostError> {
            let mut nwritten = 0;
            check(unsafe {
                fastly_http_body::write(
                    body.0,
                    buffer.as_ptr(),
                    buffer.len(),
                    BODY_WRITE_END_BACK,
                    &mut nwritten,
                )
            })?;
            Ok(nwritten)
        }

        fn body_close(&self, body: BodyHandle) -> Result<(), HostError> {
            check(unsafe { fastly_http_body::close(body.0) })
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HostRuntime for FfiHost {
    fn kv_open(&self, _name: &str) -> Result<KvStoreHandle, HostError> {
        Err(HostError::Unavailable { call: "fastly_object_store::open" })
    }

    fn kv_lookup(&self, _store: KvStoreHandle, _key: &str) -> Result<BodyHandle, HostError> {
        Err(HostError::Unavailable { call: "fastly_object_store::lookup" })
    }

    fn kv_insert(
        &self,
        _store: KvStoreHandle,
        _key: &str,
        _body: BodyHandle,
    ) -> Result<(), HostError> {
        Err(HostError::Unavailable { call: "fastly_object_store::insert" })
    }

    fn kv_delete(&self, _store: KvStoreHandle, _key: &str) -> Result<(), HostError> {
        Err(HostError::Unavailable { call: "fastly_object_store::delete" })
    }

    fn config_store_open(&self, _name: &str) -> Result<ConfigStoreHandle, HostError> {
        Err(HostError::Unavailable { call: "fastly_config_store::open" })
    }

    fn config_store_get(
        &self,
        _store: ConfigStoreHandle,
        _key: &str,
        _value: &mut [u8],
        _nwritten: &mut usize,
    ) -> Result<(), HostError> {
        Err(HostError::Unavailable { call: "fastly_config_store::get" })
    }

    fn body_new(&self) -> Result<BodyHandle, HostError> {
        Err(HostError::Unavailable { call: "fastly_http_body::new" })
    }

    fn body_read(&self, _body: BodyHandle, _buffer: &mut [u8]) -> Result<usize, HostError> {
        Err(HostError::Unavailable { call: "fastly_http_body::read" })
    }

    fn body_write(&self, _body: BodyHandle, _buffer: &[u8]) -> Result<usize, HostError> {
        Err(HostError::Unavailable { call: "fastly_http_body::write" })
    }

    fn body_close(&self, _body: BodyHandle) -> Result<(), HostError> {
        Err(HostError::Unavailable { call: "fastly_http_body::close" })
    }
}
