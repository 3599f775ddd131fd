//! Host ABI for the edge compute guest: raw imports, status codes, and the
//! [`HostRuntime`] seam the store clients are written against.

mod error;
mod ffi_runtime;
#[cfg(target_arch = "wasm32")]
pub mod host_abi;
mod runtime_trait;
mod status;

pub use error::HostError;
pub use ffi_runtime::FfiHost;
pub use runtime_trait::HostRuntime;
pub use status::HostStatus;

/// The host's "no handle" value.
pub const INVALID_HANDLE: u32 = u32::MAX;

/// Handle to an opened KV store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KvStoreHandle(pub u32);

/// Handle to an opened config store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigStoreHandle(pub u32);

/// Handle to a host byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u32);
