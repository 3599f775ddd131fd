//! Error types for the KV store client.

use compute_abi::{HostError, HostStatus};
use thiserror::Error;

/// Errors returned by [`super::Store`] and [`super::Entry`].
#[derive(Error, Debug)]
pub enum KvStoreError {
    /// The named store doesn't exist.
    #[error("kvstore: store not found")]
    StoreNotFound,

    /// The key doesn't exist in this store.
    #[error("kvstore: key not found")]
    KeyNotFound,

    /// The host rejected the key.
    #[error("kvstore: invalid key")]
    InvalidKey,

    /// The host answered with a status this operation has no meaning for.
    #[error("kvstore: unexpected error ({0})")]
    Unexpected(HostStatus),

    #[error("kvstore: value is not valid UTF-8")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    /// An earlier read of this entry failed part way.
    #[error("kvstore: entry value was lost by an earlier failed read")]
    EntryPoisoned,

    /// A failure below the host status layer, unchanged.
    #[error(transparent)]
    Transport(HostError),
}
