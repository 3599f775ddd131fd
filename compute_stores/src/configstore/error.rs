use compute_abi::{HostError, HostStatus};
use thiserror::Error;

/// Errors returned by [`super::Store`].
#[derive(Error, Debug)]
pub enum ConfigStoreError {
    #[error("configstore: store not found")]
    StoreNotFound,

    #[error("configstore: store name was empty")]
    StoreNameEmpty,

    #[error("configstore: store name contained invalid characters")]
    StoreNameInvalid,

    #[error("configstore: store name too long")]
    StoreNameTooLong,

    #[error("configstore: key not found")]
    KeyNotFound,

    #[error("configstore: unexpected error ({0})")]
    Unexpected(HostStatus),

    #[error("configstore: value is not valid UTF-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    #[error(transparent)]
    Transport(HostError),
}
