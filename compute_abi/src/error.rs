use thiserror::Error;

use crate::HostStatus;

/// Failure of a single host call.
///
/// Only [`HostError::Status`] is a host status. The other variants are
/// failures below the status layer and callers pass them on untouched.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host call failed: {0}")]
    Status(HostStatus),

    #[error("host call `{call}` is not available on this target")]
    Unavailable { call: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// The host status carried by this error, if it is one.
    ///
    /// A known code is always returned as its named variant.
    #[must_use]
    pub fn status(&self) -> Option<HostStatus> {
        match self {
            Self::Status(status) => Some(status.normalized()),
            Self::Unavailable { .. } | Self::Io(_) => None,
        }
    }
}

impl From<HostStatus> for HostError {
    fn from(status: HostStatus) -> Self {
        Self::Status(status)
    }
}
