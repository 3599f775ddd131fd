//! Error mapping utilities for stream errors.
//!
//! Converts host statuses to `embedded_io::ErrorKind` and host errors to
//! `std::io::Error` for the `std::io` impls.

use compute_abi::{HostError, HostStatus};

/// Convert a host status to `embedded_io::ErrorKind`
#[must_use]
#[allow(clippy::match_same_arms)] // Statuses are listed for documentation
pub fn status_to_error_kind(status: HostStatus) -> embedded_io::ErrorKind {
    match status {
        HostStatus::None => embedded_io::ErrorKind::NotFound,
        HostStatus::Inval | HostStatus::Badf | HostStatus::Buflen | HostStatus::Badalign => {
            embedded_io::ErrorKind::InvalidInput
        }
        HostStatus::Unsupported => embedded_io::ErrorKind::Unsupported,
        HostStatus::LimitExceeded => embedded_io::ErrorKind::OutOfMemory,
        HostStatus::HttpInvalid | HostStatus::HttpIncomplete | HostStatus::HttpInvalidStatus => {
            embedded_io::ErrorKind::InvalidData
        }
        // AGAIN is not mapped to Interrupted: std read loops retry Interrupted forever.
        HostStatus::Error | HostStatus::Again | HostStatus::HttpUser => {
            embedded_io::ErrorKind::Other
        }
        HostStatus::Ok | HostStatus::HttpHeadTooLarge | HostStatus::Other(_) => {
            embedded_io::ErrorKind::Other
        }
    }
}

/// Error kind of any host error
#[must_use]
pub fn host_error_kind(err: &HostError) -> embedded_io::ErrorKind {
    match err {
        HostError::Status(status) => status_to_error_kind(status.normalized()),
        HostError::Unavailable { .. } => embedded_io::ErrorKind::Unsupported,
        HostError::Io(_) => embedded_io::ErrorKind::Other,
    }
}

/// Convert a host error to `std::io::Error`.
///
/// An I/O error that came from below the host layer is returned as is. Other
/// errors keep the host error as the inner error.
#[must_use]
pub fn host_error_to_io(err: HostError) -> std::io::Error {
    let kind = match host_error_kind(&err) {
        embedded_io::ErrorKind::NotFound => std::io::ErrorKind::NotFound,
        embedded_io::ErrorKind::InvalidInput => std::io::ErrorKind::InvalidInput,
        embedded_io::ErrorKind::InvalidData => std::io::ErrorKind::InvalidData,
        embedded_io::ErrorKind::Unsupported => std::io::ErrorKind::Unsupported,
        embedded_io::ErrorKind::OutOfMemory => std::io::ErrorKind::OutOfMemory,
        _ => std::io::ErrorKind::Other,
    };
    match err {
        HostError::Io(io_err) => io_err,
        other => std::io::Error::new(kind, other),
    }
}
