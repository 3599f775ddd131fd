//! Host status codes.

use core::fmt;

/// A status code returned by a host call.
///
/// The numeric values are defined by the host. Codes this crate does not know
/// are kept in [`HostStatus::Other`] so they still reach diagnostics. An
/// `Other` holding a known code compares unequal to the named variant; use
/// [`HostStatus::normalized`] before matching on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostStatus {
    Ok,
    Error,
    Inval,
    Badf,
    Buflen,
    Unsupported,
    Badalign,
    HttpInvalid,
    HttpUser,
    HttpIncomplete,
    None,
    HttpHeadTooLarge,
    HttpInvalidStatus,
    LimitExceeded,
    Again,
    Other(u32),
}

impl HostStatus {
    /// The raw code as the host reports it.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::Error => 1,
            Self::Inval => 2,
            Self::Badf => 3,
            Self::Buflen => 4,
            Self::Unsupported => 5,
            Self::Badalign => 6,
            Self::HttpInvalid => 7,
            Self::HttpUser => 8,
            Self::HttpIncomplete => 9,
            Self::None => 10,
            Self::HttpHeadTooLarge => 11,
            Self::HttpInvalidStatus => 12,
            Self::LimitExceeded => 13,
            Self::Again => 14,
            Self::Other(code) => code,
        }
    }

    /// The named variant for a known code, even when built as `Other`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::from(self.code())
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        self.normalized() == Self::Ok
    }

    /// Turn a raw call result into `Ok(())` or the failing status.
    ///
    /// # Errors
    /// Returns the status itself when it is anything but [`HostStatus::Ok`].
    pub fn result(self) -> Result<(), crate::HostError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(crate::HostError::Status(self))
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Inval => "INVAL",
            Self::Badf => "BADF",
            Self::Buflen => "BUFLEN",
            Self::Unsupported => "UNSUPPORTED",
            Self::Badalign => "BADALIGN",
            Self::HttpInvalid => "HTTPINVALID",
            Self::HttpUser => "HTTPUSER",
            Self::HttpIncomplete => "HTTPINCOMPLETE",
            Self::None => "NONE",
            Self::HttpHeadTooLarge => "HTTPHEADTOOLARGE",
            Self::HttpInvalidStatus => "HTTPINVALIDSTATUS",
            Self::LimitExceeded => "LIMITEXCEEDED",
            Self::Again => "AGAIN",
            Self::Other(_) => "UNKNOWN",
        }
    }
}

impl From<u32> for HostStatus {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Error,
            2 => Self::Inval,
            3 => Self::Badf,
            4 => Self::Buflen,
            5 => Self::Unsupported,
            6 => Self::Badalign,
            7 => Self::HttpInvalid,
            8 => Self::HttpUser,
            9 => Self::HttpIncomplete,
            10 => Self::None,
            11 => Self::HttpHeadTooLarge,
            12 => Self::HttpInvalidStatus,
            13 => Self::LimitExceeded,
            14 => Self::Again,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.normalized().name(), self.code())
    }
}
