//! Error type shared by every fallible operation in the crate.
//!
//! The core only ever fails on input validation: parameters are checked
//! before any randomness is consumed, and a call either produces a full
//! result or nothing.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure kinds.
#[derive(Error, Debug)]
pub enum Error {
    /// A precondition on an input parameter was violated.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter (or field path) that was rejected, e.g. `nodes[3].variance`.
        name: String,
        /// Which precondition failed.
        reason: String,
    },

    /// Reading a configuration file failed.
    #[cfg(feature = "serde")]
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an [`Error::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True if this is an input-validation failure.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}
