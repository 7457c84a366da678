//! Cache Client Error Hierarchy
//!
//! Errors are split into two tiers:
//! - caller misuse ([`Error::InvalidArgument`]), raised before any transport call
//! - operation failures ([`OperationError`], [`TransportError`]), surfaced from the
//!   result of a transport round-trip
//!
//! Nothing in this crate retries. Every failure reaches the caller as-is.

use std::time::Duration;

use config::ConfigError;

use crate::Status;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller misuse: bad key/value content, out-of-range expiration, empty batch
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The service processed the request and reported a failure
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// The transport failed to complete the round-trip
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Client configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// ADD on an existing key or REPLACE on a missing key
    #[error("Item not stored")]
    NotStored,

    /// The CAS token attached to a write no longer matches the stored item
    #[error("Item was modified since it was last read")]
    Modified,

    /// Any other non-success status reported for an item
    #[error("Service error: {status}")]
    Service { status: Status },

    /// The transport broke its batch contract
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Remote service cannot be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The round-trip did not complete in time
    #[error("Transport timeout after {0:?}")]
    Timeout(Duration),

    /// Any other transport-specific failure
    #[error("Transport failure: {source}")]
    Other {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// True when a CAS-guarded write lost against a concurrent modification
    pub fn is_modified(&self) -> bool {
        matches!(self, Error::Operation(OperationError::Modified))
    }

    pub fn is_not_stored(&self) -> bool {
        matches!(self, Error::Operation(OperationError::NotStored))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Short label used for metrics and logs
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::Operation(OperationError::NotStored) => "not_stored",
            Error::Operation(OperationError::Modified) => "modified",
            Error::Operation(OperationError::Service { .. }) => "service_error",
            Error::Operation(OperationError::Internal(_)) => "internal_error",
            Error::Transport(_) => "transport_error",
            Error::Config(_) => "config_error",
        }
    }
}
