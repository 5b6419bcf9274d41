//! Error types for the climate crate.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for climate operations.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Errors that can occur while answering a climate query.
///
/// A query that matches no rows is not an error; it yields an empty or
/// null result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// A date parameter could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date for '{param}': {value}. Expected format: YYYY-MM-DD")]
    InvalidDate { param: String, value: String },

    /// The observation window could not be computed from the reference date.
    #[error("Invalid query window: {0}")]
    InvalidWindow(String),

    /// The data store failed or is unreachable.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A store query did not finish within the configured bound.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClimateError {
    /// Create an invalid date error for the named parameter.
    pub fn invalid_date(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            param: param.into(),
            value: value.into(),
        }
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ClimateError::InvalidDate { .. } => "INVALID_DATE",
            ClimateError::Storage(_) => "STORE_UNAVAILABLE",
            ClimateError::Timeout(_) => "QUERY_TIMEOUT",
            ClimateError::InvalidWindow(_) | ClimateError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the caller sent a bad request rather than the service failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClimateError::InvalidDate { .. })
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for ClimateError {
    fn from(err: sqlx::Error) -> Self {
        ClimateError::Storage(err.to_string())
    }
}
