//! Error types for the backend client

use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur when talking to the hosted backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Required configuration value missing
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    /// Configured URL could not be parsed
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Credentials rejected or session expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Insert returned no row
    #[error("Insert into {table} returned no row")]
    EmptyInsert {
        /// Table that was written
        table: String,
    },

    /// Backend returned an error status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },
}

impl BackendError {
    /// Whether this error means the caller has no valid session
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
