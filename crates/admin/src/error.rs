//! Error type for the admin clients.

use thiserror::Error;

/// Errors that can occur when talking to a backend service as admin.
#[derive(Debug, Error)]
pub enum AdminError {
    /// HTTP request failed (connect, timeout, transport).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body failed to parse as the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The token is missing admin privileges (401/403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Service returned a non-success HTTP status.
    #[error("Service error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Service answered 2xx but reported failure, or the request was
    /// refused before being sent.
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Result type alias for [`AdminError`].
pub type Result<T> = std::result::Result<T, AdminError>;
