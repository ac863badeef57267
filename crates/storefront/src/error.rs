//! Error type shared by the storefront service clients.
//!
//! Every client catches transport and protocol failures at its boundary
//! and returns `Result<T, ApiError>`; the stores convert these into
//! boolean failure signals so that no error escapes to a view.

use thiserror::Error;

/// Errors that can occur when talking to a backend service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, transport).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body failed to parse as the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required or rejected (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Service returned a non-success HTTP status.
    #[error("Service error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Service answered 2xx but with a `{success:false}` envelope.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// An operation that requires a session was called without one.
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Result type alias for [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;
