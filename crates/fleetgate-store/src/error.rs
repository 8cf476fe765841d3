//! Error types for the record-store gateway.

use thiserror::Error;

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// AAD authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The store rejected a request.
    #[error("Store error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
