//! Error types for the backend clients.

use thiserror::Error;

/// Message shown when the backend gives no usable explanation.
pub const GENERIC_ERROR: &str = "Une erreur est survenue";

/// Errors that can occur when talking to the backend services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Credentials were rejected (401/403).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// A payment call was made before a JWT was obtained.
    #[error("JWT requis")]
    MissingToken,

    /// The HTTP client could not be constructed.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}

/// Extract the backend's `message` field from an error body.
///
/// Falls back to [`GENERIC_ERROR`] when the body is not JSON or has no
/// message.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}
