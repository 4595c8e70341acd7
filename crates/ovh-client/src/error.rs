//! OVH client errors

use thiserror::Error;

/// Errors that can occur when interacting with the OVHcloud API
#[derive(Debug, Error)]
pub enum OvhError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OVH API returned an error
    #[error("OVH API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid keys, consumer key not validated, missing rights)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials or endpoint could not be resolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
