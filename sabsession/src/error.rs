//! Error types for the browsing engine

use sabcloud::CloudError;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while driving a browsing session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The cloud client failed (network, API status, malformed payload)
    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),

    /// IO error (progress file write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed (progress record)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (from sabconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}
