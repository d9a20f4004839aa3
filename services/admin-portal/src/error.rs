//! Error types for the admin portal

/// Errors that can occur in the admin portal
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Document store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;
