//! Error types for the Firebase REST clients

/// Errors returned by the Firebase REST clients
#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Firebase client operations
pub type Result<T> = std::result::Result<T, FirebaseError>;
