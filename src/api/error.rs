//! Errors of the persistence layer

use uuid::Uuid;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: HTTP {status} - {body}")]
    Server { status: u16, body: String },

    /// The backend answered with `success: false`
    #[error("{message}")]
    Rejected { action: String, message: String },

    #[error("Empty response to {0}")]
    EmptyResponse(String),

    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),
}
