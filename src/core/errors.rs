use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the document QA pipeline.
///
/// Every external call site returns one of these tagged kinds; callers
/// pattern-match instead of relying on a catch-all.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("document load failure: {0}")]
    DocumentLoad(String),
    #[error("embedding failure: {0}")]
    Embedding(String),
    #[error("similarity index unavailable: {0}")]
    IndexUnavailable(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("completion service failure: {0}")]
    Completion(String),
    #[error("search service failure: {0}")]
    Search(String),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        CoreError::Internal(err.to_string())
    }

    /// Whether this failure looks transient (server overload, timeout),
    /// i.e. worth a bounded retry on the completion path.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::Completion(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("503")
                    || msg.contains("overloaded")
                    || msg.contains("timed out")
                    || msg.contains("timeout")
            }
            _ => false,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            CoreError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::BadRequest(_) | CoreError::DocumentLoad(_) => StatusCode::BAD_REQUEST,
            CoreError::IndexUnavailable(_) | CoreError::Completion(_) | CoreError::Search(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CoreError::Embedding(_)
            | CoreError::DimensionMismatch { .. }
            | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
