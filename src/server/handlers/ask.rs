use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::core::errors::CoreError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Answer one question against the session's document.
///
/// Collaborator failures during answering come back as an
/// `error`-provenance answer body, not as a 5xx.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<AskRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let question = payload.question.trim().to_string();
    if question.is_empty() {
        return Err(CoreError::BadRequest("question must not be empty".into()));
    }

    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| CoreError::SessionNotFound(session_id.clone()))?;

    if !session.ingested {
        return Err(CoreError::BadRequest(
            "no document has been ingested for this session yet".into(),
        ));
    }

    let answer = state.composer.answer(&session.id, &question).await;
    Ok(Json(answer))
}
