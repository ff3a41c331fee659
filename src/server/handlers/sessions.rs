use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::CoreError;
use crate::state::AppState;

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, CoreError> {
    let session = state.sessions.start_session();
    Ok(Json(json!({ "session": session })))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(CoreError::SessionNotFound(session_id))?;
    Ok(Json(json!({ "session": session })))
}

/// Ingest a raw PDF body into the session's namespace.
///
/// The ingested flag is only set after the write completed, so a failed
/// ingestion can simply be retried.
pub async fn ingest_document(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, CoreError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| CoreError::SessionNotFound(session_id.clone()))?;

    let passages = state
        .ingest
        .ingest(&session.id, "uploaded.pdf", &body)
        .await?;

    state.sessions.mark_ingested(&session.id)?;

    Ok(Json(json!({
        "session_id": session.id,
        "passages": passages,
    })))
}

/// End the session: clear its namespace and drop local state. Idempotent;
/// ending an already-ended session succeeds as a no-op.
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    state.sessions.end_session(&session_id).await;
    Ok(Json(json!({ "success": true })))
}
