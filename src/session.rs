//! Session lifecycle.
//!
//! Sessions live in an explicit store owned by the manager; the session id
//! doubles as the index namespace. A session is destroyed only by an
//! explicit end-of-session call, and local state is discarded even when the
//! remote namespace delete fails, so a remote outage can never strand a
//! client in a dead session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::index::NamespaceIndex;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    /// Set once ingestion has run to completion; queries are rejected
    /// before that.
    pub ingested: bool,
    pub created_at: DateTime<Utc>,
}

pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
    index: Arc<NamespaceIndex>,
}

impl SessionManager {
    pub fn new(index: Arc<NamespaceIndex>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            index,
        }
    }

    /// Allocate a fresh session with an unguessable id.
    pub fn start_session(&self) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            ingested: false,
            created_at: Utc::now(),
        };

        self.sessions
            .lock()
            .expect("session map poisoned")
            .insert(session.id.clone(), session.clone());

        tracing::info!("Started session {}", session.id);
        session
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions
            .lock()
            .expect("session map poisoned")
            .get(session_id)
            .cloned()
    }

    /// Flip the ingested flag. Idempotent.
    pub fn mark_ingested(&self, session_id: &str) -> Result<(), CoreError> {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;
        session.ingested = true;
        Ok(())
    }

    /// Clear the session's namespace and discard local state.
    ///
    /// The remote delete failure is reported to logs but never blocks the
    /// local discard. Safe to call repeatedly; a second call is a no-op
    /// against a namespace that may already be empty.
    pub async fn end_session(&self, session_id: &str) {
        if let Err(err) = self.index.delete_all(session_id).await {
            tracing::warn!(
                "Failed to clear namespace for session {}: {}",
                session_id,
                err
            );
        }

        let removed = self
            .sessions
            .lock()
            .expect("session map poisoned")
            .remove(session_id)
            .is_some();

        if removed {
            tracing::info!("Ended session {}", session_id);
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().expect("session map poisoned").len()
    }
}
