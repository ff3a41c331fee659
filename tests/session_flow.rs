//! Session lifecycle: start, ingest flag, teardown idempotence.

mod support;

use docchat_backend::core::errors::CoreError;
use docchat_backend::document::Passage;
use docchat_backend::session::SessionManager;

use support::test_index;

#[tokio::test]
async fn sessions_get_unique_unguessable_ids() {
    let manager = SessionManager::new(test_index());
    let a = manager.start_session();
    let b = manager.start_session();

    assert_ne!(a.id, b.id);
    assert!(!a.ingested);
    assert_eq!(manager.active_sessions(), 2);
}

#[tokio::test]
async fn mark_ingested_is_idempotent() {
    let manager = SessionManager::new(test_index());
    let session = manager.start_session();

    manager.mark_ingested(&session.id).unwrap();
    manager.mark_ingested(&session.id).unwrap();

    assert!(manager.get(&session.id).unwrap().ingested);
}

#[tokio::test]
async fn mark_ingested_on_unknown_session_fails() {
    let manager = SessionManager::new(test_index());
    let err = manager.mark_ingested("no-such-session").unwrap_err();
    assert!(matches!(err, CoreError::SessionNotFound(_)));
}

#[tokio::test]
async fn end_session_clears_namespace_and_local_state() {
    let index = test_index();
    let manager = SessionManager::new(index.clone());
    let session = manager.start_session();

    index
        .write(
            &session.id,
            &[Passage {
                ordinal: 0,
                text: "Session-scoped content.".to_string(),
                source: "doc.pdf".to_string(),
            }],
        )
        .await
        .unwrap();
    manager.mark_ingested(&session.id).unwrap();

    manager.end_session(&session.id).await;

    assert!(manager.get(&session.id).is_none());
    assert!(index
        .query(&session.id, "Session-scoped content.", None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn end_session_twice_does_not_raise() {
    let manager = SessionManager::new(test_index());
    let session = manager.start_session();

    manager.end_session(&session.id).await;
    manager.end_session(&session.id).await;

    assert!(manager.get(&session.id).is_none());
}

#[tokio::test]
async fn ending_an_unknown_session_is_a_noop() {
    let manager = SessionManager::new(test_index());
    manager.end_session("never-started").await;
    assert_eq!(manager.active_sessions(), 0);
}
