//! End-to-end answer composition against test doubles.

mod support;

use std::sync::Arc;

use docchat_backend::composer::AnswerComposer;
use docchat_backend::document::{segment, Passage, SegmenterConfig};
use docchat_backend::graph::nodes::WEB_SOURCE_DISCLOSURE;
use docchat_backend::graph::state::Provenance;
use docchat_backend::index::NamespaceIndex;
use docchat_backend::retrieval::{RetrievalConfig, Retriever};
use docchat_backend::tools::search::WebSearch;

use support::{test_completions, test_index, ScriptedCompletions, StubSearch};

fn composer(
    index: Arc<NamespaceIndex>,
    completions: Arc<ScriptedCompletions>,
    search: Arc<StubSearch>,
) -> AnswerComposer {
    AnswerComposer::new(
        Retriever::new(index, RetrievalConfig { top_k: 5 }),
        test_completions(completions),
        search as Arc<dyn WebSearch>,
    )
    .unwrap()
}

fn passage(ordinal: usize, text: &str) -> Passage {
    Passage {
        ordinal,
        text: text.to_string(),
        source: "notes.pdf".to_string(),
    }
}

#[tokio::test]
async fn empty_context_short_circuits_without_model_call() {
    let index = test_index();
    let completions = ScriptedCompletions::new(&["should never be used"]);
    let search = StubSearch::returning("irrelevant");

    let composer = composer(index, completions.clone(), search.clone());
    let answer = composer.answer("empty-session", "What is anything?").await;

    assert_eq!(answer.provenance, Provenance::NoneFound);
    assert_eq!(completions.calls(), 0);
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn document_grounded_answer_from_ingested_document() {
    let index = test_index();
    let text = "Freedonia is a small country in the mountains. \
                The capital of Freedonia is Lostville. \
                Its main export is marble.";
    let config = SegmenterConfig {
        target_size: 60,
        overlap: 15,
    };
    let passages = segment(text, &config, "notes.pdf").unwrap();
    index.write("session-1", &passages).await.unwrap();

    let completions =
        ScriptedCompletions::new(&["According to your document, the capital of Freedonia is Lostville."]);
    let search = StubSearch::returning("irrelevant");

    let composer = composer(index, completions.clone(), search.clone());
    let answer = composer
        .answer("session-1", "What is the capital of Freedonia?")
        .await;

    assert_eq!(answer.provenance, Provenance::DocumentGrounded);
    assert!(answer.text.contains("Lostville"));
    assert_eq!(completions.calls(), 1);
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn sentinel_reply_falls_back_to_web_with_disclosure() {
    let index = test_index();
    index
        .write("session-2", &[passage(0, "Topic A is all this document covers.")])
        .await
        .unwrap();

    let completions = ScriptedCompletions::new(&[
        "NO_ANSWER",
        "Topic B fact: 42.",
    ]);
    let search = StubSearch::returning("Topic B fact: 42.");

    let composer = composer(index, completions.clone(), search.clone());
    let answer = composer.answer("session-2", "Tell me about topic B").await;

    assert_eq!(answer.provenance, Provenance::WebFallback);
    assert!(answer.text.starts_with(WEB_SOURCE_DISCLOSURE));
    assert!(answer.text.contains("42"));
    assert_eq!(search.calls(), 1);
    assert_eq!(completions.calls(), 2);
}

#[tokio::test]
async fn decorated_sentinel_still_falls_back() {
    let index = test_index();
    index
        .write("session-3", &[passage(0, "Topic A only.")])
        .await
        .unwrap();

    let completions = ScriptedCompletions::new(&["\"NO_ANSWER\".", "From the web."]);
    let search = StubSearch::returning("web results");

    let composer = composer(index, completions, search.clone());
    let answer = composer.answer("session-3", "Something else?").await;

    assert_eq!(answer.provenance, Provenance::WebFallback);
    assert_eq!(search.calls(), 1);
}

#[tokio::test]
async fn search_failure_becomes_error_answer() {
    let index = test_index();
    index
        .write("session-4", &[passage(0, "Topic A only.")])
        .await
        .unwrap();

    let completions = ScriptedCompletions::new(&["NO_ANSWER"]);
    let search = StubSearch::failing();

    let composer = composer(index, completions.clone(), search.clone());
    let answer = composer.answer("session-4", "Unanswerable?").await;

    assert_eq!(answer.provenance, Provenance::Error);
    assert!(answer.text.contains("web search failed"));
    // The failed search never led to a second model call.
    assert_eq!(completions.calls(), 1);
}

#[tokio::test]
async fn completion_failure_is_contained_as_error_answer() {
    let index = test_index();
    index
        .write("session-5", &[passage(0, "Some content.")])
        .await
        .unwrap();

    // No scripted replies: the first completion call fails outright.
    let completions = ScriptedCompletions::new(&[]);
    let search = StubSearch::returning("irrelevant");

    let composer = composer(index, completions, search.clone());
    let answer = composer.answer("session-5", "Anything?").await;

    assert_eq!(answer.provenance, Provenance::Error);
    assert!(!answer.text.is_empty());
    assert_eq!(search.calls(), 0);
}
