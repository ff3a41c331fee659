// Query state threaded through the answer graph.
// One instance per question; nothing survives across turns.

use serde::{Deserialize, Serialize};

use crate::retrieval::RetrievedContext;

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Grounded in the user's uploaded document.
    DocumentGrounded,
    /// Composed from external web search results, with disclosure.
    WebFallback,
    /// Nothing indexed or nothing retrieved; no model call was made.
    NoneFound,
    /// A collaborator failed; the text carries a short cause.
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub provenance: Provenance,
}

impl Answer {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }

    pub fn error(cause: impl Into<String>) -> Self {
        Self {
            text: cause.into(),
            provenance: Provenance::Error,
        }
    }
}

/// Mutable state for one pass through the answer graph.
#[derive(Debug, Clone)]
pub struct QueryState {
    /// Session namespace the question is scoped to.
    pub namespace: String,
    pub question: String,
    /// Filled by the retrieve node.
    pub context: Option<RetrievedContext>,
    /// Filled by whichever node finishes the pass.
    pub answer: Option<Answer>,
}

impl QueryState {
    pub fn new(namespace: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            question: question.into(),
            context: None,
            answer: None,
        }
    }
}
