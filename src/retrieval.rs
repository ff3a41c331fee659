//! Similarity retrieval for a single question.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;
use crate::index::{NamespaceIndex, ScoredPassage};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of passages requested from the index per query.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 50 }
    }
}

/// Passages retrieved for one query, ordered by descending similarity.
/// May be empty.
#[derive(Debug, Clone, Default)]
pub struct RetrievedContext {
    pub passages: Vec<ScoredPassage>,
}

impl RetrievedContext {
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Passage texts concatenated with a blank-line separator, for prompt
    /// construction.
    pub fn text(&self) -> String {
        self.passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Thin composition over the namespace index: fixes `k` and joins passage
/// text for downstream consumption. Embeds nothing itself and caches
/// nothing across calls.
pub struct Retriever {
    adapter: Arc<NamespaceIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(adapter: Arc<NamespaceIndex>, config: RetrievalConfig) -> Self {
        Self {
            adapter,
            top_k: config.top_k,
        }
    }

    pub async fn retrieve(
        &self,
        namespace: &str,
        query_text: &str,
    ) -> Result<RetrievedContext, CoreError> {
        let passages = self
            .adapter
            .query(namespace, query_text, Some(self.top_k))
            .await?;

        tracing::debug!(
            "Retrieved {} passages for namespace {}",
            passages.len(),
            namespace
        );

        Ok(RetrievedContext { passages })
    }
}
