//! Namespace-scoped access to the external similarity index.
//!
//! The index service is the sole serialization point between concurrent
//! sessions; isolation is enforced by threading a namespace through every
//! write, read, and delete. There is no default namespace.

pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::document::Passage;
use crate::embedding::Embedder;

/// One vector entry to upsert.
#[derive(Debug, Clone)]
pub struct IndexItem {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: Value,
}

/// One ranked match from a similarity query.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub id: String,
    pub score: f32,
    pub metadata: Value,
}

/// Contract required of the external similarity index service.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, namespace: &str, items: Vec<IndexItem>) -> Result<(), CoreError>;

    /// Up to `k` nearest entries within `namespace`. An empty namespace is
    /// an empty result, not an error.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredItem>, CoreError>;

    /// Remove every entry under `namespace`. Must be a no-op on an empty or
    /// never-written namespace.
    async fn delete_all(&self, namespace: &str) -> Result<(), CoreError>;
}

/// A passage as returned from the index, with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub text: String,
    pub score: f32,
    pub source: String,
    pub ordinal: usize,
}

/// Wraps the embedder and the index service, scoping every operation to a
/// caller-supplied namespace and enforcing the configured vector
/// dimensionality on both the write and the query path.
pub struct NamespaceIndex {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    dimension: usize,
    default_top_k: usize,
}

impl NamespaceIndex {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        dimension: usize,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            dimension,
            default_top_k,
        }
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// Insert all passages as vector entries under `namespace`.
    ///
    /// Not idempotent: repeated writes of identical content duplicate
    /// entries, matching the accumulate-more-passages contract.
    pub async fn write(&self, namespace: &str, passages: &[Passage]) -> Result<(), CoreError> {
        if passages.is_empty() {
            return Ok(());
        }

        let inputs: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let vectors = self.embedder.embed(&inputs).await?;

        let mut items = Vec::with_capacity(passages.len());
        for (passage, vector) in passages.iter().zip(vectors) {
            self.check_dimension(&vector)?;
            items.push(IndexItem {
                id: Uuid::new_v4().to_string(),
                vector,
                metadata: json!({
                    "text": passage.text,
                    "source": passage.source,
                    "ordinal": passage.ordinal,
                }),
            });
        }

        self.index.upsert(namespace, items).await
    }

    /// Up to `k` passages nearest to `text`, restricted to `namespace`.
    /// `k` defaults to the configured value when not overridden.
    pub async fn query(
        &self,
        namespace: &str,
        text: &str,
        k: Option<usize>,
    ) -> Result<Vec<ScoredPassage>, CoreError> {
        let k = k.unwrap_or(self.default_top_k);

        let vectors = self.embedder.embed(&[text.to_string()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Embedding("no vector for query text".to_string()))?;
        self.check_dimension(&vector)?;

        let matches = self.index.query(namespace, &vector, k).await?;

        Ok(matches
            .into_iter()
            .map(|item| ScoredPassage {
                text: item
                    .metadata
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                score: item.score,
                source: item
                    .metadata
                    .get("source")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                ordinal: item
                    .metadata
                    .get("ordinal")
                    .and_then(|v| v.as_u64())
                    .unwrap_or_default() as usize,
            })
            .collect())
    }

    /// Remove every entry under `namespace`. Safe on a namespace that is
    /// empty or never existed.
    pub async fn delete_all(&self, namespace: &str) -> Result<(), CoreError> {
        self.index.delete_all(namespace).await
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), CoreError> {
        if vector.len() != self.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}
