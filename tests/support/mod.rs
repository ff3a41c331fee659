//! Test doubles for the external collaborators.
#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use docchat_backend::core::errors::CoreError;
use docchat_backend::embedding::Embedder;
use docchat_backend::index::{IndexItem, NamespaceIndex, ScoredItem, VectorIndex};
use docchat_backend::llm::{ChatMessage, CompletionProvider, CompletionService};
use docchat_backend::tools::search::WebSearch;

pub const DIMENSION: usize = 64;

/// Deterministic bag-of-words embedder: each token hashes into a bucket,
/// the vector is L2-normalized. Shared tokens give proportional cosine
/// similarity, which is all retrieval tests need.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        Ok(inputs.iter().map(|text| self.embed_one(text)).collect())
    }
}

/// In-memory similarity index, namespaced like the real service.
#[derive(Default)]
pub struct InMemoryVectorIndex {
    namespaces: Mutex<HashMap<String, Vec<IndexItem>>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, namespace: &str) -> usize {
        self.namespaces
            .lock()
            .unwrap()
            .get(namespace)
            .map(|items| items.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, namespace: &str, items: Vec<IndexItem>) -> Result<(), CoreError> {
        self.namespaces
            .lock()
            .unwrap()
            .entry(namespace.to_string())
            .or_default()
            .extend(items);
        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredItem>, CoreError> {
        let namespaces = self.namespaces.lock().unwrap();
        let Some(items) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredItem> = items
            .iter()
            .map(|item| ScoredItem {
                id: item.id.clone(),
                score: cosine_similarity(vector, &item.vector),
                metadata: item.metadata.clone(),
            })
            .collect();

        // Stable sort keeps insertion order for tied scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn delete_all(&self, namespace: &str) -> Result<(), CoreError> {
        self.namespaces.lock().unwrap().remove(namespace);
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Completion provider replaying canned replies, counting calls.
pub struct ScriptedCompletions {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedCompletions {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletions {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CoreError::Completion("no scripted reply left".to_string()))
    }
}

/// Web search double: a fixed result blob, or a failure when none is set.
pub struct StubSearch {
    result: Option<String>,
    calls: AtomicUsize,
}

impl StubSearch {
    pub fn returning(result: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Some(result.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for StubSearch {
    async fn search(&self, _query: &str) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| CoreError::Search("search backend offline".to_string()))
    }
}

/// Namespace index over the in-memory fakes.
pub fn test_index() -> Arc<NamespaceIndex> {
    Arc::new(NamespaceIndex::new(
        Arc::new(HashEmbedder::new(DIMENSION)),
        Arc::new(InMemoryVectorIndex::new()),
        DIMENSION,
        50,
    ))
}

/// Completion service with a tiny backoff so retry tests stay fast.
pub fn test_completions(provider: Arc<ScriptedCompletions>) -> CompletionService {
    CompletionService::new(provider, 2, Duration::from_millis(1))
}
