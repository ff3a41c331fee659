//! Embedding client.
//!
//! Indexing and query-time embedding go through the same client and model;
//! similarity scores are meaningless otherwise.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::errors::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            timeout_secs: 30,
        }
    }
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each input into a fixed-length vector, preserving order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, CoreError>;
}

/// Embedder backed by an OpenAI-compatible `/v1/embeddings` endpoint.
#[derive(Clone)]
pub struct HttpEmbedder {
    config: EmbeddingConfig,
    client: Client,
}

impl HttpEmbedder {
    pub fn new(config: EmbeddingConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CoreError::Embedding(err.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/v1/embeddings",
            self.config.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "input": inputs,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| CoreError::Embedding(err.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(CoreError::Embedding(format!(
                "embedding endpoint returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| CoreError::Embedding(err.to_string()))?;

        let mut embeddings = Vec::with_capacity(inputs.len());
        if let Some(data) = payload["data"].as_array() {
            for item in data {
                if let Some(vals) = item["embedding"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(CoreError::Embedding(format!(
                "embedding endpoint returned {} vectors for {} inputs",
                embeddings.len(),
                inputs.len()
            )));
        }

        Ok(embeddings)
    }
}
