//! HTTP client for the similarity index service.
//!
//! Speaks the Pinecone-style data plane: `/vectors/upsert`, `/query` and
//! `/vectors/delete`, all namespace-scoped, authenticated with an `Api-Key`
//! header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{IndexItem, ScoredItem, VectorIndex};
use crate::core::errors::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub base_url: String,
    pub api_key: String,
    /// Must match the index's configured dimensionality exactly.
    pub dimension: usize,
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5080".to_string(),
            api_key: String::new(),
            dimension: 384,
            timeout_secs: 30,
        }
    }
}

#[derive(Clone)]
pub struct RemoteVectorIndex {
    config: IndexConfig,
    client: Client,
}

impl RemoteVectorIndex {
    pub fn new(config: IndexConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CoreError::IndexUnavailable(err.to_string()))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post(&self, path: &str, body: Value) -> Result<reqwest::Response, CoreError> {
        self.client
            .post(self.endpoint(path))
            .header("Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CoreError::IndexUnavailable(err.to_string()))
    }
}

#[async_trait]
impl VectorIndex for RemoteVectorIndex {
    async fn upsert(&self, namespace: &str, items: Vec<IndexItem>) -> Result<(), CoreError> {
        let vectors: Vec<Value> = items
            .into_iter()
            .map(|item| {
                json!({
                    "id": item.id,
                    "values": item.vector,
                    "metadata": item.metadata,
                })
            })
            .collect();

        let res = self
            .post(
                "/vectors/upsert",
                json!({ "vectors": vectors, "namespace": namespace }),
            )
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(CoreError::IndexUnavailable(format!(
                "upsert returned {}: {}",
                status, text
            )));
        }

        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredItem>, CoreError> {
        let res = self
            .post(
                "/query",
                json!({
                    "vector": vector,
                    "topK": k,
                    "namespace": namespace,
                    "includeMetadata": true,
                }),
            )
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(CoreError::IndexUnavailable(format!(
                "query returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| CoreError::IndexUnavailable(err.to_string()))?;

        let matches = payload
            .get("matches")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        Ok(matches
            .into_iter()
            .map(|m| ScoredItem {
                id: m
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                score: m
                    .get("score")
                    .and_then(|v| v.as_f64())
                    .unwrap_or_default() as f32,
                metadata: m.get("metadata").cloned().unwrap_or(Value::Null),
            })
            .collect())
    }

    async fn delete_all(&self, namespace: &str) -> Result<(), CoreError> {
        let res = self
            .post(
                "/vectors/delete",
                json!({ "deleteAll": true, "namespace": namespace }),
            )
            .await?;

        // The service reports a missing namespace as 404; deleting a
        // namespace that never existed is a no-op for callers.
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(CoreError::IndexUnavailable(format!(
                "delete returned {}: {}",
                status, text
            )));
        }

        Ok(())
    }
}
