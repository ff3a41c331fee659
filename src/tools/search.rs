//! Web search fallback.
//!
//! The search provider is treated as an opaque text source: no structured
//! ranking, just a blob of result snippets for the model to answer from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub timeout_secs: u64,
    /// Cap on result lines folded into the text blob.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_results: 10,
        }
    }
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run a web search and return the results as plain text.
    async fn search(&self, query: &str) -> Result<String, CoreError>;
}

/// DuckDuckGo instant-answer search.
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    config: SearchConfig,
    client: Client,
}

impl DuckDuckGoSearch {
    pub fn new(config: SearchConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CoreError::Search(err.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, CoreError> {
        let url = format!(
            "https://api.duckduckgo.com/?q={}&format=json&no_redirect=1&no_html=1",
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CoreError::Search(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::Search(format!(
                "DuckDuckGo returned {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| CoreError::Search(err.to_string()))?;

        let mut lines = Vec::new();

        if let Some(abstract_text) = payload.get("AbstractText").and_then(|v| v.as_str()) {
            if !abstract_text.is_empty() {
                lines.push(abstract_text.to_string());
            }
        }

        if let Some(items) = payload.get("Results").and_then(|v| v.as_array()) {
            collect_topic_lines(items, &mut lines);
        }
        if let Some(items) = payload.get("RelatedTopics").and_then(|v| v.as_array()) {
            collect_topic_lines(items, &mut lines);
        }

        lines.truncate(self.config.max_results);
        Ok(lines.join("\n"))
    }
}

fn collect_topic_lines(items: &[Value], lines: &mut Vec<String>) {
    for item in items {
        // Related topics can nest one level under a category.
        if let Some(topics) = item.get("Topics").and_then(|v| v.as_array()) {
            collect_topic_lines(topics, lines);
            continue;
        }
        let text = item.get("Text").and_then(|v| v.as_str()).unwrap_or("");
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }
}
