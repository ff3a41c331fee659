use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::CompletionProvider;
use super::types::{ChatMessage, CompletionConfig};
use crate::core::errors::CoreError;

/// Completion provider backed by an OpenAI-compatible
/// `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct HttpCompletionProvider {
    config: CompletionConfig,
    client: Client,
}

impl HttpCompletionProvider {
    pub fn new(config: CompletionConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CoreError::Completion(err.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CoreError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "stream": false,
        });

        let mut request = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let res = request
            .send()
            .await
            .map_err(|err| CoreError::Completion(err.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(CoreError::Completion(format!(
                "completion endpoint returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| CoreError::Completion(err.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}
