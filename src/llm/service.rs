use std::sync::Arc;
use std::time::Duration;

use super::provider::CompletionProvider;
use super::types::ChatMessage;
use crate::core::errors::CoreError;

/// Completion calls with a bounded automatic retry on transient/overload
/// signals. No other external call in the pipeline retries.
#[derive(Clone)]
pub struct CompletionService {
    provider: Arc<dyn CompletionProvider>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl CompletionService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            provider,
            max_retries,
            retry_backoff,
        }
    }

    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CoreError> {
        let mut attempt = 0u32;

        loop {
            match self.provider.complete(messages.clone()).await {
                Ok(content) => return Ok(content),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let wait = self.retry_backoff * attempt;
                    tracing::warn!(
                        "Transient completion failure from {} (attempt {}/{}), retrying in {:?}: {}",
                        self.provider.name(),
                        attempt,
                        self.max_retries,
                        wait,
                        err
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
