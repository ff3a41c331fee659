use async_trait::async_trait;

use super::types::ChatMessage;
use crate::core::errors::CoreError;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Single non-streaming completion for the given conversation.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CoreError>;
}
