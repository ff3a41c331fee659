// Web Fallback Node
// The document couldn't answer; search the web and compose a disclosed
// answer from the results.

use async_trait::async_trait;

use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::{Answer, Provenance, QueryState};
use crate::llm::ChatMessage;

/// Fixed sentence every web-sourced answer starts with.
pub const WEB_SOURCE_DISCLOSURE: &str =
    "**Note:** This information comes from the internet, not your uploaded document.";

pub struct WebFallbackNode;

impl WebFallbackNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebFallbackNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for WebFallbackNode {
    fn id(&self) -> &'static str {
        "web_fallback"
    }

    fn name(&self) -> &'static str {
        "Web Fallback"
    }

    async fn execute(
        &self,
        state: &mut QueryState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError> {
        let results = match ctx.search.search(&state.question).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!("Web search failed: {}", err);
                state.answer = Some(Answer::error(format!(
                    "Your document didn't contain the answer, and web search failed: {}",
                    err
                )));
                return Ok(NodeOutput::Final);
            }
        };

        let messages = vec![
            ChatMessage::system(web_prompt(&results)),
            ChatMessage::user(state.question.clone()),
        ];

        let content = match ctx.completions.complete(messages).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Web-fallback completion failed: {}", err);
                state.answer = Some(Answer::error(err.to_string()));
                return Ok(NodeOutput::Final);
            }
        };

        state.answer = Some(Answer::new(
            with_disclosure(content.trim()),
            Provenance::WebFallback,
        ));
        Ok(NodeOutput::Final)
    }
}

fn web_prompt(results: &str) -> String {
    format!(
        "You are a helpful assistant. The user's document did not contain the \
answer, so we searched the internet.

Instructions:
1. Answer the question using only the web search results below.
2. You MUST start your response with this exact phrase:
   \"{WEB_SOURCE_DISCLOSURE}\"

Web Search Results:
{results}"
    )
}

/// The model is instructed to prefix the disclosure, but the guarantee is
/// enforced here rather than trusted.
fn with_disclosure(content: &str) -> String {
    if content.starts_with(WEB_SOURCE_DISCLOSURE) {
        content.to_string()
    } else {
        format!("{WEB_SOURCE_DISCLOSURE}\n{content}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_disclosure_is_prepended() {
        let out = with_disclosure("The answer is 42.");
        assert!(out.starts_with(WEB_SOURCE_DISCLOSURE));
        assert!(out.ends_with("The answer is 42."));
    }

    #[test]
    fn present_disclosure_is_kept_once() {
        let already = format!("{WEB_SOURCE_DISCLOSURE}\nThe answer is 42.");
        let out = with_disclosure(&already);
        assert_eq!(out, already);
        assert_eq!(out.matches(WEB_SOURCE_DISCLOSURE).count(), 1);
    }
}
