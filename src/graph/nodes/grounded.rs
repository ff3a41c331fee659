// Grounded Answer Node
// Asks the model to answer from the retrieved document context, or to
// signal insufficiency via the sentinel marker.

use async_trait::async_trait;

use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::{Answer, Provenance, QueryState};
use crate::llm::ChatMessage;

/// Exact token the model outputs when the context cannot answer the
/// question; seeing it routes the query to web fallback.
pub const INSUFFICIENT_CONTEXT_MARKER: &str = "NO_ANSWER";

/// Reply for a question against an empty namespace; no model call is made.
pub const EMPTY_CONTEXT_REPLY: &str = "I checked your document but couldn't find an answer.";

pub struct GroundedAnswerNode;

impl GroundedAnswerNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GroundedAnswerNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for GroundedAnswerNode {
    fn id(&self) -> &'static str {
        "grounded"
    }

    fn name(&self) -> &'static str {
        "Grounded Answer"
    }

    async fn execute(
        &self,
        state: &mut QueryState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError> {
        let context = state
            .context
            .take()
            .ok_or_else(|| GraphError::new(self.id(), "retrieve node did not run"))?;

        // Known-empty index: answer directly instead of wasting a model call.
        if context.is_empty() {
            state.answer = Some(Answer::new(EMPTY_CONTEXT_REPLY, Provenance::NoneFound));
            return Ok(NodeOutput::Final);
        }

        let messages = vec![
            ChatMessage::system(grounding_prompt(&context.text())),
            ChatMessage::user(state.question.clone()),
        ];

        let content = match ctx.completions.complete(messages).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Grounded completion failed: {}", err);
                state.answer = Some(Answer::error(err.to_string()));
                return Ok(NodeOutput::Final);
            }
        };

        if signals_insufficient_context(&content) {
            tracing::info!("Answer not in document, switching to web search");
            return Ok(NodeOutput::Branch("web".to_string()));
        }

        state.answer = Some(Answer::new(content.trim(), Provenance::DocumentGrounded));
        Ok(NodeOutput::Final)
    }
}

fn grounding_prompt(context: &str) -> String {
    format!(
        "You are a helpful assistant for analyzing a user's uploaded document \
and answering related questions.

For each question:
1. Answer strictly from the context snippets below; cite the relevant passage.
2. If the snippets do not contain the needed information, output EXACTLY the \
word: \"{INSUFFICIENT_CONTEXT_MARKER}\".
3. Keep responses clear and structured. No hallucinations.

Context Snippets:
{context}"
    )
}

/// True when the model reported insufficiency: the response, after trimming,
/// is the marker, or the marker is the entirety of its substantive content.
fn signals_insufficient_context(content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed == INSUFFICIENT_CONTEXT_MARKER {
        return true;
    }
    if !trimmed.contains(INSUFFICIENT_CONTEXT_MARKER) {
        return false;
    }
    trimmed
        .replace(INSUFFICIENT_CONTEXT_MARKER, "")
        .chars()
        .all(|c| !c.is_alphanumeric())
}
