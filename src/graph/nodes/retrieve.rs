// Retrieve Node
// Pulls the session's nearest passages for the question.

use async_trait::async_trait;

use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::{Answer, QueryState};

pub struct RetrieveNode;

impl RetrieveNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RetrieveNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for RetrieveNode {
    fn id(&self) -> &'static str {
        "retrieve"
    }

    fn name(&self) -> &'static str {
        "Passage Retrieval"
    }

    async fn execute(
        &self,
        state: &mut QueryState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError> {
        match ctx.retriever.retrieve(&state.namespace, &state.question).await {
            Ok(context) => {
                state.context = Some(context);
                Ok(NodeOutput::Continue(None))
            }
            Err(err) => {
                tracing::warn!(
                    "Retrieval failed for namespace {}: {}",
                    state.namespace,
                    err
                );
                state.answer = Some(Answer::error(format!(
                    "Could not search your document: {}",
                    err
                )));
                Ok(NodeOutput::Final)
            }
        }
    }
}
