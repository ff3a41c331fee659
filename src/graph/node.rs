// Node trait and types for the answer graph.

use async_trait::async_trait;

use crate::llm::CompletionService;
use crate::retrieval::Retriever;
use crate::tools::search::WebSearch;

use super::state::QueryState;

/// External collaborators available to nodes during one pass.
pub struct NodeContext<'a> {
    pub retriever: &'a Retriever,
    pub completions: &'a CompletionService,
    pub search: &'a dyn WebSearch,
}

/// Output from a node execution.
#[derive(Debug, Clone)]
pub enum NodeOutput {
    /// Continue to the next node (None = follow the default edge).
    Continue(Option<String>),
    /// Follow the conditional edge matching this label.
    Branch(String),
    /// Pass complete; the state carries the answer.
    Final,
}

/// Graph wiring or execution error. Nodes contain collaborator failures
/// themselves; this surfaces only when the graph itself is broken.
#[derive(Debug, Clone)]
pub struct GraphError {
    pub node_id: String,
    pub message: String,
}

impl GraphError {
    pub fn new(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph error in {}: {}", self.node_id, self.message)
    }
}

impl std::error::Error for GraphError {}

#[async_trait]
pub trait Node: Send + Sync {
    /// Unique identifier for this node.
    fn id(&self) -> &'static str;

    /// Human-readable name for logs.
    fn name(&self) -> &'static str {
        self.id()
    }

    async fn execute(
        &self,
        state: &mut QueryState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError>;
}
