//! Answer composition as a small state graph.
//!
//! One pass per query: `retrieve` fills the context, `grounded` asks the
//! model to answer from it, and an insufficiency signal branches to
//! `web_fallback`. Every pass ends with an [`state::Answer`] in the state;
//! collaborator failures never escape the graph.

pub mod node;
pub mod nodes;
pub mod runtime;
pub mod state;

pub use node::{GraphError, Node, NodeContext, NodeOutput};
pub use runtime::{GraphBuilder, GraphRuntime};

use nodes::{GroundedAnswerNode, RetrieveNode, WebFallbackNode};

/// Build the answer graph: retrieve -> grounded -> (on "web") web_fallback.
pub fn build_answer_graph() -> Result<GraphRuntime, GraphError> {
    GraphBuilder::new()
        .entry("retrieve")
        .max_steps(8)
        .node(Box::new(RetrieveNode::new()))
        .node(Box::new(GroundedAnswerNode::new()))
        .node(Box::new(WebFallbackNode::new()))
        .edge("retrieve", "grounded")
        .conditional_edge("grounded", "web_fallback", "web")
        .build()
}
