// petgraph-based execution engine for the answer graph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::node::{GraphError, Node, NodeContext, NodeOutput};
use super::state::QueryState;

/// Edge condition for routing between nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeCondition {
    /// Default edge, followed when no condition is in play.
    Always,
    /// Followed when the node branches with this label.
    OnCondition(String),
}

impl EdgeCondition {
    pub fn on(condition: impl Into<String>) -> Self {
        Self::OnCondition(condition.into())
    }
}

pub struct GraphRuntime {
    graph: DiGraph<Box<dyn Node>, EdgeCondition>,
    node_indices: HashMap<String, NodeIndex>,
    entry_node_id: String,
    max_steps: usize,
}

impl GraphRuntime {
    /// Run one pass over the graph, mutating `state` as nodes execute.
    pub async fn run(
        &self,
        state: &mut QueryState,
        ctx: &NodeContext<'_>,
    ) -> Result<(), GraphError> {
        let mut current_idx = *self
            .node_indices
            .get(&self.entry_node_id)
            .ok_or_else(|| {
                GraphError::new("runtime", format!("entry node not found: {}", self.entry_node_id))
            })?;

        for _step in 0..self.max_steps {
            let node = self
                .graph
                .node_weight(current_idx)
                .ok_or_else(|| GraphError::new("runtime", "node missing from graph"))?;

            tracing::debug!("Executing node: {}", node.id());
            let output = node.execute(state, ctx).await?;

            match output {
                NodeOutput::Final => return Ok(()),
                NodeOutput::Continue(explicit) => {
                    current_idx = self.next_node(current_idx, None, explicit.as_deref())?;
                }
                NodeOutput::Branch(condition) => {
                    current_idx = self.next_node(current_idx, Some(&condition), None)?;
                }
            }
        }

        Err(GraphError::new(
            "runtime",
            format!("maximum steps ({}) exceeded", self.max_steps),
        ))
    }

    fn next_node(
        &self,
        current_idx: NodeIndex,
        condition: Option<&str>,
        explicit: Option<&str>,
    ) -> Result<NodeIndex, GraphError> {
        let current_id = self
            .graph
            .node_weight(current_idx)
            .map(|n| n.id())
            .unwrap_or("unknown");

        if let Some(next_id) = explicit {
            return self.node_indices.get(next_id).copied().ok_or_else(|| {
                GraphError::new(current_id, format!("target node not found: {}", next_id))
            });
        }

        let edges: Vec<(NodeIndex, &EdgeCondition)> = self
            .graph
            .edges_directed(current_idx, Direction::Outgoing)
            .map(|edge| (edge.target(), edge.weight()))
            .collect();

        if let Some(cond) = condition {
            for (target, weight) in &edges {
                if matches!(weight, EdgeCondition::OnCondition(expected) if expected.as_str() == cond)
                {
                    return Ok(*target);
                }
            }
        }

        for (target, weight) in &edges {
            if **weight == EdgeCondition::Always {
                return Ok(*target);
            }
        }

        Err(GraphError::new(
            current_id,
            format!("no matching edge for condition {:?}", condition),
        ))
    }
}

/// Fluent builder for the graph.
pub struct GraphBuilder {
    runtime: GraphRuntime,
    pending_edges: Vec<(String, String, EdgeCondition)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            runtime: GraphRuntime {
                graph: DiGraph::new(),
                node_indices: HashMap::new(),
                entry_node_id: String::new(),
                max_steps: 8,
            },
            pending_edges: Vec::new(),
        }
    }

    pub fn entry(mut self, node_id: impl Into<String>) -> Self {
        self.runtime.entry_node_id = node_id.into();
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.runtime.max_steps = max_steps;
        self
    }

    pub fn node(mut self, node: Box<dyn Node>) -> Self {
        let id = node.id().to_string();
        let index = self.runtime.graph.add_node(node);
        self.runtime.node_indices.insert(id, index);
        self
    }

    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.pending_edges
            .push((from.into(), to.into(), EdgeCondition::Always));
        self
    }

    pub fn conditional_edge(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        self.pending_edges
            .push((from.into(), to.into(), EdgeCondition::on(condition)));
        self
    }

    pub fn build(mut self) -> Result<GraphRuntime, GraphError> {
        for (from, to, condition) in self.pending_edges {
            let from_idx = *self
                .runtime
                .node_indices
                .get(&from)
                .ok_or_else(|| GraphError::new(&from, format!("source node not found: {}", from)))?;
            let to_idx = *self
                .runtime
                .node_indices
                .get(&to)
                .ok_or_else(|| GraphError::new(&to, format!("target node not found: {}", to)))?;
            self.runtime.graph.add_edge(from_idx, to_idx, condition);
        }
        Ok(self.runtime)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
