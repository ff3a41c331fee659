//! Answer Composer facade over the answer graph.

use std::sync::Arc;

use crate::core::errors::CoreError;
use crate::graph::state::{Answer, QueryState};
use crate::graph::{build_answer_graph, GraphRuntime, NodeContext};
use crate::llm::CompletionService;
use crate::retrieval::Retriever;
use crate::tools::search::WebSearch;

/// Decides, per query, whether the retrieved context answers the question,
/// falling back to disclosed web search when it does not.
///
/// `answer` is infallible by contract: every collaborator failure is
/// converted into an `error`-provenance [`Answer`].
pub struct AnswerComposer {
    graph: GraphRuntime,
    retriever: Retriever,
    completions: CompletionService,
    search: Arc<dyn WebSearch>,
}

impl AnswerComposer {
    pub fn new(
        retriever: Retriever,
        completions: CompletionService,
        search: Arc<dyn WebSearch>,
    ) -> Result<Self, CoreError> {
        let graph = build_answer_graph().map_err(CoreError::internal)?;
        Ok(Self {
            graph,
            retriever,
            completions,
            search,
        })
    }

    pub async fn answer(&self, namespace: &str, question: &str) -> Answer {
        let mut state = QueryState::new(namespace, question);
        let ctx = NodeContext {
            retriever: &self.retriever,
            completions: &self.completions,
            search: self.search.as_ref(),
        };

        match self.graph.run(&mut state, &ctx).await {
            Ok(()) => state
                .answer
                .unwrap_or_else(|| Answer::error("composer finished without an answer")),
            Err(err) => {
                tracing::error!("Answer graph failed: {}", err);
                Answer::error(err.to_string())
            }
        }
    }
}
