use std::sync::Arc;
use std::time::Duration;

use crate::composer::AnswerComposer;
use crate::core::config::{service::section_from, AppPaths, ConfigService};
use crate::core::errors::CoreError;
use crate::document::SegmenterConfig;
use crate::embedding::{EmbeddingConfig, HttpEmbedder};
use crate::index::remote::{IndexConfig, RemoteVectorIndex};
use crate::index::NamespaceIndex;
use crate::ingest::IngestPipeline;
use crate::llm::{CompletionConfig, CompletionService, HttpCompletionProvider};
use crate::retrieval::{RetrievalConfig, Retriever};
use crate::session::SessionManager;
use crate::tools::search::{DuckDuckGoSearch, SearchConfig};

/// Global application state shared across all routes.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: ConfigService,
    pub sessions: SessionManager,
    pub ingest: IngestPipeline,
    pub composer: AnswerComposer,
}

impl AppState {
    /// Wire the external collaborators (index, embedder, completion model,
    /// web search) from configuration and assemble the pipeline.
    pub fn initialize() -> Result<Arc<Self>, CoreError> {
        let paths = Arc::new(AppPaths::new());
        let config = ConfigService::new(paths.clone());
        let loaded = config.load();

        let index_cfg: IndexConfig = section_from(&loaded, "index");
        let embedding_cfg: EmbeddingConfig = section_from(&loaded, "embedding");
        let completion_cfg: CompletionConfig = section_from(&loaded, "completion");
        let search_cfg: SearchConfig = section_from(&loaded, "search");
        let segmenter_cfg: SegmenterConfig = section_from(&loaded, "segmenter");
        let retrieval_cfg: RetrievalConfig = section_from(&loaded, "retrieval");

        let embedder = Arc::new(HttpEmbedder::new(embedding_cfg)?);
        let remote_index = Arc::new(RemoteVectorIndex::new(index_cfg.clone())?);
        let index = Arc::new(NamespaceIndex::new(
            embedder,
            remote_index,
            index_cfg.dimension,
            retrieval_cfg.top_k,
        ));

        let retriever = Retriever::new(index.clone(), retrieval_cfg);
        let completions = CompletionService::new(
            Arc::new(HttpCompletionProvider::new(completion_cfg.clone())?),
            completion_cfg.max_retries,
            Duration::from_millis(completion_cfg.retry_backoff_ms),
        );
        let search = Arc::new(DuckDuckGoSearch::new(search_cfg)?);

        let composer = AnswerComposer::new(retriever, completions, search)?;
        let sessions = SessionManager::new(index.clone());
        let ingest = IngestPipeline::new(segmenter_cfg, index);

        Ok(Arc::new(AppState {
            paths,
            config,
            sessions,
            ingest,
            composer,
        }))
    }
}
