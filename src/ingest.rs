//! Document ingestion: bytes -> text -> passages -> namespaced index write.

use std::sync::Arc;

use crate::core::errors::CoreError;
use crate::document::{loader, segment, SegmenterConfig};
use crate::index::NamespaceIndex;

pub struct IngestPipeline {
    segmenter: SegmenterConfig,
    index: Arc<NamespaceIndex>,
}

impl IngestPipeline {
    pub fn new(segmenter: SegmenterConfig, index: Arc<NamespaceIndex>) -> Self {
        Self { segmenter, index }
    }

    /// Ingest one PDF into the session's namespace and return the passage
    /// count. Any failure aborts the ingestion; nothing is marked ingested
    /// here, so the caller may retry.
    pub async fn ingest(
        &self,
        namespace: &str,
        source: &str,
        bytes: &[u8],
    ) -> Result<usize, CoreError> {
        let text = loader::extract_text(bytes)?;
        let passages = segment(&text, &self.segmenter, source)?;

        tracing::info!(
            "Ingesting {} passages from {} into namespace {}",
            passages.len(),
            source,
            namespace
        );

        self.index.write(namespace, &passages).await?;
        Ok(passages.len())
    }
}
