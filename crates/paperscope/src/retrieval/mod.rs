//! Retrieval: per-document vector index and the query contract over it

mod index;

pub use index::{ScoredChunk, VectorIndex, INDEX_SCHEMA_VERSION};

use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::providers::TextEncoder;

/// Top-k similarity retrieval over a document's persisted index
///
/// The single query path shared by section generation and chat; `k` is
/// caller-supplied because required context breadth differs by consumer
/// (2 for section extraction, 3 for chat, up to 5 for exploration).
pub struct Retriever {
    index_dir: PathBuf,
    encoder: Arc<dyn TextEncoder>,
}

impl Retriever {
    /// Create a retriever over the given index directory
    pub fn new(index_dir: PathBuf, encoder: Arc<dyn TextEncoder>) -> Self {
        Self { index_dir, encoder }
    }

    /// Retrieve the `k` chunks most similar to `query`, best match first
    ///
    /// Loads the document's index fresh, verifies it was built with the
    /// current encoder, encodes the query, and scans. `NotFound` when no
    /// index exists for the document.
    pub async fn retrieve(
        &self,
        document_id: Uuid,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let index = VectorIndex::load(&self.index_dir, document_id)?;
        index.ensure_encoder(&self.encoder.identity())?;

        let query_vector = self.encoder.encode(query).await?;
        let results = index.search(&query_vector, k);

        tracing::debug!(
            "Retrieved {}/{} chunks for document {} (k={})",
            results.len(),
            index.len(),
            document_id,
            k
        );
        Ok(results)
    }
}
