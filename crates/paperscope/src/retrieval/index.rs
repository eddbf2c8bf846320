//! Per-document flat vector index with on-disk persistence

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::TextEncoder;
use crate::types::Chunk;

/// On-disk artifact format version
pub const INDEX_SCHEMA_VERSION: u32 = 1;

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (-1.0 to 1.0, higher is better)
    pub score: f32,
}

/// One indexed row: a chunk and its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexRow {
    vector: Vec<f32>,
    chunk: Chunk,
}

/// Flat vector index over one document's chunks
///
/// Rows are kept in insertion order; search is an exact scan. A single paper
/// yields tens of chunks, so a scan beats any ANN structure here while
/// keeping result order fully deterministic. The artifact pins the encoder
/// identity used at build time; querying through a different encoder is
/// rejected.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Artifact format version
    schema_version: u32,
    /// Owning document
    document_id: Uuid,
    /// Identity of the encoder the vectors were computed with
    encoder: String,
    /// Vector dimensionality
    dimensions: usize,
    /// (vector, chunk) rows in insertion order
    rows: Vec<IndexRow>,
}

impl VectorIndex {
    /// Build an index by encoding every chunk
    pub async fn build(
        document_id: Uuid,
        chunks: Vec<Chunk>,
        encoder: &dyn TextEncoder,
    ) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = encoder.encode_batch(&texts).await?;

        let rows = vectors
            .into_iter()
            .zip(chunks)
            .map(|(vector, chunk)| IndexRow { vector, chunk })
            .collect();

        Ok(Self {
            schema_version: INDEX_SCHEMA_VERSION,
            document_id,
            encoder: encoder.identity(),
            dimensions: encoder.dimensions(),
            rows,
        })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the index has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Owning document ID
    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    /// Reject a query encoder that differs from the build-time encoder
    pub fn ensure_encoder(&self, identity: &str) -> Result<()> {
        if self.encoder != identity {
            return Err(Error::Config(format!(
                "Index for {} was built with encoder '{}' but queried with '{}'",
                self.document_id, self.encoder, identity
            )));
        }
        Ok(())
    }

    /// Top-k nearest chunks by cosine similarity, best match first
    ///
    /// Ties keep insertion order (stable sort); `k` larger than the row
    /// count returns every row.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .rows
            .iter()
            .map(|row| ScoredChunk {
                chunk: row.chunk.clone(),
                score: cosine_similarity(query, &row.vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }

    /// Artifact path for a document id
    pub fn artifact_path(dir: &Path, document_id: Uuid) -> PathBuf {
        dir.join(format!("{}.json", document_id))
    }

    /// Persist the index to `dir`, keyed by document id
    ///
    /// Written to a temp file then renamed so a crashed write never leaves a
    /// half-built artifact behind.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let path = Self::artifact_path(dir, self.document_id);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string(self)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(
            "Persisted index for {} ({} chunks) to {}",
            self.document_id,
            self.rows.len(),
            path.display()
        );
        Ok(())
    }

    /// Load a previously built index
    ///
    /// A missing artifact is `NotFound` — the dominant query-time failure —
    /// and is surfaced distinctly from an unreadable one (`IndexCorrupted`).
    pub fn load(dir: &Path, document_id: Uuid) -> Result<Self> {
        let path = Self::artifact_path(dir, document_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found(format!("index for document {}", document_id)));
            }
            Err(e) => return Err(e.into()),
        };

        let index: Self = serde_json::from_str(&content)
            .map_err(|e| Error::IndexCorrupted(format!("{}: {}", path.display(), e)))?;

        if index.schema_version != INDEX_SCHEMA_VERSION {
            return Err(Error::IndexCorrupted(format!(
                "{}: unsupported schema version {}",
                path.display(),
                index.schema_version
            )));
        }

        Ok(index)
    }
}

/// Cosine similarity between two vectors
///
/// Zero-magnitude vectors score 0.0 instead of dividing by zero.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TextEncoder;
    use async_trait::async_trait;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    /// Deterministic bag-of-words stub encoder: each word increments one
    /// dimension, so shared vocabulary means higher cosine similarity.
    struct StubEncoder;

    const STUB_DIMS: usize = 16;

    #[async_trait]
    impl TextEncoder for StubEncoder {
        async fn encode(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0f32; STUB_DIMS];
            for word in text.to_lowercase().split_whitespace() {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                v[(hasher.finish() as usize) % STUB_DIMS] += 1.0;
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            STUB_DIMS
        }

        fn identity(&self) -> String {
            "stub/bag-of-words".to_string()
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn make_chunks(doc: Uuid, texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(doc, t.to_string(), i as u32, i * 100, i * 100 + t.len()))
            .collect()
    }

    #[tokio::test]
    async fn test_build_and_search_ranks_by_similarity() {
        let doc = Uuid::new_v4();
        let chunks = make_chunks(
            doc,
            &[
                "gradient descent optimizer convergence",
                "the dataset contains labeled images",
                "gradient descent with momentum",
            ],
        );
        let index = VectorIndex::build(doc, chunks, &StubEncoder).await.unwrap();

        let query = StubEncoder.encode("gradient descent").await.unwrap();
        let results = index.search(&query, 2);
        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.content.contains("gradient"));
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_search_k_larger_than_rows_returns_all() {
        let doc = Uuid::new_v4();
        let chunks = make_chunks(doc, &["alpha", "beta", "gamma"]);
        let index = VectorIndex::build(doc, chunks, &StubEncoder).await.unwrap();

        let query = StubEncoder.encode("alpha").await.unwrap();
        let results = index.search(&query, 10);
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_deterministic_order() {
        let doc = Uuid::new_v4();
        let chunks = make_chunks(doc, &["one two", "three four", "five six", "seven eight"]);
        let index = VectorIndex::build(doc, chunks, &StubEncoder).await.unwrap();

        let query = StubEncoder.encode("nine ten").await.unwrap();
        let a: Vec<u32> = index.search(&query, 4).iter().map(|r| r.chunk.chunk_index).collect();
        let b: Vec<u32> = index.search(&query, 4).iter().map(|r| r.chunk.chunk_index).collect();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let doc = Uuid::new_v4();
        // Identical content: all scores tie, insertion order must hold
        let chunks = make_chunks(doc, &["same text", "same text", "same text"]);
        let index = VectorIndex::build(doc, chunks, &StubEncoder).await.unwrap();

        let query = StubEncoder.encode("same text").await.unwrap();
        let order: Vec<u32> = index.search(&query, 3).iter().map(|r| r.chunk.chunk_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_persist_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Uuid::new_v4();
        let chunks = make_chunks(doc, &["persisted content", "more content"]);
        let index = VectorIndex::build(doc, chunks, &StubEncoder).await.unwrap();
        index.persist(dir.path()).unwrap();

        let loaded = VectorIndex::load(dir.path(), doc).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.document_id(), doc);

        let query = StubEncoder.encode("persisted content").await.unwrap();
        let results = loaded.search(&query, 1);
        assert_eq!(results[0].chunk.content, "persisted content");
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(dir.path(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_garbage_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Uuid::new_v4();
        std::fs::write(VectorIndex::artifact_path(dir.path(), doc), "not json").unwrap();
        let err = VectorIndex::load(dir.path(), doc).unwrap_err();
        assert!(matches!(err, Error::IndexCorrupted(_)));
    }

    #[tokio::test]
    async fn test_encoder_mismatch_rejected() {
        let doc = Uuid::new_v4();
        let chunks = make_chunks(doc, &["content"]);
        let index = VectorIndex::build(doc, chunks, &StubEncoder).await.unwrap();

        assert!(index.ensure_encoder("stub/bag-of-words").is_ok());
        let err = index.ensure_encoder("ollama/nomic-embed-text").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }
}
