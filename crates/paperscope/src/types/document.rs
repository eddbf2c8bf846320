//! Document and chunk types with provenance for citations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A paper that has been uploaded and converted to text
///
/// Created once at upload time and immutable afterwards; there is no delete
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID, generated at upload
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// SHA-256 hash of the converted text
    pub content_hash: String,
    /// Number of chunks created at ingest
    pub total_chunks: u32,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(filename: String, content_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            content_hash,
            total_chunks: 0,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A contiguous slice of a document's converted text
///
/// Chunks are produced transiently by the chunker and owned by the vector
/// index once built. `chunk_index` is always assigned (sequential within the
/// document) so provenance in answers is never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content, structural separators included
    pub content: String,
    /// Owning document ID; never nil
    pub source: Uuid,
    /// Position of this chunk within the document
    pub chunk_index: u32,
    /// Character offsets into the converted text
    pub char_start: usize,
    pub char_end: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        source: Uuid,
        content: String,
        chunk_index: u32,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self {
            content,
            source,
            chunk_index,
            char_start,
            char_end,
        }
    }
}
