//! Response types for the HTTP surface

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Chunk;

/// Provenance metadata for a chunk that was placed in generation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Owning document ID
    pub document_id: Uuid,
    /// Chunk position within the document
    pub chunk_index: u32,
    /// Character offsets into the converted text
    pub char_start: usize,
    pub char_end: usize,
}

impl SourceRef {
    /// Create a source reference from a chunk
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            document_id: chunk.source,
            chunk_index: chunk.chunk_index,
            char_start: chunk.char_start,
            char_end: chunk.char_end,
        }
    }
}

/// A generated section summary for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    /// Generated text, recorded verbatim
    pub content: String,
    /// Indices of the chunks that were placed in context
    pub source_chunks: Vec<u32>,
}

/// Response from POST /upload_pdf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Newly assigned document ID
    pub document_id: Uuid,
    /// Original filename
    pub filename: String,
    /// Number of chunks indexed
    pub total_chunks: u32,
}

/// Response from POST /chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated answer, returned verbatim
    pub answer: String,
    /// Provenance of the chunks placed in context, best match first
    pub sources: Vec<SourceRef>,
}

/// Summary of a registered document (GET /documents)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID
    pub id: Uuid,
    /// Filename
    pub filename: String,
    /// Number of chunks indexed
    pub total_chunks: u32,
    /// When the document was ingested
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl From<&super::document::Document> for DocumentSummary {
    fn from(doc: &super::document::Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            total_chunks: doc.total_chunks,
            ingested_at: doc.ingested_at,
        }
    }
}
