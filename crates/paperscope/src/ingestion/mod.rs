//! Document ingestion pipeline: conversion, hashing, chunking

mod chunker;
mod convert;

pub use chunker::MarkdownChunker;
pub use convert::{DocumentConverter, PdfConverter};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Upload-time pipeline: convert bytes to text, hash, chunk
pub struct IngestPipeline {
    chunker: MarkdownChunker,
}

/// Output of a successful conversion
#[derive(Debug)]
pub struct IngestedDocument {
    /// The new document record (chunk count still zero; filled in after
    /// the index is built from the persisted text)
    pub document: Document,
    /// Converted text, persisted alongside the index
    pub text: String,
}

impl IngestPipeline {
    /// Create a pipeline from chunking configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunker: MarkdownChunker::new(config.max_chunk_size, config.chunk_overlap),
        }
    }

    /// Convert one uploaded file and mint its document record
    pub fn ingest(
        &self,
        converter: &dyn DocumentConverter,
        data: &[u8],
        filename: &str,
    ) -> Result<IngestedDocument> {
        let text = converter.convert(data, filename)?;
        if text.trim().is_empty() {
            return Err(Error::conversion(format!(
                "'{}': conversion produced no text",
                filename
            )));
        }

        let content_hash = hash_content(&text);
        let document = Document::new(filename.to_string(), content_hash);

        Ok(IngestedDocument { document, text })
    }

    /// Chunk converted text for a document
    pub fn chunk(&self, text: &str, document_id: Uuid) -> Vec<Chunk> {
        self.chunker.chunk(text, document_id)
    }
}

/// SHA-256 hex digest of converted text
pub fn hash_content(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;

    struct FixedConverter(&'static str);

    impl DocumentConverter for FixedConverter {
        fn convert(&self, _data: &[u8], _filename: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_ingest_mints_document_record() {
        let pipeline = IngestPipeline::new(&ChunkingConfig::default());
        let converter = FixedConverter("A paper.\n\nWith two paragraphs.");
        let ingested = pipeline.ingest(&converter, b"%PDF", "paper.pdf").unwrap();
        assert_eq!(ingested.document.filename, "paper.pdf");
        assert_eq!(ingested.document.total_chunks, 0);
        assert_eq!(ingested.document.content_hash, hash_content(&ingested.text));
    }

    #[test]
    fn test_ingest_rejects_empty_conversion() {
        let pipeline = IngestPipeline::new(&ChunkingConfig::default());
        let converter = FixedConverter("   \n\n  ");
        let err = pipeline.ingest(&converter, b"%PDF", "blank.pdf").unwrap_err();
        assert!(matches!(err, Error::ConversionFailed(_)));
    }

    #[test]
    fn test_chunk_tags_document_id() {
        let pipeline = IngestPipeline::new(&ChunkingConfig::default());
        let id = Uuid::new_v4();
        let chunks = pipeline.chunk("Some body text.", id);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, id);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }
}
