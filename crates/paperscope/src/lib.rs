//! paperscope: RAG service for research papers
//!
//! Ingests a PDF paper, builds a per-document semantic index over overlapping
//! markdown-aware chunks, and answers questions or extracts structured
//! section summaries by grounding LLM output in retrieved passages.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document},
    response::{ChatResponse, SectionResult, SourceRef},
};
