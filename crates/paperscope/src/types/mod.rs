//! Core domain and API types

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document};
pub use query::{AnalyzeRequest, ChatRequest};
pub use response::{ChatResponse, SectionResult, SourceRef, UploadResponse};
