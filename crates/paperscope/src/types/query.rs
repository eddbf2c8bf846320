//! Request types for the HTTP surface

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for POST /analyze_sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Document to analyze
    pub document_id: Uuid,
}

/// Request body for POST /chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Document to answer from
    pub document_id: Uuid,
    /// The question to answer
    pub question: String,
}
