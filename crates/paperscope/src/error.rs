//! Error types for the RAG pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// Every stage propagates failures with its kind intact; the HTTP layer maps
/// each kind to a distinct status so a client can tell "no such document"
/// apart from "the model failed".
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (invalid chunking parameters, malformed template)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing document, index, or cache artifact
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document could not be turned into text
    #[error("Document conversion failed: {0}")]
    ConversionFailed(String),

    /// Vector computation failed
    #[error("Embedding generation failed: {0}")]
    EncodingFailed(String),

    /// The generation capability errored or timed out
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Index artifact exists but could not be deserialized
    #[error("Index corrupted: {0}")]
    IndexCorrupted(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::ConversionFailed(message.into())
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::EncodingFailed(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Not found: {}", what),
            ),
            Error::ConversionFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "conversion_failed",
                msg.clone(),
            ),
            Error::EncodingFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encoding_failed",
                msg.clone(),
            ),
            Error::GenerationFailed(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_failed", msg.clone())
            }
            Error::IndexCorrupted(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "index_corrupted",
                msg.clone(),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
