//! Configuration for the paperscope service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage layout configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Validate configuration at startup
    ///
    /// An overlap >= chunk size means the splitter never makes progress, so
    /// it is rejected here rather than looping at ingest time.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chunk_size == 0 {
            return Err(Error::Config("chunking.max_chunk_size must be > 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.max_chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be strictly less than max_chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.max_chunk_size
            )));
        }
        if self.retrieval.section_top_k == 0 || self.retrieval.chat_top_k == 0 {
            return Err(Error::Config("retrieval top_k values must be >= 1".to_string()));
        }
        if self.retrieval.max_context_chars == 0 {
            return Err(Error::Config("retrieval.max_context_chars must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Storage layout configuration
///
/// All durable state lives under `data_dir`, partitioned by document id:
/// `uploads/<id>.md`, `index/<id>.json`, `sections/<id>.json`, plus the
/// `documents.json` registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploads, indexes, and cached sections
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("paperscope");
        Self { data_dir }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 600,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Chunks retrieved per section category
    pub section_top_k: usize,
    /// Chunks retrieved per chat question
    pub chat_top_k: usize,
    /// Context budget in characters for section generation
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            section_top_k: 2,
            chat_top_k: 3,
            max_context_chars: 3000,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Generation budget in tokens (num_predict)
    pub max_output_tokens: u32,
    /// Context window size in tokens (num_ctx)
    pub context_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "mistral".to_string(),
            temperature: 0.2,
            max_output_tokens: 300,
            context_size: 2048,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.max_chunk_size, 600);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.retrieval.section_top_k, 2);
        assert_eq!(config.retrieval.chat_top_k, 3);
    }

    #[test]
    fn test_overlap_must_be_less_than_chunk_size() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = 600;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.chat_top_k = 0;
        assert!(config.validate().is_err());
    }
}
