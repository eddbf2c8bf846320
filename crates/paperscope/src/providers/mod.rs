//! Provider abstractions for the external text encoder and generation capability
//!
//! Both are constructed once at startup and injected as `Arc<dyn ...>` into
//! every component that needs them; no hidden global state.

pub mod encoder;
pub mod llm;
pub mod ollama;

pub use encoder::TextEncoder;
pub use llm::GenerationProvider;
pub use ollama::OllamaClient;
