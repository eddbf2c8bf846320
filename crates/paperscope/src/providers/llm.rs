//! Generation provider trait

use async_trait::async_trait;

use crate::error::Result;

/// External capability mapping a prompt string to a generated string
///
/// Synchronous single-shot contract: no streaming, output bounded by the
/// provider's configured generation budget. Errors and timeouts surface as
/// `GenerationFailed`.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// The model being used, for logging
    fn model(&self) -> &str;
}
