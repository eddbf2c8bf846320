//! Text encoder trait for embedding generation

use async_trait::async_trait;

use crate::error::Result;

/// External capability mapping text to a fixed-length numeric vector
///
/// The same encoder (checked via `identity`) must be used to build and to
/// query a given document's index; mixing versions is rejected at query
/// time.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Encode a single text
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode multiple texts
    ///
    /// Default implementation calls `encode` sequentially.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.encode(text).await?);
        }
        Ok(vectors)
    }

    /// Vector dimensionality
    fn dimensions(&self) -> usize;

    /// Stable identifier for the encoder function/version, recorded in every
    /// index artifact built with it
    fn identity(&self) -> String;

    /// Check if the encoder is reachable
    async fn health_check(&self) -> Result<bool>;
}
