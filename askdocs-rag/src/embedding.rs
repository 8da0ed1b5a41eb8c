//! Embedding provider trait for turning text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A backend that maps text to fixed-length float vectors.
///
/// Implementations wrap a specific embedding service or model behind a
/// unified async interface. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) once per input; backends with native
/// batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of text inputs, preserving input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of vectors produced by this provider.
    fn dimensions(&self) -> usize;
}
