//! Vector store trait for storing chunks and searching by similarity.

use async_trait::async_trait;

use crate::document::{Chunk, SearchHit};
use crate::error::Result;

/// A storage backend for embedded chunks with similarity search.
///
/// Implementations hold one logical index of [`Chunk`]s and support
/// upserting, similarity search, and clearing the index. Failures surface
/// as [`RagError::VectorStore`](crate::RagError::VectorStore) after a
/// single attempt; callers own any retry policy.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upsert chunks into the index. Chunks must have embeddings set.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// Return the `top_k` chunks most similar to `embedding`, ordered by
    /// descending score.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>>;

    /// Delete the index and all stored chunks.
    async fn clear(&self) -> Result<()>;
}
