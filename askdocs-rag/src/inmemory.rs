//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps chunks in a `HashMap` behind a
//! `tokio::sync::RwLock`. It backs the tests and keyless demo runs; real
//! deployments use the remote store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchHit};
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// An in-memory vector store using cosine similarity for search.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    chunks: RwLock<HashMap<String, Chunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    /// Whether the store holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        let mut store = self.chunks.write().await;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let store = self.chunks.read().await;
        let mut scored: Vec<SearchHit> = store
            .values()
            .map(|chunk| SearchHit {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn clear(&self) -> Result<()> {
        self.chunks.write().await.clear();
        Ok(())
    }
}
