//! In-process memoization of text embeddings.
//!
//! Embedding the same chunk or question twice is pure waste, so the
//! pipeline routes every embedding call through an [`EmbeddingCache`] keyed
//! by exact text content. The cache has no eviction policy and lives for
//! the process lifetime; an unbounded map is an accepted limitation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// An in-process embedding cache keyed by exact text content.
///
/// The map is guarded by a `tokio::sync::RwLock` for interior mutability.
/// The agent drives it from a single task; concurrent writers for the same
/// key can each compute the embedding once before one insert wins, which is
/// wasteful but not incorrect for a deterministic embedder.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, Vec<f32>>>,
}

impl EmbeddingCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached embedding for `text`, if any.
    pub async fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.entries.read().await.get(text).cloned()
    }

    /// Store an embedding for `text`, replacing any existing entry.
    pub async fn insert(&self, text: &str, embedding: Vec<f32>) {
        self.entries.write().await.insert(text.to_string(), embedding);
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop all cached entries.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// An [`EmbeddingProvider`] that memoizes an inner provider through an
/// [`EmbeddingCache`].
///
/// On a hit the inner provider is not called at all. Batch requests are
/// split into hits and misses; only the misses are forwarded, in one inner
/// batch call, and the results are merged back in input order.
pub struct CachedEmbedder<P> {
    inner: P,
    cache: EmbeddingCache,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    /// Wrap `inner` with a fresh cache.
    pub fn new(inner: P) -> Self {
        Self { inner, cache: EmbeddingCache::new() }
    }

    /// Wrap `inner` with an existing cache.
    pub fn with_cache(inner: P, cache: EmbeddingCache) -> Self {
        Self { inner, cache }
    }

    /// The cache backing this embedder.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.get(text).await {
            debug!(text_len = text.len(), "embedding cache hit");
            return Ok(cached);
        }
        let embedding = self.inner.embed(text).await?;
        self.cache.insert(text, embedding.clone()).await;
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut miss_positions = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            match self.cache.get(text).await {
                Some(cached) => results.push(Some(cached)),
                None => {
                    results.push(None);
                    miss_positions.push(i);
                }
            }
        }

        if !miss_positions.is_empty() {
            let misses: Vec<&str> = miss_positions.iter().map(|&i| texts[i]).collect();
            debug!(total = texts.len(), misses = misses.len(), "embedding batch");
            let computed = self.inner.embed_batch(&misses).await?;
            for (&pos, embedding) in miss_positions.iter().zip(computed) {
                self.cache.insert(texts[pos], embedding.clone()).await;
                results[pos] = Some(embedding);
            }
        }

        // Every slot is filled: hits above, misses just now.
        Ok(results.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts how many texts the inner provider was asked to embed.
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn identical_text_computes_exactly_once() {
        let embedder = CachedEmbedder::new(CountingProvider::new());
        let first = embedder.embed("hello world").await.unwrap();
        let second = embedder.embed("hello world").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(embedder.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_texts_compute_separately() {
        let embedder = CachedEmbedder::new(CountingProvider::new());
        embedder.embed("one").await.unwrap();
        embedder.embed("two").await.unwrap();
        assert_eq!(embedder.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(embedder.cache().len().await, 2);
    }

    #[tokio::test]
    async fn batch_computes_only_misses_in_order() {
        let embedder = CachedEmbedder::new(CountingProvider::new());
        embedder.embed("bb").await.unwrap();

        let results = embedder.embed_batch(&["a", "bb", "ccc"]).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], vec![1.0, 1.0]);
        assert_eq!(results[1], vec![2.0, 1.0]);
        assert_eq!(results[2], vec![3.0, 1.0]);
        // "bb" was already cached, so only "a" and "ccc" hit the provider.
        assert_eq!(embedder.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn clear_forces_recompute() {
        let embedder = CachedEmbedder::new(CountingProvider::new());
        embedder.embed("text").await.unwrap();
        embedder.cache().clear().await;
        assert!(embedder.cache().is_empty().await);
        embedder.embed("text").await.unwrap();
        assert_eq!(embedder.inner.calls.load(Ordering::SeqCst), 2);
    }
}
