//! Deterministic offline backends for demos and tests.

use async_trait::async_trait;

use askdocs_rag::{EmbeddingProvider, Result, TextGenerator};

/// Deterministic hash-based embeddings requiring no API keys.
///
/// The vector direction depends only on the text content, so identical
/// text always lands on the same point and cosine search behaves
/// consistently across runs. Useful for demos and tests, not for real
/// semantic similarity.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb: Vec<f32> =
            (0..self.dimensions).map(|i| ((hash.wrapping_add(i as u64)) as f32).sin()).collect();
        // L2-normalize so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A [`TextGenerator`] that returns a fixed placeholder response.
///
/// Stands in when no generation backend is configured, so the rest of the
/// pipeline (retrieval, confidence, citations) still works end to end.
#[derive(Debug, Clone)]
pub struct StaticResponder {
    response: String,
}

impl StaticResponder {
    /// Create a responder with the default placeholder text.
    pub fn new() -> Self {
        Self {
            response: "This is a placeholder response. Configure a generation backend to \
                       produce real answers."
                .to_string(),
        }
    }

    /// Create a responder with a custom fixed response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

impl Default for StaticResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for StaticResponder {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}
