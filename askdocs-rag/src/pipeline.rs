//! Retrieval pipeline: chunk → embed → store, and embed → search → filter.
//!
//! [`RagPipeline`] composes a [`Chunker`], an [`EmbeddingProvider`]
//! (normally a [`CachedEmbedder`](crate::CachedEmbedder)), and a
//! [`VectorStore`]. The question-answering agent sits on top of it.

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Document, IndexReport, RetrievedMatch};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The retrieval pipeline.
///
/// Construct one via [`RagPipeline::builder()`]. All external calls run
/// sequentially in the caller's task; a hung backend call blocks the
/// operation that issued it.
pub struct RagPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The vector store backing this pipeline.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Index documents: chunk each, embed the chunks, upsert them.
    ///
    /// Indexing is fail-fast: the first failure aborts the remaining batch.
    /// The corpus is assumed to be consistent, so a partial index is worth
    /// reporting rather than papering over.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexAborted`] carrying the number of chunks
    /// stored before the failure.
    pub async fn index_documents(&self, documents: &[Document]) -> Result<IndexReport> {
        let mut indexed = 0;

        for document in documents {
            let mut chunks = self.chunker.chunk(document);
            if chunks.is_empty() {
                info!(source = %document.source, chunk_count = 0, "skipped empty document");
                continue;
            }

            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
                error!(source = %document.source, error = %e, "embedding failed during indexing");
                RagError::IndexAborted {
                    indexed,
                    message: format!("embedding failed for '{}': {e}", document.source),
                }
            })?;
            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }

            self.store.upsert(&chunks).await.map_err(|e| {
                error!(source = %document.source, error = %e, "upsert failed during indexing");
                RagError::IndexAborted {
                    indexed,
                    message: format!("upsert failed for '{}': {e}", document.source),
                }
            })?;

            indexed += chunks.len();
            info!(source = %document.source, chunk_count = chunks.len(), "indexed document");
        }

        Ok(IndexReport { documents: documents.len(), chunks: indexed })
    }

    /// Retrieve matches for a question: embed, search, filter, rank.
    ///
    /// Hits below `min_similarity` are dropped, the rest truncated to
    /// `top_k` and ranked from 0 in descending-score order. `None` for
    /// either parameter falls back to the configured value.
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: Option<usize>,
        min_similarity: Option<f32>,
    ) -> Result<Vec<RetrievedMatch>> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        let min_similarity = min_similarity.unwrap_or(self.config.similarity_threshold);

        let embedding = self.embedder.embed(question).await?;
        let hits = self.store.search(&embedding, top_k).await?;
        let total = hits.len();

        let matches: Vec<RetrievedMatch> = hits
            .into_iter()
            .filter(|hit| hit.score >= min_similarity)
            .take(top_k)
            .enumerate()
            .map(|(rank, hit)| RetrievedMatch { chunk: hit.chunk, score: hit.score, rank })
            .collect();

        info!(kept = matches.len(), total, "retrieval completed");
        Ok(matches)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build) to
/// validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let store = self.store.ok_or_else(|| RagError::Config("store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;

        Ok(RagPipeline { config, embedder, store, chunker })
    }
}
