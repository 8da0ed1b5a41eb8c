//! # askdocs-rag
//!
//! Document chunking, embedding cache, retrieval, and QA orchestration for
//! the askdocs assistant.
//!
//! The crate is a thin sequential pipeline over three external black boxes:
//! an embedding backend ([`EmbeddingProvider`]), a vector database
//! ([`VectorStore`]), and a language model ([`TextGenerator`]). The pieces
//! it owns are the chunk boundaries, the embedding cache, the confidence
//! score, and the query/chat/batch orchestration.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askdocs_rag::{
//!     CachedEmbedder, Document, FixedSizeChunker, InMemoryVectorStore,
//!     QaAgent, RagConfig, RagPipeline,
//! };
//!
//! let config = RagConfig::builder().chunk_size(800).chunk_overlap(100).build()?;
//! let pipeline = Arc::new(
//!     RagPipeline::builder()
//!         .config(config)
//!         .embedder(Arc::new(CachedEmbedder::new(my_embedder)))
//!         .store(Arc::new(InMemoryVectorStore::new()))
//!         .chunker(Arc::new(FixedSizeChunker::new(800, 100)?))
//!         .build()?,
//! );
//! pipeline.index_documents(&[Document::new("guide.md", text)]).await?;
//!
//! let mut agent = QaAgent::new(pipeline, Arc::new(my_generator));
//! let result = agent.answer("how do I configure it?").await;
//! ```

pub mod agent;
pub mod cache;
pub mod chunking;
pub mod config;
pub mod confidence;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod pipeline;
pub mod remote;
pub mod vectorstore;

pub use agent::{DEGRADED_ANSWER, NO_MATCH_ANSWER, QaAgent};
pub use cache::{CachedEmbedder, EmbeddingCache};
pub use chunking::{Chunker, FixedSizeChunker, ParagraphChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use confidence::ConfidenceScorer;
pub use document::{
    ChatTurn, Chunk, Document, IndexReport, QaResult, RetrievedMatch, SearchHit,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::TextGenerator;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use remote::{RemoteStoreConfig, RemoteVectorStore};
pub use vectorstore::VectorStore;
