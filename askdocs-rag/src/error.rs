//! Error types for the `askdocs-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing or answering questions.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid chunking parameters or missing required settings.
    ///
    /// Configuration errors are fatal and surfaced immediately; nothing
    /// retries them.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The embedding backend failed or returned an unusable response.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store backend was unreachable or rejected a request.
    ///
    /// Remote failures are reported after a single attempt; there is no
    /// automatic retry.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The text generation backend failed.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generation backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An indexing batch was aborted partway through.
    ///
    /// Indexing is fail-fast: the first chunk that cannot be stored aborts
    /// the remaining batch. `indexed` reports how many chunks had already
    /// been stored when the failure occurred.
    #[error("Indexing aborted after {indexed} chunks: {message}")]
    IndexAborted {
        /// Number of chunks successfully stored before the failure.
        indexed: usize,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
