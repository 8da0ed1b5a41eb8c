//! Data types for documents, chunks, and retrieval results.

use serde::{Deserialize, Serialize};

/// A source document before chunking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The full text content of the document.
    pub text: String,
    /// Human-readable origin of the document (usually a file name).
    pub source: String,
}

impl Document {
    /// Create a document whose id is derived from its source name.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        let source = source.into();
        Self { id: source.clone(), text: text.into(), source }
    }
}

/// A bounded segment of a [`Document`], the unit of indexing and retrieval.
///
/// Chunk ids follow the `{source}::chunk-{chunk_index}` format so a chunk
/// can always be traced back to its position in the source. `chunk_index`
/// values for a given source are contiguous starting at 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the
    /// pipeline attaches one.
    pub embedding: Vec<f32>,
    /// The source this chunk was cut from.
    pub source: String,
    /// Position of this chunk within its source, starting at 0.
    pub chunk_index: usize,
}

impl Chunk {
    /// Create a chunk for the given source and position, with no embedding.
    pub fn new(source: &str, chunk_index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("{source}::chunk-{chunk_index}"),
            text: text.into(),
            embedding: Vec::new(),
            source: source.to_string(),
            chunk_index,
        }
    }
}

/// A raw similarity hit returned by a vector store, before filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The stored chunk.
    pub chunk: Chunk,
    /// Similarity score reported by the backend (higher is closer).
    pub score: f32,
}

/// A retrieved chunk that survived threshold filtering, with its rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedMatch {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Similarity score reported by the backend (higher is closer).
    pub score: f32,
    /// Position in the filtered result list, 0 being the best match.
    /// Assigned at retrieval time, never persisted.
    pub rank: usize,
}

/// The outcome of one question-answering round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResult {
    /// The question as asked.
    pub question: String,
    /// The generated (or fallback) answer.
    pub answer: String,
    /// Matches the answer was grounded on, in rank order.
    pub sources: Vec<RetrievedMatch>,
    /// Trust in the answer derived from retrieval evidence, in `[0, 1]`.
    pub confidence: f32,
}

/// One completed question/answer exchange in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    /// The question as asked.
    pub question: String,
    /// The answer that was produced.
    pub answer: String,
}

/// Summary of a completed indexing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexReport {
    /// Number of documents processed.
    pub documents: usize,
    /// Number of chunks stored across all documents.
    pub chunks: usize,
}
