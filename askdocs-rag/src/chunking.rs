//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — overlapping fixed-size character windows
//! - [`ParagraphChunker`] — merges paragraphs up to a size limit

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and position metadata but
/// no embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text. Chunk indices
    /// are contiguous starting at 0 and each returned chunk has an empty
    /// embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// The window advances with stride `size - overlap`, so consecutive chunks
/// share exactly `overlap` characters. The final window is truncated to the
/// remaining text, never padded. Text shorter than one window produces a
/// single chunk. Sizes are measured in characters, not bytes, so multi-byte
/// text is never split mid-scalar. Whitespace is kept as-is; callers
/// normalize text upstream.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size` (the window could never advance).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        // Byte offsets of character boundaries, so windows can be sliced
        // without splitting a UTF-8 scalar.
        let boundaries: Vec<usize> = document
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(document.text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let stride = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            let text = &document.text[boundaries[start]..boundaries[end]];
            chunks.push(Chunk::new(&document.source, chunks.len(), text));
            if end == char_count {
                break;
            }
            start += stride;
        }

        chunks
    }
}

/// Merges `\n\n`-separated paragraphs into chunks up to a size limit.
///
/// Paragraphs are accumulated until adding the next one would exceed
/// `max_chars`, at which point the current group is emitted. A single
/// paragraph longer than `max_chars` still becomes its own chunk.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    max_chars: usize,
}

impl ParagraphChunker {
    /// Create a new `ParagraphChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `max_chars` is zero.
    pub fn new(max_chars: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(RagError::Config("max_chars must be greater than zero".to_string()));
        }
        Ok(Self { max_chars })
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let paragraphs = document.text.split("\n\n").map(str::trim).filter(|p| !p.is_empty());

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;

        for para in paragraphs {
            let para_len = para.chars().count();
            if current_len + para_len > self.max_chars && !current.is_empty() {
                chunks.push(Chunk::new(&document.source, chunks.len(), current.join("\n\n")));
                current.clear();
                current_len = 0;
            }
            current.push(para);
            current_len += para_len;
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(&document.source, chunks.len(), current.join("\n\n")));
        }

        chunks
    }
}
