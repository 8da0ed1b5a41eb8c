//! Configuration for the retrieval pipeline and QA agent.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tuning parameters shared by the pipeline and the agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of matches requested from the vector store per query.
    pub top_k: usize,
    /// Minimum similarity score for a match to be kept.
    pub similarity_threshold: f32,
    /// Maximum characters of each match included in the prompt context.
    pub snippet_len: usize,
    /// Number of prior chat turns carried into a chat prompt.
    pub history_window: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 100,
            top_k: 5,
            similarity_threshold: 0.3,
            snippet_len: 400,
            history_window: 5,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of matches requested per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity score for a match to be kept.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the maximum characters of each match included in the prompt.
    pub fn snippet_len(mut self, len: usize) -> Self {
        self.config.snippet_len = len;
        self
    }

    /// Set the number of prior chat turns carried into a chat prompt.
    pub fn history_window(mut self, window: usize) -> Self {
        self.config.history_window = window;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = RagConfig::builder().build().unwrap();
        assert_eq!(config, RagConfig::default());
    }

    #[test]
    fn overlap_must_be_less_than_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }

    #[test]
    fn zero_top_k_rejected() {
        let err = RagConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }
}
