//! Confidence scoring from retrieval evidence.

use crate::document::RetrievedMatch;

/// Derives a scalar confidence in `[0, 1]` from retrieved matches.
///
/// The score rewards both quantity and quality of evidence:
///
/// ```text
/// confidence = min(1.0, mean_score * min(1.0, count / expected_count))
/// ```
///
/// where `expected_count` is the number of matches that were requested
/// (top-k). Fewer matches than requested discount the score; a higher mean
/// similarity raises it. No matches means zero confidence.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    expected_count: usize,
}

impl ConfidenceScorer {
    /// Create a scorer that expects `expected_count` matches per query.
    pub fn new(expected_count: usize) -> Self {
        Self { expected_count }
    }

    /// Score the given matches. Returns exactly 0.0 for an empty slice.
    pub fn score(&self, matches: &[RetrievedMatch]) -> f32 {
        if matches.is_empty() || self.expected_count == 0 {
            return 0.0;
        }
        let mean_score: f32 =
            matches.iter().map(|m| m.score).sum::<f32>() / matches.len() as f32;
        let count_factor = (matches.len() as f32 / self.expected_count as f32).min(1.0);
        (mean_score * count_factor).clamp(0.0, 1.0)
    }
}
