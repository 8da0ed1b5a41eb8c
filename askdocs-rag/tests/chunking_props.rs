//! Property tests for fixed-size chunking.

use askdocs_rag::{Chunker, Document, FixedSizeChunker};
use proptest::prelude::*;

/// Generate a (size, overlap) pair with `overlap < size`.
fn arb_window() -> impl Strategy<Value = (usize, usize)> {
    (1usize..60).prop_flat_map(|size| (Just(size), 0..size))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Concatenating chunks while skipping the overlap of every chunk
    /// after the first reconstructs the original text exactly.
    #[test]
    fn chunks_reconstruct_the_text(
        text in "[a-zA-Z0-9 .,!?éü]{1,300}",
        (size, overlap) in arb_window(),
    ) {
        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&Document::new("doc", text.clone()));

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(&chunk.text);
            } else {
                rebuilt.extend(chunk.text.chars().skip(overlap));
            }
        }
        prop_assert_eq!(rebuilt, text);
    }

    /// Chunk count follows the closed form
    /// `ceil((len - overlap) / (size - overlap))` for `len > size`, else 1.
    #[test]
    fn chunk_count_matches_closed_form(
        text in "[a-z ]{1,300}",
        (size, overlap) in arb_window(),
    ) {
        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&Document::new("doc", text.clone()));

        let len = text.chars().count();
        let expected = if len <= size {
            1
        } else {
            let stride = size - overlap;
            (len - overlap).div_ceil(stride)
        };
        prop_assert_eq!(chunks.len(), expected);
    }

    /// Every chunk except the last spans exactly `size` characters, and
    /// indices count up contiguously from zero.
    #[test]
    fn chunk_sizes_and_indices_are_regular(
        text in "[a-z0-9 ]{1,300}",
        (size, overlap) in arb_window(),
    ) {
        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&Document::new("doc", text));

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index, i);
            let chars = chunk.text.chars().count();
            if i + 1 < chunks.len() {
                prop_assert_eq!(chars, size);
            } else {
                prop_assert!(chars <= size);
                // The tail is never pure overlap of the previous chunk.
                if i > 0 {
                    prop_assert!(chars > overlap);
                }
            }
        }
    }
}
