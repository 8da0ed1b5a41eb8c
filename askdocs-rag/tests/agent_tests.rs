//! Integration tests for the pipeline and QA agent over stub backends.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use askdocs_rag::{
    CachedEmbedder, Chunk, Chunker, Document, EmbeddingProvider, FixedSizeChunker,
    InMemoryVectorStore, QaAgent, RagConfig, RagError, RagPipeline, Result, SearchHit,
    TextGenerator, VectorStore, DEGRADED_ANSWER, NO_MATCH_ANSWER,
};
use async_trait::async_trait;

// ── Stub backends ──────────────────────────────────────────────────

/// Deterministic hash-based embeddings, L2-normalized.
struct HashEmbedder {
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb: Vec<f32> =
            (0..self.dimensions).map(|i| ((hash.wrapping_add(i as u64)) as f32).sin()).collect();
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

/// Returns the same scripted hits for every search, ignoring `top_k`.
struct ScriptedStore {
    scores: Vec<f32>,
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn upsert(&self, _chunks: &[Chunk]) -> Result<()> {
        Ok(())
    }

    async fn search(&self, _embedding: &[f32], _top_k: usize) -> Result<Vec<SearchHit>> {
        Ok(self
            .scores
            .iter()
            .enumerate()
            .map(|(i, &score)| SearchHit { chunk: Chunk::new("doc.txt", i, format!("text {i}")), score })
            .collect())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

/// Fails every upsert after the first `succeed` calls.
struct FlakyStore {
    succeed: usize,
    upserts: AtomicUsize,
}

#[async_trait]
impl VectorStore for FlakyStore {
    async fn upsert(&self, _chunks: &[Chunk]) -> Result<()> {
        let n = self.upserts.fetch_add(1, Ordering::SeqCst);
        if n < self.succeed {
            Ok(())
        } else {
            Err(RagError::VectorStore { backend: "flaky".into(), message: "connection reset".into() })
        }
    }

    async fn search(&self, _embedding: &[f32], _top_k: usize) -> Result<Vec<SearchHit>> {
        Ok(Vec::new())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

/// Counts calls and echoes a fixed answer; fails when the prompt contains
/// the configured marker.
struct ScriptedGenerator {
    calls: AtomicUsize,
    fail_on: Option<String>,
}

impl ScriptedGenerator {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0), fail_on: None }
    }

    fn failing_on(marker: &str) -> Self {
        Self { calls: AtomicUsize::new(0), fail_on: Some(marker.to_string()) }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.fail_on {
            if prompt.contains(marker) {
                return Err(RagError::Generation {
                    provider: "scripted".into(),
                    message: "service unavailable".into(),
                });
            }
        }
        Ok("a grounded answer".to_string())
    }
}

fn pipeline_with(store: Arc<dyn VectorStore>, config: RagConfig) -> Arc<RagPipeline> {
    let (chunk_size, chunk_overlap) = (config.chunk_size, config.chunk_overlap);
    Arc::new(
        RagPipeline::builder()
            .config(config)
            .embedder(Arc::new(CachedEmbedder::new(HashEmbedder { dimensions: 16 })))
            .store(store)
            .chunker(Arc::new(FixedSizeChunker::new(chunk_size, chunk_overlap).unwrap()))
            .build()
            .unwrap(),
    )
}

// ── Retrieval filtering ────────────────────────────────────────────

#[tokio::test]
async fn retrieve_filters_by_threshold_then_truncates_to_top_k() {
    let scores = vec![0.9, 0.8, 0.7, 0.5, 0.4, 0.25, 0.2, 0.1];
    let pipeline =
        pipeline_with(Arc::new(ScriptedStore { scores }), RagConfig::default());

    let matches = pipeline.retrieve("question", Some(5), Some(0.3)).await.unwrap();
    assert_eq!(matches.len(), 5);
    let kept: Vec<f32> = matches.iter().map(|m| m.score).collect();
    assert_eq!(kept, vec![0.9, 0.8, 0.7, 0.5, 0.4]);
    let ranks: Vec<usize> = matches.iter().map(|m| m.rank).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3, 4]);

    let matches = pipeline.retrieve("question", Some(3), Some(0.3)).await.unwrap();
    assert_eq!(matches.len(), 3);
}

#[tokio::test]
async fn retrieve_keeps_hits_exactly_at_the_threshold() {
    let scores = vec![0.5, 0.3, 0.2];
    let pipeline =
        pipeline_with(Arc::new(ScriptedStore { scores }), RagConfig::default());

    let matches = pipeline.retrieve("question", Some(5), Some(0.3)).await.unwrap();
    let kept: Vec<f32> = matches.iter().map(|m| m.score).collect();
    assert_eq!(kept, vec![0.5, 0.3]);
}

// ── Fallback and degradation ───────────────────────────────────────

#[tokio::test]
async fn empty_store_gives_fallback_answer_without_calling_generator() {
    let pipeline = pipeline_with(Arc::new(InMemoryVectorStore::new()), RagConfig::default());
    let generator = Arc::new(ScriptedGenerator::new());
    let agent = QaAgent::new(pipeline, generator.clone());

    let result = agent.answer("unanswerable question").await;
    assert_eq!(result.answer, NO_MATCH_ANSWER);
    assert_eq!(result.confidence, 0.0);
    assert!(result.sources.is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_degrades_failing_questions_independently() {
    let pipeline =
        pipeline_with(Arc::new(ScriptedStore { scores: vec![0.9] }), RagConfig::default());
    let generator = Arc::new(ScriptedGenerator::failing_on("Q2"));
    let agent = QaAgent::new(pipeline, generator);

    let questions = vec!["Q1".to_string(), "Q2".to_string(), "Q3".to_string()];
    let results = agent.batch(&questions).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].question, "Q1");
    assert_eq!(results[1].question, "Q2");
    assert_eq!(results[2].question, "Q3");

    assert_eq!(results[0].answer, "a grounded answer");
    assert!(results[0].confidence > 0.0);
    assert_eq!(results[1].answer, DEGRADED_ANSWER);
    assert_eq!(results[1].confidence, 0.0);
    assert_eq!(results[2].answer, "a grounded answer");
    assert!(results[2].confidence > 0.0);
}

// ── Fail-fast indexing ─────────────────────────────────────────────

#[tokio::test]
async fn indexing_aborts_on_first_failure_and_reports_progress() {
    let store = Arc::new(FlakyStore { succeed: 1, upserts: AtomicUsize::new(0) });
    let pipeline = pipeline_with(store, RagConfig::default());

    let documents = vec![
        Document::new("a.txt", "first document"),
        Document::new("b.txt", "second document"),
        Document::new("c.txt", "third document"),
    ];
    let err = pipeline.index_documents(&documents).await.unwrap_err();
    match err {
        RagError::IndexAborted { indexed, .. } => assert_eq!(indexed, 1),
        other => panic!("expected IndexAborted, got {other}"),
    }
}

// ── End-to-end over the in-memory store ────────────────────────────

#[tokio::test]
async fn index_then_query_round_trip() {
    let config = RagConfig::builder()
        .chunk_size(200)
        .chunk_overlap(40)
        .top_k(2)
        .similarity_threshold(0.0)
        .build()
        .unwrap();
    let pipeline = pipeline_with(Arc::new(InMemoryVectorStore::new()), config);
    let agent = QaAgent::new(pipeline.clone(), Arc::new(ScriptedGenerator::new()));

    let text = "Rust achieves memory safety without a garbage collector.";
    let report = pipeline.index_documents(&[Document::new("rust.md", text)]).await.unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(report.chunks, 1);

    // Query with the exact chunk text: cosine similarity 1.0 for that chunk.
    let result = agent.answer(text).await;
    assert_eq!(result.answer, "a grounded answer");
    assert!(result.confidence > 0.0);
    assert_eq!(result.sources[0].chunk.source, "rust.md");
    assert_eq!(result.sources[0].rank, 0);
}

#[tokio::test]
async fn chat_remembers_generated_turns_and_reset_clears_them() {
    let pipeline =
        pipeline_with(Arc::new(ScriptedStore { scores: vec![0.9] }), RagConfig::default());
    let mut agent = QaAgent::new(pipeline, Arc::new(ScriptedGenerator::new()));

    agent.chat("first question").await;
    agent.chat("second question").await;
    assert_eq!(agent.history().len(), 2);
    assert_eq!(agent.history()[0].question, "first question");

    agent.reset();
    assert!(agent.history().is_empty());
}

#[tokio::test]
async fn degraded_chat_turns_are_not_remembered() {
    let pipeline =
        pipeline_with(Arc::new(ScriptedStore { scores: vec![0.9] }), RagConfig::default());
    let mut agent = QaAgent::new(pipeline, Arc::new(ScriptedGenerator::failing_on("Question:")));

    let result = agent.chat("anything").await;
    assert_eq!(result.answer, DEGRADED_ANSWER);
    assert!(agent.history().is_empty());
}

// ── Chunker trait object sanity ────────────────────────────────────

#[test]
fn chunker_is_object_safe() {
    let chunker: Box<dyn Chunker> = Box::new(FixedSizeChunker::new(10, 2).unwrap());
    let chunks = chunker.chunk(&Document::new("d", "hello"));
    assert_eq!(chunks.len(), 1);
}
