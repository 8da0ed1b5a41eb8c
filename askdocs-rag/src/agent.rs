//! Question-answering agent on top of the retrieval pipeline.
//!
//! [`QaAgent`] composes a [`RagPipeline`] with a [`TextGenerator`] and an
//! optional chat history. Answering is resilient by design: remote
//! failures during a query degrade to a fixed answer with zero confidence
//! instead of aborting the user-facing operation. This is the deliberate
//! mirror image of indexing, which is fail-fast.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::confidence::ConfidenceScorer;
use crate::document::{ChatTurn, QaResult, RetrievedMatch};
use crate::generation::TextGenerator;
use crate::pipeline::RagPipeline;

/// Answer used when retrieval finds no matching chunks.
///
/// An empty result set is a valid outcome, not an error; the generator is
/// not called at all in that case.
pub const NO_MATCH_ANSWER: &str =
    "I could not find relevant information to answer your question.";

/// Answer used when a remote call fails during a query.
pub const DEGRADED_ANSWER: &str =
    "The answer could not be generated because a backend request failed. Please try again.";

/// A question-answering agent with bounded chat memory.
pub struct QaAgent {
    pipeline: Arc<RagPipeline>,
    generator: Arc<dyn TextGenerator>,
    history: Vec<ChatTurn>,
}

impl QaAgent {
    /// Create an agent over the given pipeline and generator.
    pub fn new(pipeline: Arc<RagPipeline>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { pipeline, generator, history: Vec::new() }
    }

    /// The chat history accumulated so far.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Clear the chat history.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Answer a single question.
    ///
    /// Retrieves matches, scores confidence, and makes exactly one
    /// generator call when there is evidence to ground the answer on.
    /// No matches yields [`NO_MATCH_ANSWER`] with confidence 0 and zero
    /// generator calls; a failed remote call yields [`DEGRADED_ANSWER`]
    /// with confidence 0.
    pub async fn answer(&self, question: &str) -> QaResult {
        self.answer_with(question, None, None).await
    }

    /// Answer a single question with per-call retrieval overrides.
    pub async fn answer_with(
        &self,
        question: &str,
        top_k: Option<usize>,
        min_similarity: Option<f32>,
    ) -> QaResult {
        self.run(question, top_k, min_similarity, &[]).await.0
    }

    /// Answer a question in the running chat session.
    ///
    /// Prior turns (bounded to the configured history window) are included
    /// as prompt context, and the new turn is appended to the history once
    /// an answer has been generated. Degraded turns are not remembered.
    pub async fn chat(&mut self, question: &str) -> QaResult {
        let window = self.pipeline.config().history_window;
        let start = self.history.len().saturating_sub(window);
        let context: Vec<ChatTurn> = self.history[start..].to_vec();

        let (result, generated) = self.run(question, None, None, &context).await;
        if generated {
            self.history.push(ChatTurn {
                question: result.question.clone(),
                answer: result.answer.clone(),
            });
        }
        result
    }

    /// Answer every question in input order.
    ///
    /// Each question is independent: a degraded answer never aborts the
    /// batch, and the output order always matches the input order.
    pub async fn batch(&self, questions: &[String]) -> Vec<QaResult> {
        let mut results = Vec::with_capacity(questions.len());
        for question in questions {
            results.push(self.answer(question).await);
        }
        results
    }

    /// Returns the result and whether an answer was actually generated
    /// (as opposed to a fallback or degraded one).
    async fn run(
        &self,
        question: &str,
        top_k: Option<usize>,
        min_similarity: Option<f32>,
        history: &[ChatTurn],
    ) -> (QaResult, bool) {
        let config = self.pipeline.config();
        let expected = top_k.unwrap_or(config.top_k);

        let matches = match self.pipeline.retrieve(question, top_k, min_similarity).await {
            Ok(matches) => matches,
            Err(e) => {
                error!(error = %e, "retrieval failed, degrading answer");
                return (degraded(question, Vec::new()), false);
            }
        };

        if matches.is_empty() {
            info!("no matches above threshold, returning fallback answer");
            let result = QaResult {
                question: question.to_string(),
                answer: NO_MATCH_ANSWER.to_string(),
                sources: Vec::new(),
                confidence: 0.0,
            };
            return (result, false);
        }

        let confidence = ConfidenceScorer::new(expected).score(&matches);
        let prompt = build_prompt(question, &matches, history, config.snippet_len);

        match self.generator.generate(&prompt).await {
            Ok(answer) => {
                info!(sources = matches.len(), confidence, "answered question");
                let result = QaResult {
                    question: question.to_string(),
                    answer,
                    sources: matches,
                    confidence,
                };
                (result, true)
            }
            Err(e) => {
                warn!(error = %e, "generation failed, degrading answer");
                (degraded(question, matches), false)
            }
        }
    }
}

fn degraded(question: &str, sources: Vec<RetrievedMatch>) -> QaResult {
    QaResult {
        question: question.to_string(),
        answer: DEGRADED_ANSWER.to_string(),
        sources,
        confidence: 0.0,
    }
}

/// Build the grounded prompt: prior turns, then numbered source snippets
/// in rank order, then the question.
fn build_prompt(
    question: &str,
    matches: &[RetrievedMatch],
    history: &[ChatTurn],
    snippet_len: usize,
) -> String {
    let mut prompt = String::new();

    if !history.is_empty() {
        prompt.push_str("Previous conversation:\n");
        for turn in history {
            prompt.push_str(&format!("Q: {}\nA: {}\n", turn.question, turn.answer));
        }
        prompt.push('\n');
    }

    prompt.push_str("Based on the following context, answer the question:\n\nContext:\n");
    for m in matches {
        prompt.push_str(&format!(
            "[Source {}: {}]\n{}\n\n",
            m.rank + 1,
            m.chunk.source,
            truncate(&m.chunk.text, snippet_len),
        ));
    }
    prompt.push_str(&format!("Question: {question}\n\nAnswer:"));
    prompt
}

/// Truncate text to at most `max_len` characters, appending `...` when cut.
fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    // No room for an ellipsis below 4 characters, hard cut instead.
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let kept: String = text.chars().take(max_len - 3).collect();
    format!("{kept}...")
}
