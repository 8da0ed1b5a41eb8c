//! Text generation trait for producing answers from prompts.

use async_trait::async_trait;

use crate::error::Result;

/// A backend that turns a prompt into generated text.
///
/// This is the language-model seam of the pipeline: the agent builds a
/// grounded prompt and makes exactly one call per answered question.
/// Generation options (model, temperature, token limits) belong to the
/// concrete implementation, selected by configuration at construction time.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Generation`](crate::RagError::Generation) if the
    /// backend is unreachable or rejects the request. There is no retry.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
