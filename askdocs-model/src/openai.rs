//! OpenAI-compatible embedding and chat completion backends.
//!
//! Both clients speak the plain JSON REST API over `reqwest`, so they also
//! work against OpenAI-compatible servers (Ollama, vLLM, etc.) via a custom
//! base URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use askdocs_rag::{EmbeddingProvider, RagError, Result, TextGenerator};

/// The default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The default embedding model and its dimensionality.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// The default chat model.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

fn parse_error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ── Embeddings ─────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible `/embeddings`
/// endpoint.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for dimension truncation.
    request_dimensions: Option<usize>,
}

impl OpenAiEmbedder {
    /// Create a new embedder with the given API key and defaults
    /// (`text-embedding-3-small`, 1536 dimensions).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "openai".into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Set the base URL for an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensions. The API returns embeddings truncated to
    /// this size, and [`dimensions()`](EmbeddingProvider::dimensions)
    /// reports it.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "openai".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.request_dimensions,
        };
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embedding request failed");
                RagError::Embedding { provider: "openai".into(), message: format!("request failed: {e}") }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = parse_error_detail(&response.text().await.unwrap_or_default());
            error!(%status, "embedding API error");
            return Err(RagError::Embedding {
                provider: "openai".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| RagError::Embedding {
            provider: "openai".into(),
            message: format!("failed to parse response: {e}"),
        })?;
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Chat completions ───────────────────────────────────────────────

/// Settings for [`OpenAiChat`].
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// API key for bearer auth.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
    /// Base URL; override for OpenAI-compatible servers.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl OpenAiChatConfig {
    /// Create a config with the given key and default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_CHAT_MODEL.into(),
            base_url: OPENAI_BASE_URL.into(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// A [`TextGenerator`] backed by an OpenAI-compatible `/chat/completions`
/// endpoint. Makes one non-streaming request per prompt.
pub struct OpenAiChat {
    client: reqwest::Client,
    config: OpenAiChatConfig,
}

impl OpenAiChat {
    /// Create a new chat client.
    pub fn new(config: OpenAiChatConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(RagError::Generation {
                provider: "openai".into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self { client: reqwest::Client::new(), config })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.config.model, prompt_len = prompt.len(), "chat completion request");

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: "You are a helpful research assistant." },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat request failed");
                RagError::Generation { provider: "openai".into(), message: format!("request failed: {e}") }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = parse_error_detail(&response.text().await.unwrap_or_default());
            error!(%status, "chat API error");
            return Err(RagError::Generation {
                provider: "openai".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| RagError::Generation {
            provider: "openai".into(),
            message: format!("failed to parse response: {e}"),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RagError::Generation {
                provider: "openai".into(),
                message: "API returned no choices".into(),
            })
    }
}
