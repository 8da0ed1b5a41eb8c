//! Application configuration loaded from the environment.
//!
//! Every setting has a default so a keyless `askdocs` run works against
//! the in-memory backends. A `.env` file in the working directory is
//! honored (loaded by `main` before this module reads the environment).

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use askdocs_rag::RagConfig;

/// Which vector store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// The external vector database over HTTP.
    Remote,
    /// The in-process store; data is lost on exit.
    Memory,
}

/// Vector store settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub base_url: String,
    pub token: Option<String>,
    pub index: String,
    pub dimension: usize,
    pub space_type: String,
}

/// Embedding backend settings.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// `openai` or `hash`.
    pub backend: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Generation backend settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// `openai` or `static`.
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub generator: GeneratorConfig,
    pub rag: RagConfig,
    /// `fixed` or `paragraph`.
    pub chunker: String,
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().with_context(|| format!("invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Load the configuration from environment variables.
    ///
    /// Invalid numeric values are fatal configuration errors; the CLI
    /// surfaces them immediately with a non-zero exit status.
    pub fn from_env() -> Result<Self> {
        let backend = match env_string("STORE_BACKEND", "remote").as_str() {
            "remote" => StoreBackend::Remote,
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("invalid STORE_BACKEND: {other} (expected remote or memory)"),
        };

        let store = StoreConfig {
            backend,
            base_url: env_string("VECTOR_STORE_URL", "http://localhost:8080/api/v1"),
            token: env::var("VECTOR_STORE_TOKEN").ok(),
            index: env_string("VECTOR_INDEX", "askdocs"),
            dimension: env_or("VECTOR_DIM", 384usize)?,
            space_type: env_string("SPACE_TYPE", "cosine"),
        };

        let embedding = EmbeddingConfig {
            backend: env_string("EMBEDDING_BACKEND", "openai"),
            model: env_string("EMBEDDING_MODEL", "text-embedding-3-small"),
            api_key: env::var("OPENAI_API_KEY").ok(),
            base_url: env::var("EMBEDDING_BASE_URL").ok(),
        };

        let generator = GeneratorConfig {
            provider: env_string("LLM_PROVIDER", "openai"),
            model: env_string("LLM_MODEL", "gpt-4o-mini"),
            api_key: env::var("LLM_API_KEY").ok().or_else(|| env::var("OPENAI_API_KEY").ok()),
            base_url: env::var("LLM_BASE_URL").ok(),
            temperature: env_or("LLM_TEMPERATURE", 0.7f32)?,
            max_tokens: env_or("LLM_MAX_TOKENS", 2000u32)?,
        };

        let rag = RagConfig::builder()
            .chunk_size(env_or("CHUNK_SIZE", 800usize)?)
            .chunk_overlap(env_or("CHUNK_OVERLAP", 100usize)?)
            .top_k(env_or("TOP_K", 5usize)?)
            .similarity_threshold(env_or("SIMILARITY_THRESHOLD", 0.3f32)?)
            .snippet_len(env_or("SNIPPET_LEN", 400usize)?)
            .history_window(env_or("HISTORY_WINDOW", 5usize)?)
            .build()
            .context("invalid retrieval configuration")?;

        Ok(Self { store, embedding, generator, rag, chunker: env_string("CHUNKER", "fixed") })
    }
}
