//! Wiring: turn an [`AppConfig`] into a pipeline and an agent.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use askdocs_model::{HashEmbedder, OpenAiChat, OpenAiChatConfig, OpenAiEmbedder, StaticResponder};
use askdocs_rag::{
    CachedEmbedder, Chunker, EmbeddingProvider, FixedSizeChunker, InMemoryVectorStore,
    ParagraphChunker, QaAgent, RagPipeline, RemoteStoreConfig, RemoteVectorStore, TextGenerator,
    VectorStore,
};

use crate::config::{AppConfig, StoreBackend};

/// Build the vector store selected by configuration.
///
/// For the remote backend the index is created up front if missing, so a
/// misconfigured service fails here rather than mid-indexing.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn VectorStore>> {
    match config.store.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryVectorStore::new())),
        StoreBackend::Remote => {
            let store = RemoteVectorStore::new(RemoteStoreConfig {
                base_url: config.store.base_url.clone(),
                token: config.store.token.clone(),
                index: config.store.index.clone(),
                dimension: config.store.dimension,
                space_type: config.store.space_type.clone(),
            });
            store.ensure_index().await?;
            Ok(Arc::new(store))
        }
    }
}

/// Build the embedding provider selected by configuration.
///
/// Falls back to deterministic hash embeddings when the OpenAI backend is
/// selected but no API key is configured, so keyless runs still work.
pub fn build_embedder(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let dimension = config.store.dimension;
    match config.embedding.backend.as_str() {
        "hash" => Ok(Arc::new(CachedEmbedder::new(HashEmbedder::new(dimension)))),
        "openai" => match &config.embedding.api_key {
            Some(key) => {
                let mut embedder = OpenAiEmbedder::new(key)?
                    .with_model(&config.embedding.model)
                    .with_dimensions(dimension);
                if let Some(base_url) = &config.embedding.base_url {
                    embedder = embedder.with_base_url(base_url);
                }
                Ok(Arc::new(CachedEmbedder::new(embedder)))
            }
            None => {
                warn!("OPENAI_API_KEY not set, falling back to hash embeddings");
                Ok(Arc::new(CachedEmbedder::new(HashEmbedder::new(dimension))))
            }
        },
        other => anyhow::bail!("unknown EMBEDDING_BACKEND: {other} (expected openai or hash)"),
    }
}

/// Build the text generator selected by configuration.
///
/// Falls back to a static placeholder when the OpenAI provider is selected
/// but no API key is configured.
pub fn build_generator(config: &AppConfig) -> Result<Arc<dyn TextGenerator>> {
    match config.generator.provider.as_str() {
        "static" => Ok(Arc::new(StaticResponder::new())),
        "openai" => match &config.generator.api_key {
            Some(key) => {
                let mut chat_config = OpenAiChatConfig::new(key);
                chat_config.model = config.generator.model.clone();
                chat_config.temperature = config.generator.temperature;
                chat_config.max_tokens = config.generator.max_tokens;
                if let Some(base_url) = &config.generator.base_url {
                    chat_config.base_url = base_url.clone();
                }
                Ok(Arc::new(OpenAiChat::new(chat_config)?))
            }
            None => {
                warn!("no LLM API key configured, answers will be placeholders");
                Ok(Arc::new(StaticResponder::new()))
            }
        },
        other => anyhow::bail!("unknown LLM_PROVIDER: {other} (expected openai or static)"),
    }
}

fn build_chunker(config: &AppConfig) -> Result<Arc<dyn Chunker>> {
    match config.chunker.as_str() {
        "fixed" => Ok(Arc::new(FixedSizeChunker::new(
            config.rag.chunk_size,
            config.rag.chunk_overlap,
        )?)),
        "paragraph" => Ok(Arc::new(ParagraphChunker::new(config.rag.chunk_size)?)),
        other => anyhow::bail!("unknown CHUNKER: {other} (expected fixed or paragraph)"),
    }
}

/// Build the full pipeline from configuration.
pub async fn build_pipeline(config: &AppConfig) -> Result<Arc<RagPipeline>> {
    let pipeline = RagPipeline::builder()
        .config(config.rag.clone())
        .embedder(build_embedder(config)?)
        .store(build_store(config).await?)
        .chunker(build_chunker(config)?)
        .build()?;
    Ok(Arc::new(pipeline))
}

/// Build the QA agent from configuration.
pub async fn build_agent(config: &AppConfig) -> Result<QaAgent> {
    Ok(QaAgent::new(build_pipeline(config).await?, build_generator(config)?))
}
