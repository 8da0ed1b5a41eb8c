//! Remote vector store client over HTTP.
//!
//! [`RemoteVectorStore`] talks JSON to an external vector database that
//! exposes index management, upsert, and similarity search endpoints. The
//! service owns the approximate-nearest-neighbor index; this client is a
//! thin request/response shim with no retry policy (a failed call surfaces
//! as [`RagError::VectorStore`] after one attempt).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::document::{Chunk, SearchHit};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Chunks per upsert request.
const UPSERT_BATCH_SIZE: usize = 256;

/// Connection settings for the remote vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteStoreConfig {
    /// Base URL of the service, e.g. `http://localhost:8080/api/v1`.
    pub base_url: String,
    /// Optional bearer token.
    pub token: Option<String>,
    /// Name of the index this client reads and writes.
    pub index: String,
    /// Dimensionality of stored vectors.
    pub dimension: usize,
    /// Distance metric of the index (`cosine`, `l2`, or `ip`).
    pub space_type: String,
}

/// A [`VectorStore`] backed by a remote vector database over HTTP.
pub struct RemoteVectorStore {
    client: reqwest::Client,
    config: RemoteStoreConfig,
}

impl RemoteVectorStore {
    /// Create a client for the given service.
    ///
    /// No request is made until an operation is called; use
    /// [`ensure_index`](Self::ensure_index) to create the index up front.
    pub fn new(config: RemoteStoreConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }

    /// The configured index name.
    pub fn index(&self) -> &str {
        &self.config.index
    }

    fn remote_err(message: impl Into<String>) -> RagError {
        RagError::VectorStore { backend: "remote".to_string(), message: message.into() }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(%status, what, "vector store request failed");
        Err(Self::remote_err(format!("{what} returned {status}: {body}")))
    }

    /// Create the configured index if the service does not have it yet.
    pub async fn ensure_index(&self) -> Result<()> {
        let response = self
            .request(reqwest::Method::GET, "index")
            .send()
            .await
            .map_err(|e| Self::remote_err(format!("list indexes failed: {e}")))?;
        let existing: Vec<IndexInfo> = Self::check(response, "list indexes")
            .await?
            .json()
            .await
            .map_err(|e| Self::remote_err(format!("failed to parse index list: {e}")))?;

        if existing.iter().any(|idx| idx.name == self.config.index) {
            debug!(index = %self.config.index, "index already exists");
            return Ok(());
        }

        info!(
            index = %self.config.index,
            dimension = self.config.dimension,
            space_type = %self.config.space_type,
            "creating index"
        );
        let body = CreateIndexRequest {
            name: &self.config.index,
            dimension: self.config.dimension,
            space_type: &self.config.space_type,
        };
        let response = self
            .request(reqwest::Method::POST, "index")
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::remote_err(format!("create index failed: {e}")))?;
        Self::check(response, "create index").await?;
        Ok(())
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IndexInfo {
    name: String,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    space_type: &'a str,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    vector: &'a [f32],
    meta: VectorMeta<'a>,
}

#[derive(Serialize)]
struct VectorMeta<'a> {
    text: &'a str,
    source: &'a str,
    chunk_index: usize,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
}

#[derive(Deserialize)]
struct SearchResponseItem {
    id: String,
    similarity: f32,
    #[serde(default)]
    meta: Option<SearchResponseMeta>,
}

#[derive(Deserialize, Default)]
struct SearchResponseMeta {
    #[serde(default)]
    text: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    chunk_index: usize,
}

#[async_trait]
impl VectorStore for RemoteVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        let path = format!("index/{}/vector", self.config.index);
        for batch in chunks.chunks(UPSERT_BATCH_SIZE) {
            let vectors: Vec<UpsertVector<'_>> = batch
                .iter()
                .map(|chunk| UpsertVector {
                    id: &chunk.id,
                    vector: &chunk.embedding,
                    meta: VectorMeta {
                        text: &chunk.text,
                        source: &chunk.source,
                        chunk_index: chunk.chunk_index,
                    },
                })
                .collect();

            let response = self
                .request(reqwest::Method::POST, &path)
                .json(&vectors)
                .send()
                .await
                .map_err(|e| Self::remote_err(format!("upsert failed: {e}")))?;
            Self::check(response, "upsert").await?;
            debug!(index = %self.config.index, count = batch.len(), "upserted batch");
        }
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let path = format!("index/{}/search", self.config.index);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&SearchRequest { vector: embedding, top_k })
            .send()
            .await
            .map_err(|e| Self::remote_err(format!("search failed: {e}")))?;
        let items: Vec<SearchResponseItem> = Self::check(response, "search")
            .await?
            .json()
            .await
            .map_err(|e| Self::remote_err(format!("failed to parse search response: {e}")))?;

        Ok(items
            .into_iter()
            .map(|item| {
                let meta = item.meta.unwrap_or_default();
                SearchHit {
                    chunk: Chunk {
                        id: item.id,
                        text: meta.text,
                        embedding: Vec::new(),
                        source: meta.source,
                        chunk_index: meta.chunk_index,
                    },
                    score: item.similarity,
                }
            })
            .collect())
    }

    async fn clear(&self) -> Result<()> {
        let path = format!("index/{}", self.config.index);
        let response = self
            .request(reqwest::Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| Self::remote_err(format!("delete index failed: {e}")))?;
        Self::check(response, "delete index").await?;
        info!(index = %self.config.index, "deleted index");
        Ok(())
    }
}
