//! # askdocs-model
//!
//! Concrete embedding and text generation backends for askdocs:
//!
//! - [`OpenAiEmbedder`] / [`OpenAiChat`] — OpenAI-compatible HTTP APIs
//! - [`HashEmbedder`] / [`StaticResponder`] — deterministic offline
//!   backends for demos and tests
//!
//! All backends implement the `askdocs-rag` provider traits
//! ([`EmbeddingProvider`](askdocs_rag::EmbeddingProvider) and
//! [`TextGenerator`](askdocs_rag::TextGenerator)), so they are selected by
//! configuration at construction time and swapped without touching the
//! pipeline.

pub mod mock;
pub mod openai;

pub use mock::{HashEmbedder, StaticResponder};
pub use openai::{OpenAiChat, OpenAiChatConfig, OpenAiEmbedder};
