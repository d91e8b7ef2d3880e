//! # engram-embeddings
//!
//! Embedding generation for the Engram memory system. Two HTTP providers
//! (Ollama and OpenAI-compatible), selected by configuration, with SHA-256
//! content hashing and dimension validation.

pub mod engine;
pub mod hash;
pub mod providers;

pub use engine::{EmbeddingEngine, ProviderStatus};
pub use hash::content_hash;
