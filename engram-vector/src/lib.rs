//! # engram-vector
//!
//! The auxiliary vector index for the Engram memory system: a single
//! on-disk collection mapping memory ids to fixed-dimension fp32 embeddings.
//! Rebuildable at any time from the relational store; readers tolerate its
//! absence and degrade to BM25-only retrieval.

pub mod codec;
pub mod store;

pub use store::{VectorStats, VectorStore};
