//! # engram-maintenance
//!
//! Housekeeping for the memory store: pruning stale auto-extracted rows
//! (with best-effort vector cleanup), rebuilding the vector index from the
//! relational store, and regenerating the MEMORY.md working-memory digest.

mod digest;
mod prune;
mod reindex;

pub use digest::{regenerate_digest, RuleBasedSynthesizer};
pub use prune::{prune, PruneReport};
pub use reindex::{reindex, ReindexReport};
