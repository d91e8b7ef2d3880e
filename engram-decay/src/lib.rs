//! # engram-decay
//!
//! A memory's current retrieval weight. Pinned memories always score 1.0;
//! everything else is importance shrunk by an exponential recency decay
//! with a floor that preserves long-tail relevance.

mod scorer;

pub use scorer::{effective_score, effective_score_of};
