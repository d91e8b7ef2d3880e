//! # engram-retrieval
//!
//! Hybrid retrieval for the Engram memory system: BM25 and cosine
//! similarity, each min-max normalized per call, fused with a configurable
//! weight. Vector-plane outages degrade silently to keyword-only results.

mod hybrid;
mod normalize;

pub use hybrid::{HybridSearcher, SearchResult, Source};
pub use normalize::min_max_normalize;
