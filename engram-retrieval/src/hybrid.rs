//! HybridSearcher: fuses vector similarity with BM25 keyword relevance.
//!
//! Either retrieval plane may be down. An unreachable embedding provider or
//! vector store shrinks the vector side to nothing; if that leaves the fused
//! result empty, the whole call degrades to keyword-only scoring. Retrieval
//! never fails loudly for vector-plane outages.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use engram_core::config::SearchConfig;
use engram_core::errors::EngramResult;
use engram_core::memory::Memory;
use engram_core::traits::EmbeddingProvider;
use engram_decay::effective_score_of;
use engram_storage::MemoryStore;
use engram_vector::VectorStore;

use crate::normalize::min_max_normalize;

/// Which retrieval paths contributed a non-zero score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Hybrid,
    Vector,
    Keyword,
}

/// One retrieval hit, hydrated and scored.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub memory: Memory,
    pub hybrid_score: f64,
    pub vector_score: f64,
    pub bm25_score: f64,
    /// Informational recency-decayed score; does not reorder hybrid results.
    pub eff_score: f64,
    pub source: Source,
}

/// Orchestrates one hybrid retrieval call over the two stores.
pub struct HybridSearcher<'a> {
    store: &'a MemoryStore,
    vectors: &'a VectorStore,
    embedder: &'a dyn EmbeddingProvider,
    config: SearchConfig,
}

impl<'a> HybridSearcher<'a> {
    pub fn new(
        store: &'a MemoryStore,
        vectors: &'a VectorStore,
        embedder: &'a dyn EmbeddingProvider,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            vectors,
            embedder,
            config,
        }
    }

    /// Run a hybrid search. Falls back to keyword-only scoring whenever the
    /// fused pipeline errors or comes back empty.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> EngramResult<Vec<SearchResult>> {
        match self.hybrid(query, limit, now) {
            Ok(results) if !results.is_empty() => Ok(results),
            Ok(_) => {
                debug!("hybrid search empty, degrading to keyword-only");
                self.keyword_only(query, limit, now)
            }
            Err(e) => {
                warn!(error = %e, "hybrid search failed, degrading to keyword-only");
                self.keyword_only(query, limit, now)
            }
        }
    }

    /// The fused pipeline: embed, gather both score sets, normalize, blend,
    /// filter, hydrate, track access.
    fn hybrid(
        &self,
        query: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> EngramResult<Vec<SearchResult>> {
        let mut vector_scores = self.gather_vector_scores(query);
        let mut bm25_scores = self.gather_bm25_scores(query);

        min_max_normalize(&mut vector_scores);
        min_max_normalize(&mut bm25_scores);

        let mut candidate_ids: Vec<String> = vector_scores
            .keys()
            .chain(bm25_scores.keys())
            .cloned()
            .collect();
        candidate_ids.sort();
        candidate_ids.dedup();

        let alpha = self.config.alpha;
        let mut fused: Vec<(String, f64, f64, f64)> = candidate_ids
            .into_iter()
            .map(|id| {
                let v = vector_scores.get(&id).copied().unwrap_or(0.0);
                let b = bm25_scores.get(&id).copied().unwrap_or(0.0);
                let hybrid = alpha * v + (1.0 - alpha) * b;
                (id, hybrid, v, b)
            })
            .collect();

        // Descending by fused score, deterministic tie-break by id.
        fused.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        fused.retain(|(_, hybrid, _, _)| *hybrid >= self.config.min_score);
        fused.truncate(limit);

        let results = self.hydrate(fused, now)?;
        self.track_access(&results, now);
        Ok(results)
    }

    /// Keyword-only degraded mode: normalized BM25 interpreted directly as
    /// the hybrid score.
    fn keyword_only(
        &self,
        query: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> EngramResult<Vec<SearchResult>> {
        let mut bm25_scores = self.gather_bm25_scores(query);
        min_max_normalize(&mut bm25_scores);

        let mut fused: Vec<(String, f64, f64, f64)> = bm25_scores
            .into_iter()
            .map(|(id, b)| (id, b, 0.0, b))
            .collect();
        fused.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        fused.retain(|(_, hybrid, _, _)| *hybrid >= self.config.min_score);
        fused.truncate(limit);

        let results = self.hydrate(fused, now)?;
        self.track_access(&results, now);
        Ok(results)
    }

    /// Embed the query and collect cosine scores. Any failure on the vector
    /// plane yields an empty set.
    fn gather_vector_scores(&self, query: &str) -> HashMap<String, f64> {
        let embedding = match self.embedder.embed(query) {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "query embedding failed, skipping vector search");
                return HashMap::new();
            }
        };
        match self.vectors.top_k(&embedding.vector, self.config.top_k) {
            Ok(hits) => hits.into_iter().collect(),
            Err(e) => {
                debug!(error = %e, "vector search failed, skipping");
                HashMap::new()
            }
        }
    }

    /// Collect negated BM25 scores (higher is better). A missing or
    /// unparseable FTS query yields an empty set.
    fn gather_bm25_scores(&self, query: &str) -> HashMap<String, f64> {
        match self.store.fts_search(query, self.config.top_k) {
            Ok(hits) => hits.into_iter().map(|(id, rank)| (id, -rank)).collect(),
            Err(e) => {
                debug!(error = %e, "fts search failed, skipping");
                HashMap::new()
            }
        }
    }

    /// Hydrate scored ids into full rows; ids whose row vanished (e.g. a
    /// stale vector entry) are dropped.
    fn hydrate(
        &self,
        fused: Vec<(String, f64, f64, f64)>,
        now: DateTime<Utc>,
    ) -> EngramResult<Vec<SearchResult>> {
        let mut results = Vec::with_capacity(fused.len());
        for (id, hybrid, v, b) in fused {
            let Some(memory) = self.store.find_by_id(&id)? else {
                debug!(id, "vector hit without a memory row, skipping");
                continue;
            };
            let source = if v > 0.0 && b > 0.0 {
                Source::Hybrid
            } else if v > 0.0 {
                Source::Vector
            } else {
                Source::Keyword
            };
            let eff_score = effective_score_of(&memory, now);
            results.push(SearchResult {
                memory,
                hybrid_score: hybrid,
                vector_score: v,
                bm25_score: b,
                eff_score,
                source,
            });
        }
        Ok(results)
    }

    /// Bump access counters for surfaced rows. Best-effort.
    fn track_access(&self, results: &[SearchResult], now: DateTime<Utc>) {
        let ids: Vec<String> = results.iter().map(|r| r.memory.id.clone()).collect();
        if let Err(e) = self.store.update_access(&ids, now) {
            warn!(error = %e, "failed to update access counters");
        }
    }
}
