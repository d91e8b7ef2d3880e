use std::collections::HashMap;

use chrono::Utc;
use engram_core::config::SearchConfig;
use engram_core::errors::{EmbeddingError, EngramError, EngramResult};
use engram_core::memory::Memory;
use engram_core::traits::{Embedding, EmbeddingProvider};
use engram_retrieval::{HybridSearcher, Source};
use engram_storage::MemoryStore;
use engram_vector::VectorStore;

/// Maps exact texts to fixed vectors; anything else fails like a dead
/// provider would.
struct FixtureEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixtureEmbedder {
    fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }
}

impl EmbeddingProvider for FixtureEmbedder {
    fn embed(&self, text: &str) -> EngramResult<Embedding> {
        self.vectors
            .get(text)
            .map(|v| Embedding {
                vector: v.clone(),
                content_hash: engram_embeddings::content_hash(text),
            })
            .ok_or_else(|| {
                EngramError::Embedding(EmbeddingError::ProviderUnavailable {
                    provider: "fixture".to_string(),
                    message: "unknown text".to_string(),
                })
            })
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

fn insert(store: &MemoryStore, id: &str, content: &str) -> Memory {
    let mut m = Memory::new(content, "claude-code", Utc::now());
    m.id = id.to_string();
    store.insert(&m).unwrap();
    m
}

fn config(alpha: f64, min_score: f64) -> SearchConfig {
    SearchConfig {
        alpha,
        top_k: 20,
        min_score,
    }
}

#[test]
fn alpha_one_follows_vector_order() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "grep alternatives overview");
    insert(&store, "m2", "grep usage notes");
    insert(&store, "m3", "unrelated topic entirely");
    vectors.upsert("m1", &[1.0, 0.0]).unwrap();
    vectors.upsert("m2", &[0.6, 0.8]).unwrap();
    vectors.upsert("m3", &[0.0, 1.0]).unwrap();

    let embedder = FixtureEmbedder::new(&[("grep", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(1.0, 0.3));

    let results = searcher.search("grep", 10, Utc::now()).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.memory.id.as_str()).collect();
    // Pure vector weighting: order matches cosine order; m3 (normalized 0)
    // falls below min_score.
    assert_eq!(ids, vec!["m1", "m2"]);
    assert!(results[0].hybrid_score > results[1].hybrid_score);
}

#[test]
fn alpha_zero_follows_bm25_order() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "cargo build basics and cargo test basics");
    insert(&store, "m2", "cargo cargo cargo everywhere");
    vectors.upsert("m1", &[1.0, 0.0]).unwrap();
    vectors.upsert("m2", &[0.0, 1.0]).unwrap();

    let embedder = FixtureEmbedder::new(&[("cargo", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.0, 0.0));

    let results = searcher.search("cargo", 10, Utc::now()).unwrap();

    // Expected order comes straight from the lexical index.
    let expected: Vec<String> = store
        .fts_search("cargo", 20)
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    let got: Vec<String> = results.iter().map(|r| r.memory.id.clone()).collect();
    assert_eq!(got, expected);
}

#[test]
fn results_are_sorted_with_id_tie_break() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "b", "identical twin");
    insert(&store, "a", "identical twin");
    vectors.upsert("b", &[1.0, 0.0]).unwrap();
    vectors.upsert("a", &[1.0, 0.0]).unwrap();

    let embedder = FixtureEmbedder::new(&[("twin", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.7, 0.0));

    let results = searcher.search("twin", 10, Utc::now()).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].hybrid_score, results[1].hybrid_score);
    assert_eq!(results[0].memory.id, "a");
    assert_eq!(results[1].memory.id, "b");
}

#[test]
fn entries_below_min_score_are_dropped() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "close match");
    insert(&store, "m2", "distant entry");
    vectors.upsert("m1", &[1.0, 0.0]).unwrap();
    vectors.upsert("m2", &[0.0, 1.0]).unwrap();

    // Neither row matches lexically, so scoring is vector-only.
    let embedder = FixtureEmbedder::new(&[("query text", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(1.0, 0.5));

    let results = searcher.search("query text", 10, Utc::now()).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.memory.id.as_str()).collect();
    assert_eq!(ids, vec!["m1"]);
    assert!(results[0].hybrid_score >= 0.5);
}

#[test]
fn both_sources_mark_result_as_hybrid() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "ripgrep is fast");
    vectors.upsert("m1", &[1.0, 0.0]).unwrap();

    let embedder = FixtureEmbedder::new(&[("ripgrep", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.7, 0.0));

    let results = searcher.search("ripgrep", 10, Utc::now()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source, Source::Hybrid);
    assert!(results[0].vector_score > 0.0);
    assert!(results[0].bm25_score > 0.0);
}

#[test]
fn dead_embedder_degrades_to_keyword_results() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "use ripgrep for recursive search");

    // Embedder knows no texts: every embed call fails.
    let embedder = FixtureEmbedder::new(&[]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.7, 0.3));

    let results = searcher.search("ripgrep", 10, Utc::now()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.id, "m1");
    assert_eq!(results[0].vector_score, 0.0);
    assert_eq!(results[0].source, Source::Keyword);
}

#[test]
fn corrupt_vector_store_degrades_to_keyword_results() {
    let dir = tempfile::tempdir().unwrap();
    let vec_path = dir.path().join("vectors.db");
    std::fs::write(&vec_path, b"garbage, not sqlite").unwrap();

    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::new(&vec_path, 2, "test-model");
    insert(&store, "m1", "use ripgrep for recursive search");

    let embedder = FixtureEmbedder::new(&[("ripgrep", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.7, 0.3));

    let results = searcher.search("ripgrep", 10, Utc::now()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].memory.content.contains("ripgrep"));
    assert_eq!(results[0].vector_score, 0.0);
    assert_eq!(results[0].source, Source::Keyword);
}

#[test]
fn no_match_anywhere_returns_empty() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "something else");

    let embedder = FixtureEmbedder::new(&[]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.7, 0.3));

    assert!(searcher.search("nonexistent", 10, Utc::now()).unwrap().is_empty());
}

#[test]
fn surfaced_rows_get_access_updates() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    insert(&store, "m1", "accessed via search");
    vectors.upsert("m1", &[1.0, 0.0]).unwrap();

    let embedder = FixtureEmbedder::new(&[("accessed", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(0.7, 0.0));
    searcher.search("accessed", 10, Utc::now()).unwrap();

    let row = store.find_by_id("m1").unwrap().unwrap();
    assert_eq!(row.access_count, 1);
    assert!(row.last_accessed.is_some());
}

#[test]
fn eff_score_is_attached_but_does_not_reorder() {
    let store = MemoryStore::open_in_memory().unwrap();
    let vectors = VectorStore::in_memory(2);
    let mut low = Memory::new("twin entry one", "claude-code", Utc::now());
    low.id = "a".to_string();
    low.importance = 0.1;
    let mut high = Memory::new("twin entry two", "claude-code", Utc::now());
    high.id = "b".to_string();
    high.importance = 0.9;
    store.insert(&low).unwrap();
    store.insert(&high).unwrap();
    vectors.upsert("a", &[1.0, 0.0]).unwrap();
    vectors.upsert("b", &[0.9, 0.1]).unwrap();

    let embedder = FixtureEmbedder::new(&[("twin", vec![1.0, 0.0])]);
    let searcher = HybridSearcher::new(&store, &vectors, &embedder, config(1.0, 0.0));

    let results = searcher.search("twin", 10, Utc::now()).unwrap();
    // "a" ranks first on similarity despite its far lower effective score.
    assert_eq!(results[0].memory.id, "a");
    assert!(results[0].eff_score < results[1].eff_score);
}
