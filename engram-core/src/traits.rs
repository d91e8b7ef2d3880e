//! Collaborator traits: embedding providers, the transcript extractor, and
//! the digest synthesizer. The latter two are opaque collaborators — only
//! their schemas are fixed here.

use serde::Deserialize;

use crate::errors::EngramResult;
use crate::memory::Memory;
use crate::tags::TagsInput;

/// A dense embedding plus the SHA-256 hex hash of the embedded text.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub content_hash: String,
}

/// Embedding generation provider. Idempotent and side-effect-free from the
/// store's perspective; each call carries a 30 s ceiling.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single non-empty trimmed text.
    fn embed(&self, text: &str) -> EngramResult<Embedding>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

/// A candidate memory proposed by the transcript extractor.
/// Deserialized leniently: unknown types degrade to `fact`, missing
/// importance defaults to 0.5.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateMemory {
    pub content: String,
    #[serde(rename = "type", default)]
    pub memory_type: Option<String>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
    #[serde(default = "default_candidate_importance")]
    pub importance: f64,
}

fn default_candidate_importance() -> f64 {
    0.5
}

/// Transcript-to-memory extractor. Implementations have a 45 s budget and
/// return an empty list on timeout rather than failing the save.
pub trait MemoryExtractor: Send + Sync {
    fn extract(&self, transcript: &str) -> EngramResult<Vec<CandidateMemory>>;
}

/// A no-op extractor: never proposes candidates. Used when no local model
/// is configured so the auto path degrades silently.
#[derive(Debug, Default)]
pub struct NullExtractor;

impl MemoryExtractor for NullExtractor {
    fn extract(&self, _transcript: &str) -> EngramResult<Vec<CandidateMemory>> {
        Ok(Vec::new())
    }
}

/// Inputs handed to the digest synthesizer when regenerating MEMORY.md.
#[derive(Debug, Clone)]
pub struct DigestInput {
    /// Pinned or high-importance memories, importance-then-recency ordered.
    pub high_value: Vec<Memory>,
    /// Current MEMORY.md contents, when one exists.
    pub existing: Option<String>,
}

/// Working-memory document synthesizer. Implementations have a 180 s budget;
/// `Ok(None)` means "keep the existing document".
pub trait DigestSynthesizer: Send + Sync {
    fn synthesize(&self, input: &DigestInput) -> EngramResult<Option<String>>;
}
