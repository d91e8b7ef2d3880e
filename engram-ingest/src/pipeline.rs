//! IngestPipeline — persists explicit saves, auto-extracted candidates, and
//! markdown imports, dual-writing to the vector index best-effort.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use engram_core::constants::{AUTO_IMPORTANCE_CAP, MIN_TRANSCRIPT_CHARS};
use engram_core::errors::EngramResult;
use engram_core::memory::{Memory, MemoryType};
use engram_core::tags::normalize_tags;
use engram_core::traits::{EmbeddingProvider, MemoryExtractor};
use engram_storage::MemoryStore;
use engram_vector::VectorStore;

use crate::auto::AutoEnvelope;
use crate::dedup::is_duplicate;
use crate::explicit::parse_explicit;
use crate::markdown;

/// Result of an explicit save: the persisted row, and whether its embedding
/// made it into the vector index.
#[derive(Debug)]
pub struct ExplicitOutcome {
    pub memory: Memory,
    pub embedded: bool,
}

/// Orchestrates ingestion against both stores.
pub struct IngestPipeline<'a> {
    store: &'a MemoryStore,
    vectors: &'a VectorStore,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(
        store: &'a MemoryStore,
        vectors: &'a VectorStore,
        embedder: &'a dyn EmbeddingProvider,
    ) -> Self {
        Self {
            store,
            vectors,
            embedder,
        }
    }

    /// Persist an explicit memory. Embedding failures downgrade the outcome
    /// but never the save.
    pub fn save_explicit(
        &self,
        input: &str,
        who: &str,
        project: Option<&str>,
        now: DateTime<Utc>,
    ) -> EngramResult<ExplicitOutcome> {
        let parsed = parse_explicit(input)?;

        let mut memory = Memory::new(parsed.content, who, now);
        memory.why = Some(parsed.why.to_string());
        memory.project = project.map(str::to_string);
        memory.importance = parsed.importance;
        memory.memory_type = parsed.memory_type;
        memory.tags = parsed.tags;
        memory.pinned = parsed.pinned;
        memory.updated_at = Some(now);
        memory.updated_by = Some(who.to_string());

        self.store.insert(&memory)?;
        let embedded = self.embed_best_effort(&memory);

        Ok(ExplicitOutcome { memory, embedded })
    }

    /// Process an auto-save envelope. Every abort path is silent (logged at
    /// debug only) and yields zero saves. Returns the number persisted.
    pub fn save_auto(
        &self,
        envelope_json: &str,
        extractor: &dyn MemoryExtractor,
        now: DateTime<Utc>,
    ) -> EngramResult<usize> {
        let envelope: AutoEnvelope = match serde_json::from_str(envelope_json.trim()) {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "auto-save: invalid envelope json");
                return Ok(0);
            }
        };

        if envelope.reason.as_deref() == Some("clear") {
            debug!("auto-save: session cleared, skipping");
            return Ok(0);
        }
        let Some(transcript_path) = envelope.transcript_path.as_deref() else {
            debug!("auto-save: no transcript path");
            return Ok(0);
        };
        let transcript = match std::fs::read_to_string(transcript_path) {
            Ok(t) => t,
            Err(e) => {
                debug!(transcript_path, error = %e, "auto-save: transcript not readable");
                return Ok(0);
            }
        };
        if transcript.chars().count() < MIN_TRANSCRIPT_CHARS {
            debug!("auto-save: transcript too short");
            return Ok(0);
        }

        let candidates = match extractor.extract(&transcript) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "auto-save: extraction failed");
                return Ok(0);
            }
        };

        let mut saved = 0;
        for candidate in candidates {
            let importance = candidate.importance.min(AUTO_IMPORTANCE_CAP);
            if importance < AUTO_IMPORTANCE_CAP {
                continue;
            }
            let content = candidate.content.trim().to_string();
            if content.is_empty() || is_duplicate(self.store, &content) {
                continue;
            }

            let memory_type = candidate
                .memory_type
                .as_deref()
                .map(MemoryType::parse)
                .unwrap_or_default();

            let mut memory = Memory::new(content, "claude-code", now);
            memory.why = Some(format!("auto-{}", memory_type.as_str()));
            memory.project = envelope.cwd.clone();
            memory.session_id = envelope.session_id.clone();
            memory.importance = importance;
            memory.memory_type = memory_type;
            memory.tags = candidate.tags.as_ref().and_then(normalize_tags);
            memory.updated_at = Some(now);
            memory.updated_by = Some("claude-code".to_string());

            self.store.insert(&memory)?;
            self.embed_best_effort(&memory);
            saved += 1;
        }

        debug!(saved, "auto-save complete");
        Ok(saved)
    }

    /// Import legacy markdown memory files from a directory. Returns the
    /// number of rows inserted.
    pub fn import_markdown(&self, dir: &Path, now: DateTime<Utc>) -> EngramResult<usize> {
        let mut migrated = 0;

        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
            .collect();
        entries.sort();

        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)?;

            let facts = if markdown::is_dated_stem(stem) {
                markdown::parse_dated(&content)
            } else {
                markdown::parse_topical(&content, stem)
            };

            for fact in facts {
                if is_duplicate(self.store, &fact.content) {
                    continue;
                }
                let mut memory = Memory::new(fact.content, "claude-code", now);
                memory.why = Some("migrated".to_string());
                memory.importance = fact.importance;
                memory.memory_type = MemoryType::parse(&fact.type_hint);
                memory.tags = fact.tags;
                memory.updated_at = Some(now);
                memory.updated_by = Some("migration".to_string());

                self.store.insert(&memory)?;
                migrated += 1;
            }
        }
        Ok(migrated)
    }

    /// Embed and upsert into the vector index. Failures are logged and
    /// swallowed; the relational row already exists either way.
    fn embed_best_effort(&self, memory: &Memory) -> bool {
        match self.embedder.embed(&memory.content) {
            Ok(embedding) => match self.vectors.upsert(&memory.id, &embedding.vector) {
                Ok(()) => true,
                Err(e) => {
                    debug!(id = %memory.id, error = %e, "vector upsert failed");
                    false
                }
            },
            Err(e) => {
                debug!(id = %memory.id, error = %e, "embedding failed");
                false
            }
        }
    }
}
