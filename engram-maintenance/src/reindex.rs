//! Reindex: rebuild the vector collection by walking every memory row.

use tracing::{debug, info};

use engram_core::errors::EngramResult;
use engram_core::traits::EmbeddingProvider;
use engram_storage::MemoryStore;
use engram_vector::VectorStore;

/// Per-row outcome counts for a reindex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReindexReport {
    pub success: usize,
    pub failed: usize,
}

/// Embed every memory and upsert its vector. Individual failures are
/// counted and skipped; the walk always finishes.
pub fn reindex(
    store: &MemoryStore,
    vectors: &VectorStore,
    embedder: &dyn EmbeddingProvider,
) -> EngramResult<ReindexReport> {
    let memories = store.all_memories()?;
    info!(total = memories.len(), "reindexing memories");

    let mut report = ReindexReport {
        success: 0,
        failed: 0,
    };

    for memory in &memories {
        let embedding = match embedder.embed(&memory.content) {
            Ok(e) => e,
            Err(e) => {
                debug!(id = %memory.id, error = %e, "embed failed during reindex");
                report.failed += 1;
                continue;
            }
        };
        match vectors.upsert(&memory.id, &embedding.vector) {
            Ok(()) => report.success += 1,
            Err(e) => {
                debug!(id = %memory.id, error = %e, "upsert failed during reindex");
                report.failed += 1;
            }
        }
    }

    info!(
        success = report.success,
        failed = report.failed,
        "reindex complete"
    );
    Ok(report)
}
