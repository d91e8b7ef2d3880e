//! Prune: delete stale low-value auto-extracted rows, then clean their
//! vectors best-effort.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use engram_core::errors::EngramResult;
use engram_storage::MemoryStore;
use engram_vector::VectorStore;

/// What a prune run removed.
#[derive(Debug, Clone, Copy)]
pub struct PruneReport {
    /// Memory rows deleted.
    pub pruned: usize,
    /// Vector entries that could not be cleaned up (the reindex path will
    /// not resurrect them; stale entries are skipped at query time).
    pub vector_failures: usize,
}

/// Delete rows matching all prune conditions and their vector entries.
pub fn prune(
    store: &MemoryStore,
    vectors: &VectorStore,
    now: DateTime<Utc>,
) -> EngramResult<PruneReport> {
    let deleted_ids = store.prune(now)?;

    let mut vector_failures = 0;
    for id in &deleted_ids {
        if let Err(e) = vectors.delete(id) {
            debug!(id, error = %e, "vector cleanup failed");
            vector_failures += 1;
        }
    }

    info!(pruned = deleted_ids.len(), "prune complete");
    Ok(PruneReport {
        pruned: deleted_ids.len(),
        vector_failures,
    })
}
