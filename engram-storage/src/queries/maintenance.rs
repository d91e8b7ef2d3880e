//! Prune queries: auto-extracted, unpinned, low-importance, stale, never
//! accessed. All five conditions must hold.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use engram_core::constants::{PRUNE_MAX_IMPORTANCE, PRUNE_MIN_AGE_DAYS};
use engram_core::errors::EngramResult;
use engram_core::memory::Memory;
use engram_core::time::format_utc;

use super::{row_to_memory, MEMORY_COLUMNS};
use crate::{sqlite_err, to_storage_err};

const PRUNE_PREDICATE: &str = "why LIKE 'auto-%'
           AND pinned = 0
           AND importance < ?1
           AND created_at < ?2
           AND access_count = 0";

/// Cutoff timestamp: rows created before this are old enough to prune.
fn prune_cutoff(now: DateTime<Utc>) -> String {
    format_utc(now - Duration::days(PRUNE_MIN_AGE_DAYS))
}

/// Rows that `prune` would delete, without deleting them.
pub fn prune_candidates(conn: &Connection, now: DateTime<Utc>) -> EngramResult<Vec<Memory>> {
    let sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE {PRUNE_PREDICATE}");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![PRUNE_MAX_IMPORTANCE, prune_cutoff(now)], |row| {
            Ok(row_to_memory(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Delete prune candidates. Returns the deleted ids so callers can clean up
/// the vector index best-effort.
pub fn prune(conn: &Connection, now: DateTime<Utc>) -> EngramResult<Vec<String>> {
    let cutoff = prune_cutoff(now);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT id FROM memories WHERE {PRUNE_PREDICATE}"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let ids: Vec<String> = stmt
        .query_map(params![PRUNE_MAX_IMPORTANCE, cutoff], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    if ids.is_empty() {
        return Ok(ids);
    }

    conn.execute(
        &format!("DELETE FROM memories WHERE {PRUNE_PREDICATE}"),
        params![PRUNE_MAX_IMPORTANCE, cutoff],
    )
    .map_err(sqlite_err)?;

    Ok(ids)
}
