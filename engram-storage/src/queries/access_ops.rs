//! Access tracking and high-value queries.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use engram_core::constants::HIGH_VALUE_IMPORTANCE;
use engram_core::errors::EngramResult;
use engram_core::memory::Memory;
use engram_core::time::format_utc;

use super::{row_to_memory, MEMORY_COLUMNS};
use crate::{sqlite_err, to_storage_err};

/// Mark the given rows as surfaced: set `last_accessed`, bump
/// `access_count`. Last-write-wins under concurrency.
pub fn update_access(
    conn: &Connection,
    ids: &[String],
    now: DateTime<Utc>,
) -> EngramResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let placeholders = std::iter::repeat("?")
        .take(ids.len())
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        "UPDATE memories
         SET last_accessed = ?1, access_count = access_count + 1
         WHERE id IN ({placeholders})"
    );

    let now_str = format_utc(now);
    let mut params: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(ids.len() + 1);
    params.push(&now_str);
    for id in ids {
        params.push(id);
    }

    conn.execute(&sql, params.as_slice()).map_err(sqlite_err)?;
    Ok(())
}

/// Pinned or high-importance rows, importance then recency ordered.
pub fn high_value(conn: &Connection, limit: usize) -> EngramResult<Vec<Memory>> {
    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories
         WHERE pinned = 1 OR importance >= ?1
         ORDER BY importance DESC, created_at DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            rusqlite::params![HIGH_VALUE_IMPORTANCE, limit as i64],
            |row| Ok(row_to_memory(row)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}
