//! FTS5 full-text and tag-substring search queries.

use rusqlite::{params, Connection};

use engram_core::errors::{EngramError, EngramResult, StorageError};
use engram_core::memory::Memory;

use super::{row_to_memory, MEMORY_COLUMNS};
use crate::to_storage_err;

/// Search the FTS5 shadow. Returns `(id, bm25_rank)` pairs where rank is
/// SQLite's lower-is-better convention; callers negate for fusion.
/// A malformed MATCH expression or missing FTS table surfaces as
/// `FtsUnavailable` so callers can degrade to an empty lexical set.
pub fn fts_search(conn: &Connection, query: &str, limit: usize) -> EngramResult<Vec<(String, f64)>> {
    let mut stmt = conn
        .prepare(
            "SELECT m.id, fts.rank
             FROM memories_fts fts
             JOIN memories m ON m.rowid = fts.rowid
             WHERE memories_fts MATCH ?1
             ORDER BY fts.rank
             LIMIT ?2",
        )
        .map_err(fts_err)?;

    let rows = stmt
        .query_map(params![query, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })
        .map_err(fts_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(fts_err)
}

/// FTS search restricted to a project scope (`project`, "global", or NULL).
/// Returns hydrated memories in rank order.
pub fn fts_search_scoped(
    conn: &Connection,
    query: &str,
    project: Option<&str>,
    limit: usize,
) -> EngramResult<Vec<Memory>> {
    let sql = format!(
        "SELECT {}
         FROM memories_fts fts
         JOIN memories m ON m.rowid = fts.rowid
         WHERE memories_fts MATCH ?1
           AND (m.project = ?2 OR m.project = 'global' OR m.project IS NULL)
         ORDER BY fts.rank
         LIMIT ?3",
        prefixed_columns("m")
    );
    let mut stmt = conn.prepare(&sql).map_err(fts_err)?;

    let rows = stmt
        .query_map(params![query, project, limit as i64], |row| {
            Ok(row_to_memory(row))
        })
        .map_err(fts_err)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(fts_err)??);
    }
    Ok(results)
}

/// Case-insensitive tag substring search, most important first.
pub fn tag_search(
    conn: &Connection,
    substring: &str,
    limit: usize,
) -> EngramResult<Vec<Memory>> {
    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories
         WHERE LOWER(tags) LIKE ?1
         ORDER BY importance DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let pattern = format!("%{}%", substring.to_lowercase());
    let rows = stmt
        .query_map(params![pattern, limit as i64], |row| Ok(row_to_memory(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Session-start candidate fetch: project-scoped rows, current project first,
/// then pinned / importance / recency. The caller computes effective scores
/// and applies the final filter, ordering, and limit in Rust.
pub fn session_candidates(
    conn: &Connection,
    project: Option<&str>,
    fetch_limit: usize,
) -> EngramResult<Vec<Memory>> {
    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories
         WHERE (project = ?1 OR project = 'global' OR project IS NULL)
         ORDER BY
            CASE WHEN project = ?1 THEN 0 ELSE 1 END,
            pinned DESC,
            importance DESC,
            created_at DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![project, fetch_limit as i64], |row| {
            Ok(row_to_memory(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Qualify the shared column list with a table alias.
fn prefixed_columns(alias: &str) -> String {
    MEMORY_COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// FTS failures (bad MATCH syntax, missing virtual table) map to
/// `FtsUnavailable`; everything else to a plain storage error.
fn fts_err(e: rusqlite::Error) -> EngramError {
    let msg = e.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("fts5") || lower.contains("memories_fts") || lower.contains("match") {
        EngramError::Storage(StorageError::FtsUnavailable { message: msg })
    } else {
        to_storage_err(msg)
    }
}
