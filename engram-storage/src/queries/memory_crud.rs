//! Insert, get, delete, and walk operations for memory rows.

use rusqlite::{params, Connection, OptionalExtension};

use engram_core::errors::{EngramError, EngramResult, IngestError};
use engram_core::memory::{Memory, MemoryType};
use engram_core::time::{format_utc, parse_utc};

use super::MEMORY_COLUMNS;
use crate::{sqlite_err, to_storage_err};

/// Insert a single memory. The FTS5 shadow is maintained by triggers.
/// Returns the id.
pub fn insert_memory(conn: &Connection, memory: &Memory) -> EngramResult<String> {
    if memory.content.trim().is_empty() || memory.content.trim() != memory.content {
        return Err(EngramError::Ingest(IngestError::InvalidInput {
            reason: "content must be non-empty and trimmed".to_string(),
        }));
    }
    if !(0.0..=1.0).contains(&memory.importance) {
        return Err(EngramError::Ingest(IngestError::InvalidInput {
            reason: format!("importance out of range: {}", memory.importance),
        }));
    }

    conn.execute(
        "INSERT INTO memories (
            id, content, who, why, created_at, project, session_id,
            importance, last_accessed, access_count, type, tags, pinned,
            updated_at, updated_by
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
        )",
        params![
            memory.id,
            memory.content,
            memory.who,
            memory.why,
            format_utc(memory.created_at),
            memory.project,
            memory.session_id,
            memory.importance,
            memory.last_accessed.map(format_utc),
            memory.access_count,
            memory.memory_type.as_str(),
            memory.tags,
            memory.pinned as i32,
            memory.updated_at.map(format_utc),
            memory.updated_by,
        ],
    )
    .map_err(sqlite_err)?;

    Ok(memory.id.clone())
}

/// Get a single memory by id.
pub fn get_memory(conn: &Connection, id: &str) -> EngramResult<Option<Memory>> {
    let sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(row_to_memory(row)))
        .optional()
        .map_err(sqlite_err)?;

    result.transpose()
}

/// Delete a memory by id. The FTS5 shadow follows via trigger.
pub fn delete_memory(conn: &Connection, id: &str) -> EngramResult<()> {
    conn.execute("DELETE FROM memories WHERE id = ?1", params![id])
        .map_err(sqlite_err)?;
    Ok(())
}

/// Walk every memory row (reindex path).
pub fn all_memories(conn: &Connection) -> EngramResult<Vec<Memory>> {
    let sql = format!("SELECT {MEMORY_COLUMNS} FROM memories ORDER BY created_at");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_memory(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Total row count.
pub fn count(conn: &Connection) -> EngramResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

/// Parse a row (in `MEMORY_COLUMNS` order) into a `Memory`.
pub(crate) fn row_to_memory(row: &rusqlite::Row<'_>) -> EngramResult<Memory> {
    let created_at_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let last_accessed_str: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let type_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_at_str: Option<String> = row.get(13).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Memory {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        content: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        who: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        why: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_utc(&created_at_str)?,
        project: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        session_id: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        importance: row.get(7).map_err(|e| to_storage_err(e.to_string()))?,
        last_accessed: last_accessed_str.as_deref().map(parse_utc).transpose()?,
        access_count: row.get(9).map_err(|e| to_storage_err(e.to_string()))?,
        memory_type: MemoryType::parse(&type_str),
        tags: row.get(11).map_err(|e| to_storage_err(e.to_string()))?,
        pinned: row.get::<_, i32>(12).map_err(|e| to_storage_err(e.to_string()))? != 0,
        updated_at: updated_at_str.as_deref().map(parse_utc).transpose()?,
        updated_by: row.get(14).map_err(|e| to_storage_err(e.to_string()))?,
    })
}
