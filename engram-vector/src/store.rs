//! The `memories` vector collection: a dedicated SQLite file of fp32 blobs,
//! opened lazily, writes serialized behind a mutex.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::debug;

use engram_core::errors::{EngramError, EngramResult, VectorError};

use crate::codec::{blob_to_vec, cosine_similarity, vec_to_blob};

/// Rows written by this store always carry this source type; the schema
/// leaves room for other embedding sources.
const SOURCE_TYPE: &str = "memory";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS embeddings (
        source_type TEXT NOT NULL,
        source_id   TEXT NOT NULL,
        vector      BLOB NOT NULL,
        dimensions  INTEGER NOT NULL,
        model       TEXT,
        PRIMARY KEY (source_type, source_id)
    );
";

/// Collection statistics.
#[derive(Debug, Clone, Serialize)]
pub struct VectorStats {
    pub path: String,
    pub dimensions: usize,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

enum Backing {
    File(PathBuf),
    Memory,
}

/// The on-disk vector collection. Created lazily on first access; open
/// failures surface as `VectorError::Unavailable` so callers can stay in
/// BM25-only mode.
pub struct VectorStore {
    backing: Backing,
    dimensions: usize,
    model: String,
    conn: Mutex<Option<Connection>>,
}

impl VectorStore {
    /// A store backed by the given file. Nothing is opened until first use.
    pub fn new(path: &Path, dimensions: usize, model: impl Into<String>) -> Self {
        Self {
            backing: Backing::File(path.to_path_buf()),
            dimensions,
            model: model.into(),
            conn: Mutex::new(None),
        }
    }

    /// An in-memory store (for testing).
    pub fn in_memory(dimensions: usize) -> Self {
        Self {
            backing: Backing::Memory,
            dimensions,
            model: String::new(),
            conn: Mutex::new(None),
        }
    }

    /// Run a closure against the (lazily opened) connection.
    fn with_conn<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| unavailable(format!("vector store lock poisoned: {e}")))?;

        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        let Some(conn) = guard.as_ref() else {
            return Err(unavailable("vector store connection missing".to_string()));
        };
        f(conn)
    }

    /// Open or create the collection. Any failure — including a corrupt or
    /// schema-incompatible file — maps to `Unavailable`.
    fn open(&self) -> EngramResult<Connection> {
        let conn = match &self.backing {
            Backing::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| unavailable(format!("{}: {e}", parent.display())))?;
                }
                Connection::open(path)
                    .map_err(|e| unavailable(format!("{}: {e}", path.display())))?
            }
            Backing::Memory => {
                Connection::open_in_memory().map_err(|e| unavailable(e.to_string()))?
            }
        };

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| unavailable(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| unavailable(e.to_string()))?;

        debug!(dims = self.dimensions, "vector collection opened");
        Ok(conn)
    }

    /// Insert or replace the vector for `id`.
    pub fn upsert(&self, id: &str, vector: &[f32]) -> EngramResult<()> {
        if vector.len() != self.dimensions {
            return Err(EngramError::Vector(VectorError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            }));
        }
        let blob = vec_to_blob(vector);
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO embeddings
                    (source_type, source_id, vector, dimensions, model)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![SOURCE_TYPE, id, blob, self.dimensions as i64, self.model],
            )
            .map_err(|e| unavailable(e.to_string()))?;
            Ok(())
        })
    }

    /// Remove the vector for `id`, if any.
    pub fn delete(&self, id: &str) -> EngramResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM embeddings WHERE source_type = ?1 AND source_id = ?2",
                params![SOURCE_TYPE, id],
            )
            .map_err(|e| unavailable(e.to_string()))?;
            Ok(())
        })
    }

    /// Top-k by cosine similarity, descending, ties broken by id ascending.
    /// Rows whose stored dimensionality differs from the query are skipped.
    pub fn top_k(&self, query: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>> {
        let query_norm_sq: f64 = query.iter().map(|x| f64::from(*x).powi(2)).sum();
        if query_norm_sq == 0.0 || k == 0 {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT source_id, vector, dimensions FROM embeddings
                     WHERE source_type = ?1",
                )
                .map_err(|e| unavailable(e.to_string()))?;

            let rows = stmt
                .query_map(params![SOURCE_TYPE], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                })
                .map_err(|e| unavailable(e.to_string()))?;

            let mut scored: Vec<(String, f64)> = Vec::new();
            for row in rows {
                let (id, blob, dims) = row.map_err(|e| unavailable(e.to_string()))?;
                if dims as usize != query.len() {
                    continue;
                }
                let stored = blob_to_vec(&blob);
                scored.push((id, cosine_similarity(query, &stored)));
            }

            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            scored.truncate(k);
            Ok(scored)
        })
    }

    /// Number of vectors in the collection.
    pub fn count(&self) -> EngramResult<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM embeddings WHERE source_type = ?1",
                    params![SOURCE_TYPE],
                    |row| row.get(0),
                )
                .map_err(|e| unavailable(e.to_string()))?;
            Ok(n as usize)
        })
    }

    /// Collection statistics; never fails, `available` reflects reality.
    pub fn stats(&self) -> VectorStats {
        let path = match &self.backing {
            Backing::File(p) => p.display().to_string(),
            Backing::Memory => ":memory:".to_string(),
        };
        match self.count() {
            Ok(count) => VectorStats {
                path,
                dimensions: self.dimensions,
                available: true,
                count: Some(count),
                error: None,
            },
            Err(e) => VectorStats {
                path,
                dimensions: self.dimensions,
                available: false,
                count: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn unavailable(message: String) -> EngramError {
    EngramError::Vector(VectorError::Unavailable { message })
}
