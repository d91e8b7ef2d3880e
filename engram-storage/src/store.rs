//! MemoryStore — owns the connection pool, runs migrations on open, and
//! exposes the full memory-store operation set.

use std::path::Path;

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;
use engram_core::memory::Memory;

use crate::migrations::{MigrationStatus, Migrator};
use crate::pool::ConnectionPool;
use crate::queries;

/// Default read pool size for file-backed stores.
const READ_POOL_SIZE: usize = 4;

/// The authoritative relational store. The vector index is a rebuildable
/// sidecar maintained elsewhere.
pub struct MemoryStore {
    pool: ConnectionPool,
    /// When true, route reads through the read pool (file-backed mode).
    /// In-memory stores route everything through the writer because
    /// in-memory reader connections would be isolated databases.
    use_read_pool: bool,
}

impl MemoryStore {
    /// Open a store backed by a file on disk, creating parent directories
    /// and applying any pending built-in migrations.
    pub fn open(path: &Path) -> EngramResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pool = ConnectionPool::open(path, READ_POOL_SIZE)?;
        let store = Self {
            pool,
            use_read_pool: true,
        };
        store.run_migrations(&Migrator::builtin())?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> EngramResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let store = Self {
            pool,
            use_read_pool: false,
        };
        store.run_migrations(&Migrator::builtin())?;
        Ok(store)
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> EngramResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    /// Apply pending migrations from the given set. Returns count applied.
    pub fn run_migrations(&self, migrator: &Migrator) -> EngramResult<u32> {
        self.pool.writer.with_conn_sync(|conn| migrator.run(conn))
    }

    /// Applied/pending migration view.
    pub fn migration_status(&self, migrator: &Migrator) -> EngramResult<MigrationStatus> {
        self.pool.writer.with_conn_sync(|conn| migrator.status(conn))
    }

    /// Insert a memory row. Returns its id.
    pub fn insert(&self, memory: &Memory) -> EngramResult<String> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::memory_crud::insert_memory(conn, memory))
    }

    /// Delete a memory row by id.
    pub fn delete_by_id(&self, id: &str) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::memory_crud::delete_memory(conn, id))
    }

    /// Fetch a memory by id.
    pub fn find_by_id(&self, id: &str) -> EngramResult<Option<Memory>> {
        self.with_reader(|conn| queries::memory_crud::get_memory(conn, id))
    }

    /// Full-text search: `(id, bm25_rank)` pairs, rank lower-is-better.
    pub fn fts_search(&self, query: &str, limit: usize) -> EngramResult<Vec<(String, f64)>> {
        self.with_reader(|conn| queries::memory_search::fts_search(conn, query, limit))
    }

    /// Project-scoped full-text search returning hydrated rows in rank order.
    pub fn fts_search_scoped(
        &self,
        query: &str,
        project: Option<&str>,
        limit: usize,
    ) -> EngramResult<Vec<Memory>> {
        self.with_reader(|conn| {
            queries::memory_search::fts_search_scoped(conn, query, project, limit)
        })
    }

    /// Case-insensitive tag substring search.
    pub fn tag_search(&self, substring: &str, limit: usize) -> EngramResult<Vec<Memory>> {
        self.with_reader(|conn| queries::memory_search::tag_search(conn, substring, limit))
    }

    /// Candidate rows for the session-start loader.
    pub fn session_candidates(
        &self,
        project: Option<&str>,
        fetch_limit: usize,
    ) -> EngramResult<Vec<Memory>> {
        self.with_reader(|conn| {
            queries::memory_search::session_candidates(conn, project, fetch_limit)
        })
    }

    /// Mark rows as surfaced.
    pub fn update_access(&self, ids: &[String], now: DateTime<Utc>) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::access_ops::update_access(conn, ids, now))
    }

    /// Pinned or high-importance rows.
    pub fn high_value(&self, limit: usize) -> EngramResult<Vec<Memory>> {
        self.with_reader(|conn| queries::access_ops::high_value(conn, limit))
    }

    /// Rows the next prune would delete.
    pub fn prune_candidates(&self, now: DateTime<Utc>) -> EngramResult<Vec<Memory>> {
        self.with_reader(|conn| queries::maintenance::prune_candidates(conn, now))
    }

    /// Delete old low-value auto-extracted rows. Returns deleted ids.
    pub fn prune(&self, now: DateTime<Utc>) -> EngramResult<Vec<String>> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::maintenance::prune(conn, now))
    }

    /// Every memory row (reindex walk).
    pub fn all_memories(&self) -> EngramResult<Vec<Memory>> {
        self.with_reader(queries::memory_crud::all_memories)
    }

    /// Total row count.
    pub fn count(&self) -> EngramResult<usize> {
        self.with_reader(queries::memory_crud::count)
    }
}
