//! # engram-storage
//!
//! SQLite persistence layer for the Engram memory system.
//! Single write connection + read pool (WAL mode), versioned SQL migrations,
//! FTS5 full-text search, access tracking, and prune queries.

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod store;

pub use migrations::{MigrationStatus, Migrator};
pub use store::MemoryStore;

use engram_core::errors::{EngramError, StorageError};

/// Helper to convert a string message into an `EngramError::Storage`.
pub fn to_storage_err(msg: String) -> EngramError {
    EngramError::Storage(StorageError::Sqlite { message: msg })
}

/// Map a rusqlite error, distinguishing busy-timeout exhaustion from other
/// SQLite failures.
pub fn sqlite_err(e: rusqlite::Error) -> EngramError {
    if let rusqlite::Error::SqliteFailure(code, ref msg) = e {
        if matches!(
            code.code,
            rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
        ) {
            return EngramError::Storage(StorageError::Busy {
                message: msg.clone().unwrap_or_else(|| e.to_string()),
            });
        }
    }
    to_storage_err(e.to_string())
}
