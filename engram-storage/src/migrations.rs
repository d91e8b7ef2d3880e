//! Migration runner — versioned `.sql` files, forward-only, transactional
//! per file, checksum-tracked.
//!
//! Files are named `NNN_<name>.sql` and applied in numeric order. Statements
//! are executed individually; "duplicate column" and "already exists" errors
//! are skipped so re-running a file is harmless. Any other failure rolls the
//! file back and aborts the run. Success records
//! `(version, applied_at, checksum = SHA-256(sql)[..16])`.

use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use engram_core::errors::{EngramError, EngramResult, StorageError};
use engram_core::time::format_utc;

use crate::to_storage_err;

/// One migration file: numeric version, descriptive name, raw SQL.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: String,
    pub sql: String,
}

/// A recorded application of a migration.
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    pub version: u32,
    pub applied_at: String,
    pub checksum: String,
}

/// Snapshot of applied and pending migrations.
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub current_version: u32,
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<(u32, String)>,
}

/// Holds an ordered migration set and applies the pending suffix.
pub struct Migrator {
    migrations: Vec<Migration>,
}

impl Migrator {
    /// The built-in migration set shipped with the crate.
    pub fn builtin() -> Self {
        let mut migrations = vec![
            Migration {
                version: 1,
                name: "initial_schema".to_string(),
                sql: include_str!("../migrations/001_initial_schema.sql").to_string(),
            },
            Migration {
                version: 2,
                name: "fts_index".to_string(),
                sql: include_str!("../migrations/002_fts_index.sql").to_string(),
            },
            Migration {
                version: 3,
                name: "metadata_columns".to_string(),
                sql: include_str!("../migrations/003_metadata_columns.sql").to_string(),
            },
        ];
        migrations.sort_by_key(|m| m.version);
        Self { migrations }
    }

    /// Scan a directory for `NNN_<name>.sql` files. Files without a numeric
    /// prefix are ignored.
    pub fn from_dir(dir: &Path) -> EngramResult<Self> {
        let mut migrations = Vec::new();
        if dir.exists() {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("sql") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let Some((prefix, name)) = stem.split_once('_') else {
                    continue;
                };
                let Ok(version) = prefix.parse::<u32>() else {
                    continue;
                };
                migrations.push(Migration {
                    version,
                    name: name.to_string(),
                    sql: std::fs::read_to_string(&path)?,
                });
            }
        }
        migrations.sort_by_key(|m| m.version);
        Ok(Self { migrations })
    }

    /// Highest version in this migration set.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Current schema version recorded in the database, 0 when the
    /// bookkeeping table does not exist yet.
    pub fn current_version(conn: &Connection) -> EngramResult<u32> {
        let exists: bool = conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations'")
            .and_then(|mut stmt| stmt.exists([]))
            .map_err(|e| to_storage_err(e.to_string()))?;
        if !exists {
            return Ok(0);
        }
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))
    }

    /// Run all pending migrations. Returns the number applied.
    pub fn run(&self, conn: &Connection) -> EngramResult<u32> {
        ensure_migrations_table(conn)?;
        let current = Self::current_version(conn)?;
        let latest = self.latest_version();
        if current >= latest {
            debug!("database schema is up to date (v{current})");
            return Ok(0);
        }

        info!("running migrations: v{current} -> v{latest}");
        let mut applied = 0;

        for migration in &self.migrations {
            if migration.version <= current {
                continue;
            }
            self.apply_one(conn, migration)?;
            applied += 1;
        }

        info!("applied {applied} migration(s), now at v{latest}");
        Ok(applied)
    }

    /// Apply a single migration inside its own transaction.
    fn apply_one(&self, conn: &Connection, migration: &Migration) -> EngramResult<()> {
        let version = migration.version;
        debug!("applying migration v{version:03}: {}", migration.name);

        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| to_storage_err(format!("begin transaction for v{version:03}: {e}")))?;

        match apply_statements(conn, &migration.sql) {
            Ok(()) => {
                let checksum = sql_checksum(&migration.sql);
                conn.execute(
                    "INSERT INTO schema_migrations (version, applied_at, checksum)
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![version, format_utc(Utc::now()), checksum],
                )
                .map_err(|e| to_storage_err(format!("record version v{version:03}: {e}")))?;

                conn.execute_batch("COMMIT")
                    .map_err(|e| to_storage_err(format!("commit v{version:03}: {e}")))?;
                info!("applied migration v{version:03}: {}", migration.name);
                Ok(())
            }
            Err(e) => {
                warn!("migration v{version:03} failed: {e}, rolling back");
                let _ = conn.execute_batch("ROLLBACK");
                Err(EngramError::Storage(StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }))
            }
        }
    }

    /// Applied + pending view for `migrate status`.
    pub fn status(&self, conn: &Connection) -> EngramResult<MigrationStatus> {
        let current_version = Self::current_version(conn)?;

        let applied = if current_version > 0 {
            let mut stmt = conn
                .prepare(
                    "SELECT version, applied_at, checksum FROM schema_migrations ORDER BY version",
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(AppliedMigration {
                        version: row.get(0)?,
                        applied_at: row.get(1)?,
                        checksum: row.get(2)?,
                    })
                })
                .map_err(|e| to_storage_err(e.to_string()))?;
            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| to_storage_err(e.to_string()))?
        } else {
            Vec::new()
        };

        let pending = self
            .migrations
            .iter()
            .filter(|m| m.version > current_version)
            .map(|m| (m.version, m.name.clone()))
            .collect();

        Ok(MigrationStatus {
            current_version,
            applied,
            pending,
        })
    }
}

/// First 16 hex chars of the SHA-256 of the migration SQL.
fn sql_checksum(sql: &str) -> String {
    let digest = Sha256::digest(sql.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..16].to_string()
}

/// Create the bookkeeping table if needed.
fn ensure_migrations_table(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL,
            checksum    TEXT NOT NULL
        )",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Execute every statement of a migration file, skipping idempotency errors.
fn apply_statements(conn: &Connection, sql: &str) -> EngramResult<()> {
    for stmt in split_statements(sql) {
        if let Err(e) = conn.execute_batch(&stmt) {
            let msg = e.to_string().to_lowercase();
            if msg.contains("duplicate column") || msg.contains("already exists") {
                debug!("skipping idempotent statement: {msg}");
                continue;
            }
            return Err(to_storage_err(e.to_string()));
        }
    }
    Ok(())
}

/// Split migration SQL on `;`, keeping trigger bodies (`BEGIN ... END`)
/// intact and dropping comment-only fragments.
fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_trigger = false;

    for raw_line in sql.lines() {
        let line = raw_line.trim();
        if line.starts_with("--") || line.is_empty() {
            continue;
        }
        current.push_str(raw_line);
        current.push('\n');

        let upper = line.to_uppercase();
        if upper.ends_with("BEGIN") {
            in_trigger = true;
        }
        if in_trigger {
            if upper == "END;" || upper.ends_with(" END;") {
                statements.push(current.trim().to_string());
                current.clear();
                in_trigger = false;
            }
        } else if line.ends_with(';') {
            statements.push(current.trim().to_string());
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_statements() {
        let stmts = split_statements("CREATE TABLE a (x);\n-- comment\nCREATE TABLE b (y);\n");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TABLE a"));
    }

    #[test]
    fn keeps_trigger_bodies_whole() {
        let sql = "CREATE TABLE t (x);\nCREATE TRIGGER tr AFTER INSERT ON t BEGIN\n    INSERT INTO t(x) VALUES (1);\n    INSERT INTO t(x) VALUES (2);\nEND;\n";
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[1].contains("VALUES (1)"));
        assert!(stmts[1].contains("VALUES (2)"));
        assert!(stmts[1].trim_end().ends_with("END;"));
    }

    #[test]
    fn checksum_is_sixteen_hex_chars() {
        let c = sql_checksum("CREATE TABLE x (y);");
        assert_eq!(c.len(), 16);
        assert!(c.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
