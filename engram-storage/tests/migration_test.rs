use engram_core::EngramError;
use engram_storage::{MemoryStore, Migrator};

#[test]
fn fresh_store_is_at_latest_builtin_version() {
    let store = MemoryStore::open_in_memory().unwrap();
    let migrator = Migrator::builtin();
    let status = store.migration_status(&migrator).unwrap();
    assert_eq!(status.current_version, migrator.latest_version());
    assert!(status.pending.is_empty());
    assert_eq!(status.applied.len(), 3);
}

#[test]
fn rerunning_is_a_noop() {
    let store = MemoryStore::open_in_memory().unwrap();
    let applied = store.run_migrations(&Migrator::builtin()).unwrap();
    assert_eq!(applied, 0);
}

#[test]
fn applied_rows_carry_timestamp_and_checksum() {
    let store = MemoryStore::open_in_memory().unwrap();
    let status = store.migration_status(&Migrator::builtin()).unwrap();
    for row in &status.applied {
        assert_eq!(row.checksum.len(), 16);
        assert!(row.checksum.chars().all(|c| c.is_ascii_hexdigit()));
        // UTC ISO-8601.
        assert!(row.applied_at.ends_with('Z'), "got {}", row.applied_at);
    }
    let versions: Vec<u32> = status.applied.iter().map(|a| a.version).collect();
    assert_eq!(versions, vec![1, 2, 3]);
}

#[test]
fn directory_migrations_apply_in_numeric_order() {
    let dir = tempfile::tempdir().unwrap();
    // Written out of order on purpose; numeric prefix wins.
    std::fs::write(
        dir.path().join("010_second.sql"),
        "CREATE TABLE second (id INTEGER PRIMARY KEY, first_id INTEGER REFERENCES first(id));",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("004_first.sql"),
        "CREATE TABLE first (id INTEGER PRIMARY KEY);",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    std::fs::write(dir.path().join("README.sql.bak"), "ignored too").unwrap();

    let store = MemoryStore::open_in_memory().unwrap();
    let migrator = Migrator::from_dir(dir.path()).unwrap();
    assert_eq!(migrator.latest_version(), 10);

    let applied = store.run_migrations(&migrator).unwrap();
    assert_eq!(applied, 2);

    let status = store.migration_status(&migrator).unwrap();
    assert_eq!(status.current_version, 10);
}

#[test]
fn duplicate_column_errors_are_skipped() {
    // Re-adding a column that migration 003 already created should be
    // silently skipped, not fail the run.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("004_readd.sql"),
        "ALTER TABLE memories ADD COLUMN updated_at TEXT;\nALTER TABLE memories ADD COLUMN extra TEXT;",
    )
    .unwrap();

    let store = MemoryStore::open_in_memory().unwrap();
    let migrator = Migrator::from_dir(dir.path()).unwrap();
    assert_eq!(store.run_migrations(&migrator).unwrap(), 1);
}

#[test]
fn failing_migration_aborts_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("004_good.sql"),
        "CREATE TABLE good (id INTEGER PRIMARY KEY);",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("005_bad.sql"),
        "CREATE TABLE partial (id INTEGER PRIMARY KEY);\nTHIS IS NOT SQL;",
    )
    .unwrap();

    let store = MemoryStore::open_in_memory().unwrap();
    let migrator = Migrator::from_dir(dir.path()).unwrap();
    let err = store.run_migrations(&migrator).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(engram_core::errors::StorageError::MigrationFailed {
            version: 5,
            ..
        })
    ));

    // 004 stays applied; 005 left no trace.
    let status = store.migration_status(&migrator).unwrap();
    assert_eq!(status.current_version, 4);
    assert_eq!(status.pending, vec![(5, "bad".to_string())]);
}
