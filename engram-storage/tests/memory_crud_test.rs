use chrono::Utc;
use engram_core::memory::{Memory, MemoryType};
use engram_core::EngramError;
use engram_storage::MemoryStore;

fn store() -> MemoryStore {
    MemoryStore::open_in_memory().unwrap()
}

fn mem(content: &str) -> Memory {
    Memory::new(content, "claude-code", Utc::now())
}

#[test]
fn insert_then_find_round_trips() {
    let store = store();
    let mut m = mem("use ripgrep for recursive search");
    m.why = Some("explicit".to_string());
    m.project = Some("/home/user/proj".to_string());
    m.importance = 0.8;
    m.memory_type = MemoryType::Preference;
    m.tags = Some("tools,search".to_string());
    m.updated_by = Some("claude-code".to_string());

    let id = store.insert(&m).unwrap();
    assert_eq!(id, m.id);

    let found = store.find_by_id(&id).unwrap().unwrap();
    assert_eq!(found.content, m.content);
    assert_eq!(found.who, "claude-code");
    assert_eq!(found.why.as_deref(), Some("explicit"));
    assert_eq!(found.project.as_deref(), Some("/home/user/proj"));
    assert_eq!(found.importance, 0.8);
    assert_eq!(found.memory_type, MemoryType::Preference);
    assert_eq!(found.tags.as_deref(), Some("tools,search"));
    assert!(!found.pinned);
    assert_eq!(found.access_count, 0);
    assert_eq!(found.updated_by.as_deref(), Some("claude-code"));
}

#[test]
fn find_missing_returns_none() {
    let store = store();
    assert!(store.find_by_id("no-such-id").unwrap().is_none());
}

#[test]
fn delete_removes_row_and_fts_entry() {
    let store = store();
    let m = mem("ephemeral detail about zebras");
    store.insert(&m).unwrap();
    assert_eq!(store.fts_search("zebras", 10).unwrap().len(), 1);

    store.delete_by_id(&m.id).unwrap();
    assert!(store.find_by_id(&m.id).unwrap().is_none());
    assert!(store.fts_search("zebras", 10).unwrap().is_empty());
}

#[test]
fn empty_content_is_rejected() {
    let store = store();
    let m = mem("");
    let err = store.insert(&m).unwrap_err();
    assert!(matches!(err, EngramError::Ingest(_)));
}

#[test]
fn untrimmed_content_is_rejected() {
    let store = store();
    let m = mem("  padded  ");
    assert!(store.insert(&m).is_err());
}

#[test]
fn out_of_range_importance_is_rejected() {
    let store = store();
    let mut m = mem("valid content");
    m.importance = 1.5;
    assert!(store.insert(&m).is_err());
}

#[test]
fn fts_rank_is_lower_for_better_matches() {
    let store = store();
    let mut a = mem("tokio tokio tokio runtime");
    a.id = "a".to_string();
    let mut b = mem("a long sentence that mentions tokio once among many other words");
    b.id = "b".to_string();
    store.insert(&a).unwrap();
    store.insert(&b).unwrap();

    let hits = store.fts_search("tokio", 10).unwrap();
    assert_eq!(hits.len(), 2);
    // First hit is the better match, and SQLite ranks are lower-is-better.
    assert_eq!(hits[0].0, "a");
    assert!(hits[0].1 <= hits[1].1);
}

#[test]
fn malformed_match_query_is_fts_unavailable() {
    let store = store();
    store.insert(&mem("some content")).unwrap();
    let err = store.fts_search("\"unclosed", 10).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(engram_core::errors::StorageError::FtsUnavailable { .. })
    ));
}

#[test]
fn tag_search_is_case_insensitive_substring() {
    let store = store();
    let mut m = mem("prefer tokio over async-std");
    m.tags = Some("rust,async".to_string());
    store.insert(&m).unwrap();

    let hits = store.tag_search("ASYNC", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, m.id);
    assert!(store.tag_search("python", 10).unwrap().is_empty());
}

#[test]
fn update_access_bumps_count_and_timestamp() {
    let store = store();
    let m = mem("frequently used fact");
    store.insert(&m).unwrap();

    let now = Utc::now();
    store.update_access(&[m.id.clone()], now).unwrap();
    store.update_access(&[m.id.clone()], now).unwrap();

    let found = store.find_by_id(&m.id).unwrap().unwrap();
    assert_eq!(found.access_count, 2);
    assert!(found.last_accessed.is_some());
}

#[test]
fn update_access_with_no_ids_is_a_noop() {
    let store = store();
    store.update_access(&[], Utc::now()).unwrap();
}

#[test]
fn high_value_returns_pinned_and_important() {
    let store = store();

    let mut pinned = mem("critical rule");
    pinned.pinned = true;
    pinned.importance = 0.3;
    let mut important = mem("key decision about storage");
    important.importance = 0.9;
    let ordinary = mem("minor note");

    store.insert(&pinned).unwrap();
    store.insert(&important).unwrap();
    store.insert(&ordinary).unwrap();

    let rows = store.high_value(10).unwrap();
    assert_eq!(rows.len(), 2);
    // Ordered by importance descending.
    assert_eq!(rows[0].id, important.id);
    assert_eq!(rows[1].id, pinned.id);
}

#[test]
fn session_candidates_respects_project_scope() {
    let store = store();

    let mut here = mem("fact for this project");
    here.project = Some("/proj/a".to_string());
    let mut global = mem("fact for everyone");
    global.project = Some("global".to_string());
    let mut unscoped = mem("fact with no project");
    unscoped.project = None;
    let mut elsewhere = mem("fact for another project");
    elsewhere.project = Some("/proj/b".to_string());

    for m in [&here, &global, &unscoped, &elsewhere] {
        store.insert(m).unwrap();
    }

    let rows = store.session_candidates(Some("/proj/a"), 100).unwrap();
    let ids: Vec<_> = rows.iter().map(|m| m.id.as_str()).collect();
    assert!(ids.contains(&here.id.as_str()));
    assert!(ids.contains(&global.id.as_str()));
    assert!(ids.contains(&unscoped.id.as_str()));
    assert!(!ids.contains(&elsewhere.id.as_str()));
    // Current-project rows sort first.
    assert_eq!(rows[0].id, here.id);
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memories.db");

    let m = mem("persisted across reopen");
    {
        let store = MemoryStore::open(&path).unwrap();
        store.insert(&m).unwrap();
    }

    let store = MemoryStore::open(&path).unwrap();
    let found = store.find_by_id(&m.id).unwrap().unwrap();
    assert_eq!(found.content, "persisted across reopen");
    assert_eq!(store.fts_search("reopen", 10).unwrap().len(), 1);
}
