//! Unit tests for snapshot stores

use std::fs;

use signalwatch::snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use tempfile::tempdir;

#[test]
fn test_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let store = FileSnapshotStore::load(dir.path().join("seen.json"));
    assert!(store.is_empty());
    assert!(store.get("Ripple News").is_none());
}

#[test]
fn test_record_persists_across_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seen.json");

    let mut store = FileSnapshotStore::load(&path);
    store.record("Ripple News", "abc123").unwrap();
    store.record("Tether Blog", "def456").unwrap();
    store.record("Ripple News", "fff000").unwrap();

    let reloaded = FileSnapshotStore::load(&path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("Ripple News"), Some("fff000"));
    assert_eq!(reloaded.get("Tether Blog"), Some("def456"));
}

#[test]
fn test_file_is_a_flat_json_object() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seen.json");

    let mut store = FileSnapshotStore::load(&path);
    store.record("Circle Blog", "0011").unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!({ "Circle Blog": "0011" }));
}

#[test]
fn test_creates_missing_parent_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("seen.json");

    let mut store = FileSnapshotStore::load(&path);
    store.record("XRPLF GitHub", "beef").unwrap();
    assert!(path.exists());
}

#[test]
fn test_malformed_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seen.json");
    fs::write(&path, "{ not json").unwrap();

    let store = FileSnapshotStore::load(&path);
    assert!(store.is_empty());
}

#[test]
fn test_failed_write_rolls_back_and_keeps_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut store = FileSnapshotStore::load(blocker.join("seen.json"));
    assert!(store.record("Ripple News", "abc").is_err());
    assert!(store.get("Ripple News").is_none());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
}

#[test]
fn test_failed_write_restores_previous_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seen.json");
    let mut store = FileSnapshotStore::load(&path);
    store.record("Ripple News", "old").unwrap();

    // Swap the target for a directory so the final rename fails
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    assert!(store.record("Ripple News", "new").is_err());
    assert_eq!(store.get("Ripple News"), Some("old"));
}

#[test]
fn test_memory_store() {
    let mut store = MemorySnapshotStore::new();
    assert!(store.is_empty());
    store.record("a", "1").unwrap();
    assert_eq!(store.get("a"), Some("1"));
    assert_eq!(store.len(), 1);
}
