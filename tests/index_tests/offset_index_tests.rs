//! Tests for OffsetIndex
//!
//! These tests verify:
//! - Side-index file layout (12-byte pairs, no header)
//! - Load/persist round trip
//! - Partial trailing pairs dropped on load
//! - Missing or corrupt files fail to load

use std::fs;
use std::path::PathBuf;

use slotdb::config::SyncStrategy;
use slotdb::index::{IndexEntry, OffsetIndex};
use slotdb::SlotError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.db.idx");
    (temp_dir, path)
}

fn pair_bytes(id: i32, offset: i64) -> Vec<u8> {
    let mut bytes = id.to_le_bytes().to_vec();
    bytes.extend_from_slice(&offset.to_le_bytes());
    bytes
}

// =============================================================================
// In-Memory Tests
// =============================================================================

#[test]
fn test_insert_get_remove() {
    let mut index = OffsetIndex::new();
    assert!(index.is_empty());

    index.insert(1, 0);
    index.insert(2, 67);

    assert_eq!(index.get(1), Some(0));
    assert_eq!(index.get(2), Some(67));
    assert!(index.contains(2));
    assert_eq!(index.len(), 2);

    assert_eq!(index.remove(1), Some(0));
    assert_eq!(index.get(1), None);
    assert_eq!(index.len(), 1);
}

#[test]
fn test_sorted_entries_by_offset() {
    let index: OffsetIndex = [(9, 134), (3, 0), (5, 67)].into_iter().collect();

    let entries = index.sorted_entries();

    assert_eq!(
        entries,
        vec![
            IndexEntry { id: 3, offset: 0 },
            IndexEntry { id: 5, offset: 67 },
            IndexEntry { id: 9, offset: 134 },
        ]
    );
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_persist_writes_fixed_width_pairs() {
    let (_temp, path) = setup_temp_index();
    let index: OffsetIndex = [(7, 67), (1, 0)].into_iter().collect();

    index.persist(&path, SyncStrategy::EveryWrite).unwrap();

    let mut expected = pair_bytes(1, 0);
    expected.extend(pair_bytes(7, 67));
    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_persist_empty_index_writes_empty_file() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, b"stale").unwrap();

    OffsetIndex::new().persist(&path, SyncStrategy::OsBuffered).unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_load_roundtrip() {
    let (_temp, path) = setup_temp_index();
    let index: OffsetIndex = (0..100).map(|i| (i * 3, i as u64 * 67)).collect();

    index.persist(&path, SyncStrategy::OsBuffered).unwrap();
    let loaded = OffsetIndex::load(&path).unwrap();

    assert_eq!(loaded, index);
}

#[test]
fn test_load_drops_partial_trailing_pair() {
    let (_temp, path) = setup_temp_index();
    let mut bytes = pair_bytes(1, 0);
    bytes.extend(pair_bytes(2, 67));
    // Half of a third pair: full id, truncated offset
    bytes.extend_from_slice(&3i32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 5]);
    fs::write(&path, bytes).unwrap();

    let loaded = OffsetIndex::load(&path).unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get(2), Some(67));
    assert_eq!(loaded.get(3), None);
}

#[test]
fn test_load_empty_file() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, b"").unwrap();

    assert!(OffsetIndex::load(&path).unwrap().is_empty());
}

#[test]
fn test_load_missing_file_fails() {
    let (_temp, path) = setup_temp_index();

    let result = OffsetIndex::load(&path);

    assert!(matches!(result, Err(SlotError::Io(_))));
}

#[test]
fn test_load_negative_offset_fails() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, pair_bytes(1, -67)).unwrap();

    let result = OffsetIndex::load(&path);

    assert!(matches!(result, Err(SlotError::Serialization(_))));
}

#[test]
fn test_later_duplicate_pair_wins() {
    let (_temp, path) = setup_temp_index();
    let mut bytes = pair_bytes(4, 0);
    bytes.extend(pair_bytes(4, 134));
    fs::write(&path, bytes).unwrap();

    let loaded = OffsetIndex::load(&path).unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get(4), Some(134));
}
