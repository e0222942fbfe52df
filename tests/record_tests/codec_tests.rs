//! Tests for the record codec
//!
//! These tests verify:
//! - The 67-byte layout and field positions
//! - Name truncation and terminator handling
//! - Preservation of bytes past the name terminator
//! - Slot scanning over a data file

use slotdb::config::SyncStrategy;
use slotdb::record::{
    Record, SlotScanner, StoredRecord, ACTIVE_FLAG_OFFSET, NAME_CAPACITY, RECORD_SIZE,
};
use slotdb::storage::ByteStore;
use slotdb::SlotError;
use tempfile::TempDir;

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_record_size_is_67() {
    assert_eq!(RECORD_SIZE, 67);
    assert_eq!(NAME_CAPACITY, 49);
    assert_eq!(ACTIVE_FLAG_OFFSET, 54);
}

#[test]
fn test_encode_field_positions() {
    let record = Record::new(0x01020304, "Ann", 4.5, -7);
    let bytes = StoredRecord::from_record(&record).encode();

    assert_eq!(&bytes[0..4], &0x01020304i32.to_le_bytes());
    assert_eq!(&bytes[4..7], b"Ann");
    assert!(bytes[7..54].iter().all(|&b| b == 0));
    assert_eq!(bytes[54], 1);
    assert_eq!(&bytes[55..63], &4.5f64.to_le_bytes());
    assert_eq!(&bytes[63..67], &(-7i32).to_le_bytes());
}

#[test]
fn test_decode_recovers_record() {
    let record = Record::new(42, "Grace Hopper", 3.75, 4);
    let stored = StoredRecord::from_record(&record);

    let decoded = StoredRecord::decode(&stored.encode()).unwrap();

    assert_eq!(decoded, stored);
    assert_eq!(decoded.to_record(), record);
}

#[test]
fn test_decode_rejects_wrong_length() {
    let result = StoredRecord::decode(&[0u8; 66]);
    assert!(matches!(result, Err(SlotError::Serialization(_))));
}

#[test]
fn test_inactive_flag_roundtrip() {
    let mut record = Record::new(9, "Bob", 2.0, 1);
    record.is_active = false;

    let stored = StoredRecord::from_record(&record);

    assert!(!stored.is_active());
    assert_eq!(stored.encode()[ACTIVE_FLAG_OFFSET], 0);
}

#[test]
fn test_tombstoned_clears_only_active_byte() {
    let stored = StoredRecord::from_record(&Record::new(5, "Eve", 3.3, 2));

    let before = stored.encode();
    let after = stored.tombstoned().encode();

    for i in 0..RECORD_SIZE {
        if i == ACTIVE_FLAG_OFFSET {
            assert_eq!(after[i], 0);
        } else {
            assert_eq!(after[i], before[i], "byte {} changed", i);
        }
    }
}

// =============================================================================
// Name Tests
// =============================================================================

#[test]
fn test_long_name_truncated_to_capacity() {
    let long = "x".repeat(80);
    let stored = StoredRecord::from_record(&Record::new(1, long, 0.0, 1));

    assert_eq!(stored.name_bytes().len(), NAME_CAPACITY);
    assert_eq!(stored.name(), "x".repeat(NAME_CAPACITY));
    assert_eq!(stored.encode()[4 + NAME_CAPACITY], 0);
}

#[test]
fn test_truncation_respects_char_boundaries() {
    // 24 two-byte chars = 48 bytes, then a third two-byte char would cross 49
    let name = "é".repeat(30);
    let stored = StoredRecord::from_record(&Record::new(1, name, 0.0, 1));

    assert_eq!(stored.name_bytes().len(), 48);
    assert_eq!(stored.name(), "é".repeat(24));
}

#[test]
fn test_name_of_exact_capacity_kept_whole() {
    let name = "n".repeat(NAME_CAPACITY);
    let stored = StoredRecord::from_record(&Record::new(1, name.clone(), 0.0, 1));

    assert_eq!(stored.name(), name);
}

#[test]
fn test_bytes_after_terminator_preserved() {
    let mut bytes = StoredRecord::from_record(&Record::new(3, "Al", 1.0, 1)).encode();
    // Garbage after the terminator, as another writer might leave it
    bytes[10] = 0xAB;
    bytes[40] = 0xCD;

    let stored = StoredRecord::decode(&bytes).unwrap();

    assert_eq!(stored.name(), "Al");
    assert_eq!(stored.encode(), bytes);
    assert_eq!(stored.tombstoned().encode()[40], 0xCD);
}

#[test]
fn test_default_record() {
    let record = Record::default();

    assert_eq!(record.id, 0);
    assert_eq!(record.name, "");
    assert!(record.is_active);
    assert_eq!(record.average_grade, 0.0);
    assert_eq!(record.course, 1);
}

// =============================================================================
// Scanner Tests
// =============================================================================

#[test]
fn test_scanner_yields_offsets_and_skips_partial_slot() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scan.db");
    let mut file = ByteStore::new(SyncStrategy::OsBuffered);
    file.create(&path).unwrap();

    for id in 1..=3 {
        let rec = StoredRecord::from_record(&Record::new(id, format!("r{}", id), 1.0, 1));
        file.append(&rec.encode()).unwrap();
    }
    file.append(&[0xFF; 20]).unwrap();

    let slots: Vec<(u64, i32)> = SlotScanner::new(&mut file)
        .map(|item| item.map(|(off, rec)| (off, rec.id)))
        .collect::<slotdb::Result<_>>()
        .unwrap();

    assert_eq!(slots, vec![(0, 1), (67, 2), (134, 3)]);
}

#[test]
fn test_scanner_active_filters_tombstones() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scan.db");
    let mut file = ByteStore::new(SyncStrategy::OsBuffered);
    file.create(&path).unwrap();

    for id in 1..=4 {
        let mut rec = Record::new(id, "r", 1.0, 1);
        rec.is_active = id % 2 == 0;
        file.append(&StoredRecord::from_record(&rec).encode()).unwrap();
    }

    let ids: Vec<i32> = SlotScanner::new(&mut file)
        .active()
        .map(|item| item.unwrap().1.id)
        .collect();

    assert_eq!(ids, vec![2, 4]);
}
