//! Slot Scanner
//!
//! Sequential iteration over every whole slot in a data file.

use crate::error::Result;
use crate::storage::ByteStore;

use super::{StoredRecord, RECORD_SIZE};

/// Iterator over `(offset, record)` pairs in ascending-offset order
///
/// Yields tombstoned slots too; callers filter on `is_active`. A trailing
/// partial slot ends the iteration.
pub struct SlotScanner<'a> {
    store: &'a mut ByteStore,
    /// Offset of the next slot to be read
    offset: u64,
    /// Set once an error has been yielded
    done: bool,
}

impl<'a> SlotScanner<'a> {
    /// Start scanning from offset 0
    pub fn new(store: &'a mut ByteStore) -> Self {
        store.seek_to_begin();
        Self {
            store,
            offset: 0,
            done: false,
        }
    }

    /// Only live slots
    pub fn active(self) -> impl Iterator<Item = Result<(u64, StoredRecord)>> + 'a {
        self.filter(|item| match item {
            Ok((_, record)) => record.is_active(),
            Err(_) => true,
        })
    }
}

impl<'a> Iterator for SlotScanner<'a> {
    type Item = Result<(u64, StoredRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let bytes = match self.store.read_next(RECORD_SIZE) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let offset = self.offset;
        self.offset += RECORD_SIZE as u64;

        match StoredRecord::decode(&bytes) {
            Ok(record) => Some(Ok((offset, record))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
