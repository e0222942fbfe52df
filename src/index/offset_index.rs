//! Offset index implementation
//!
//! HashMap-based index, persisted as bincode-encoded pairs.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SyncStrategy;
use crate::error::{Result, SlotError};

/// One (id, offset) pair as stored in the side-index file
///
/// Encoded with bincode's fixed-width little-endian layout: 12 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: i32,
    pub offset: i64,
}

/// In-memory map from active id to slot offset
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OffsetIndex {
    entries: HashMap<i32, u64>,
}

impl OffsetIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pairs from a side-index file
    ///
    /// Reads until end-of-file; a partial trailing pair is dropped. Fails if
    /// the file is missing or unreadable.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut entries = HashMap::new();

        loop {
            match bincode::deserialize_from::<_, IndexEntry>(&mut reader) {
                Ok(entry) => {
                    let offset = u64::try_from(entry.offset).map_err(|_| {
                        SlotError::Serialization(format!(
                            "negative offset {} for id {} in {}",
                            entry.offset,
                            entry.id,
                            path.display()
                        ))
                    })?;
                    entries.insert(entry.id, offset);
                }
                Err(err) => match *err {
                    bincode::ErrorKind::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                        break
                    }
                    bincode::ErrorKind::Io(e) => return Err(e.into()),
                    other => return Err(SlotError::Serialization(other.to_string())),
                },
            }
        }

        tracing::debug!("Loaded {} index entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Rewrite the whole side-index file from memory
    ///
    /// Pairs are written in ascending offset order.
    pub fn persist(&self, path: &Path, sync_strategy: SyncStrategy) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);

        for entry in self.sorted_entries() {
            bincode::serialize_into(&mut writer, &entry)
                .map_err(|e| SlotError::Serialization(e.to_string()))?;
        }

        let file = writer.into_inner().map_err(|e| {
            SlotError::Serialization(format!("Failed to flush side index: {}", e))
        })?;
        if sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }

        tracing::trace!("Persisted {} index entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Entries ordered by offset (ties broken by id)
    pub fn sorted_entries(&self) -> Vec<IndexEntry> {
        let mut out: Vec<IndexEntry> = self
            .entries
            .iter()
            .map(|(&id, &offset)| IndexEntry {
                id,
                offset: offset as i64,
            })
            .collect();
        out.sort_by_key(|e| (e.offset, e.id));
        out
    }

    pub fn get(&self, id: i32) -> Option<u64> {
        self.entries.get(&id).copied()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn insert(&mut self, id: i32, offset: u64) -> Option<u64> {
        self.entries.insert(id, offset)
    }

    pub fn remove(&mut self, id: i32) -> Option<u64> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<(i32, u64)> for OffsetIndex {
    fn from_iter<I: IntoIterator<Item = (i32, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
