//! Record Store
//!
//! The domain layer over a [`ByteStore`]: record encoding, the offset index,
//! and every query/mutation/backup protocol.
//!
//! ## Responsibilities
//! - Keep the side-index in step with the data file after every mutation
//! - Point operations by id through the index, everything else by scan
//! - Tombstone deletes and in-place edits that never move a slot
//! - Backup, and restore with an unconditional index rebuild
//! - CSV export and a coarse integrity check

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SlotError};
use crate::index::{IndexEntry, OffsetIndex};
use crate::protocol::{Command, Payload, Response};
use crate::record::{Field, Predicate, Record, SlotScanner, StoredRecord, RECORD_SIZE};
use crate::storage::ByteStore;

/// Header line written by [`RecordStore::export_csv`]
const CSV_HEADER: &str = "id,name,isActive,averageGrade,cours";

/// The record store
///
/// ## Ownership Model
///
/// One store owns exactly one data-file handle and one in-memory index.
/// Every method takes `&mut self`; callers sharing a store across threads
/// must serialize access themselves. Dropping the store closes it, which
/// persists the index and releases the handle.
pub struct RecordStore {
    /// Store configuration
    config: Config,

    /// Data file access
    file: ByteStore,

    /// Active id -> slot offset
    index: OffsetIndex,

    /// Data and side-index paths; `None` while closed
    paths: Option<StorePaths>,
}

#[derive(Debug, Clone)]
struct StorePaths {
    data: PathBuf,
    index: PathBuf,
}

/// Counts behind [`RecordStore::check_integrity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Whole slots in the data file, tombstones included
    pub total_slots: usize,
    /// Slots whose active byte is set
    pub active_records: usize,
    /// Entries in the in-memory index
    pub indexed_ids: usize,
}

impl IntegrityReport {
    /// Whether the active-record count matches the index size
    pub fn is_consistent(&self) -> bool {
        self.active_records == self.indexed_ids
    }

    /// `Err(IntegrityMismatch)` when the counts disagree
    pub fn into_result(self) -> Result<Self> {
        if self.is_consistent() {
            Ok(self)
        } else {
            Err(SlotError::IntegrityMismatch {
                indexed: self.indexed_ids,
                active: self.active_records,
            })
        }
    }
}

impl RecordStore {
    /// Create a closed store with the given config
    pub fn new(config: Config) -> Self {
        let file = ByteStore::new(config.sync_strategy);
        Self {
            config,
            file,
            index: OffsetIndex::new(),
            paths: None,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create a fresh, empty database at `path` and open it
    ///
    /// Any existing data file and side-index at that path are overwritten.
    pub fn create_database(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.close()?;

        self.file.create(path)?;
        self.index.clear();
        let paths = self.paths_for(path);
        if let Err(e) = self.index.persist(&paths.index, self.config.sync_strategy) {
            self.file.close()?;
            return Err(e);
        }
        self.paths = Some(paths);

        tracing::info!("Created database {}", path.display());
        Ok(())
    }

    /// Open (or create) the database at `path` and load its side-index
    ///
    /// A missing or unreadable side-index is replaced by a freshly written
    /// empty one; the data file is not rescanned.
    pub fn open_database(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.close()?;

        self.file.open(path)?;
        let paths = self.paths_for(path);

        self.index = match OffsetIndex::load(&paths.index) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(
                    "Side index {} not loaded ({}); starting from an empty index",
                    paths.index.display(),
                    e
                );
                let index = OffsetIndex::new();
                if let Err(e) = index.persist(&paths.index, self.config.sync_strategy) {
                    self.file.close()?;
                    return Err(e);
                }
                index
            }
        };
        self.paths = Some(paths);

        tracing::info!(
            "Opened database {} ({} indexed records)",
            path.display(),
            self.index.len()
        );
        Ok(())
    }

    /// Persist the index, release the file handle and clear the index
    ///
    /// Idempotent. The handle is released even when the persist fails.
    pub fn close(&mut self) -> Result<()> {
        let Some(paths) = self.paths.take() else {
            return Ok(());
        };

        let persisted = self.index.persist(&paths.index, self.config.sync_strategy);
        let closed = self.file.close();
        self.index.clear();

        tracing::info!("Closed database {}", paths.data.display());
        persisted.and(closed)
    }

    /// Close the store and delete `path` and its side-index from disk
    pub fn remove_database(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.close()?;

        let paths = self.paths_for(path);
        for file in [&paths.data, &paths.index] {
            match fs::remove_file(file) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!("Removed database {}", path.display());
        Ok(())
    }

    /// Drop every record: truncate the data file and persist an empty index
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_open()?;

        self.file.truncate()?;
        self.index.clear();
        self.persist_index()?;

        tracing::info!("Cleared database");
        Ok(())
    }

    /// Persist the index without touching the data file
    pub fn save(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.persist_index()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a new record and index it
    ///
    /// Returns the slot offset. The record is always stored as active.
    /// If the append succeeds but the side-index persist fails, the error is
    /// returned while the slot and its in-memory index entry stay in place;
    /// the next successful persist (any mutation, `save` or `close`) writes
    /// the entry out, and re-adding the same id is a `DuplicateKey`.
    pub fn add_record(&mut self, record: &Record) -> Result<u64> {
        self.ensure_open()?;

        if self.index.contains(record.id) {
            return Err(SlotError::DuplicateKey(record.id));
        }

        let stored = Self::live_slot(record);
        let offset = self.file.append(&stored.encode())?;

        self.index.insert(record.id, offset);
        self.persist_index()?;

        tracing::debug!("Added record {} at offset {}", record.id, offset);
        Ok(offset)
    }

    /// Tombstone every active record whose `field` equals `value`
    ///
    /// `id` goes through the index; other fields scan the whole file.
    /// Returns the number of records deleted.
    pub fn delete_by_field(&mut self, field: Field, value: &str) -> Result<usize> {
        self.ensure_open()?;

        let predicate = Predicate::parse(field, value)?;
        if let Predicate::Id(id) = predicate {
            return self.delete_by_id(id);
        }

        let matches = self.select(&predicate)?;
        let mut deleted = 0;
        for (offset, record) in matches {
            if let Err(e) = self.file.write_at(offset, &record.tombstoned().encode()) {
                // Keep the index in step with the slots already tombstoned.
                self.persist_index()?;
                return Err(e);
            }
            if self.index.get(record.id) == Some(offset) {
                self.index.remove(record.id);
            }
            deleted += 1;
        }
        self.persist_index()?;

        tracing::debug!("Deleted {} records where {} = {:?}", deleted, field, value);
        Ok(deleted)
    }

    fn delete_by_id(&mut self, id: i32) -> Result<usize> {
        let Some(offset) = self.index.get(id) else {
            return Ok(0);
        };

        let record = self.read_slot(offset)?;
        if !record.is_active() {
            tracing::warn!("Index entry for {} points at tombstoned slot {}; dropping it", id, offset);
            self.index.remove(id);
            self.persist_index()?;
            return Ok(0);
        }

        self.file.write_at(offset, &record.tombstoned().encode())?;
        self.index.remove(id);
        self.persist_index()?;

        tracing::debug!("Deleted record {} at offset {}", id, offset);
        Ok(1)
    }

    /// Rewrite the record indexed under `key_id` in place
    ///
    /// The slot keeps its offset even when the id changes; the index entry is
    /// remapped to the new id. Nothing is written if the new id collides with
    /// another active record.
    pub fn edit_record_by_key(&mut self, key_id: i32, record: &Record) -> Result<()> {
        self.ensure_open()?;

        let offset = self
            .index
            .get(key_id)
            .ok_or(SlotError::RecordNotFound(key_id))?;
        if !self.read_slot(offset)?.is_active() {
            return Err(SlotError::RecordNotFound(key_id));
        }
        if record.id != key_id && self.index.contains(record.id) {
            return Err(SlotError::DuplicateKey(record.id));
        }

        self.file.write_at(offset, &Self::live_slot(record).encode())?;
        if record.id != key_id {
            self.index.remove(key_id);
            self.index.insert(record.id, offset);
        }
        self.persist_index()?;

        tracing::debug!("Edited record {} -> {} at offset {}", key_id, record.id, offset);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every active record whose `field` equals `value`, in file order
    pub fn search_by_field(&mut self, field: Field, value: &str) -> Result<Vec<Record>> {
        self.ensure_open()?;

        let predicate = Predicate::parse(field, value)?;
        if let Predicate::Id(id) = predicate {
            let Some(offset) = self.index.get(id) else {
                return Ok(Vec::new());
            };
            let record = self.read_slot(offset)?;
            return Ok(if record.is_active() {
                vec![record.to_record()]
            } else {
                Vec::new()
            });
        }

        let records = self
            .select(&predicate)?
            .into_iter()
            .map(|(_, record)| record.to_record())
            .collect::<Vec<_>>();

        tracing::debug!("Search {} = {:?} matched {} records", field, value, records.len());
        Ok(records)
    }

    /// Every active record, in file order
    pub fn get_all(&mut self) -> Result<Vec<Record>> {
        self.ensure_open()?;

        Ok(self
            .select(&Predicate::Any)?
            .into_iter()
            .map(|(_, record)| record.to_record())
            .collect())
    }

    /// Whether the number of active slots equals the number of index entries
    ///
    /// Only cardinalities are compared, not individual offsets.
    pub fn check_integrity(&mut self) -> Result<bool> {
        Ok(self.integrity_report()?.is_consistent())
    }

    /// Slot and index counts from a full scan
    pub fn integrity_report(&mut self) -> Result<IntegrityReport> {
        self.ensure_open()?;

        let mut total_slots = 0;
        let mut active_records = 0;
        for item in SlotScanner::new(&mut self.file) {
            let (_, record) = item?;
            total_slots += 1;
            if record.is_active() {
                active_records += 1;
            }
        }

        let report = IntegrityReport {
            total_slots,
            active_records,
            indexed_ids: self.index.len(),
        };
        if !report.is_consistent() {
            tracing::warn!(
                "Integrity mismatch: {} active records, {} indexed",
                report.active_records,
                report.indexed_ids
            );
        }
        Ok(report)
    }

    /// Rebuild the index from a full scan of active slots and persist it
    ///
    /// Returns the number of indexed records. If two active slots share an
    /// id, the later one wins.
    pub fn rebuild_index(&mut self) -> Result<usize> {
        self.ensure_open()?;

        let index = SlotScanner::new(&mut self.file)
            .active()
            .map(|item| item.map(|(offset, record)| (record.id, offset)))
            .collect::<Result<OffsetIndex>>()?;

        self.index = index;
        self.persist_index()?;

        tracing::info!("Rebuilt index with {} active records", self.index.len());
        Ok(self.index.len())
    }

    // =========================================================================
    // Backup / Restore / Export
    // =========================================================================

    /// Copy the data file to `dest` and the side-index to `dest` + `.idx`
    pub fn backup(&mut self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        self.ensure_open()?;
        self.persist_index()?;

        let index_path = self.index_path()?.to_path_buf();
        self.file.copy_to(dest)?;
        ByteStore::copy_file(&index_path, &self.sidecar(dest))?;

        tracing::info!("Backed up database to {}", dest.display());
        Ok(())
    }

    /// Restore from a backup made by [`RecordStore::backup`]
    ///
    /// The backup is copied into the working directory under its bare file
    /// name, with everything from the last `.` replaced by `_restored.db`
    /// (or `.db` appended when the name has no `.`), and opened. Any sidecar
    /// index is copied along but never trusted: the index is always rebuilt
    /// from a scan. Returns the restored data file path.
    pub fn restore_from_backup(&mut self, backup_path: impl AsRef<Path>) -> Result<PathBuf> {
        let backup_path = backup_path.as_ref();
        self.close()?;

        if !backup_path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("backup file does not exist: {}", backup_path.display()),
            )
            .into());
        }

        let restored = self.restored_path(backup_path);
        ByteStore::copy_file(backup_path, &restored)?;

        let backup_index = self.sidecar(backup_path);
        if backup_index.is_file() {
            if let Err(e) = ByteStore::copy_file(&backup_index, &self.sidecar(&restored)) {
                tracing::warn!("Backup index not copied ({}); the index will be rebuilt", e);
            }
        }

        self.open_database(&restored)?;
        let rebuilt = self.rebuild_index()?;

        tracing::info!(
            "Restored {} -> {} ({} active records)",
            backup_path.display(),
            restored.display(),
            rebuilt
        );
        Ok(restored)
    }

    /// Write every active record to `path` as CSV; returns the row count
    ///
    /// Names are wrapped in double quotes without escaping, so a name that
    /// contains a quote or comma produces a malformed row.
    pub fn export_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.ensure_open()?;

        let records = self.select(&Predicate::Any)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", CSV_HEADER)?;
        for (_, record) in &records {
            writeln!(
                writer,
                "{},\"{}\",{},{},{}",
                record.id,
                record.name(),
                record.active,
                record.average_grade,
                record.course
            )?;
        }
        writer.flush()?;

        tracing::info!("Exported {} records to {}", records.len(), path.display());
        Ok(records.len())
    }

    // =========================================================================
    // Command Execution
    // =========================================================================

    /// Run a collaborator command
    pub fn execute(&mut self, command: Command) -> Result<Payload> {
        tracing::trace!("Executing {}", command.name());

        match command {
            Command::Create { path } => self.create_database(path).map(|_| Payload::None),
            Command::Open { path } => self.open_database(path).map(|_| Payload::None),
            Command::Close => self.close().map(|_| Payload::None),
            Command::Remove { path } => self.remove_database(path).map(|_| Payload::None),
            Command::Clear => self.clear().map(|_| Payload::None),
            Command::Save => self.save().map(|_| Payload::None),
            Command::Add { record } => self.add_record(&record).map(Payload::Offset),
            Command::Search { field, value } => {
                self.search_by_field(field, &value).map(Payload::Records)
            }
            Command::Delete { field, value } => {
                self.delete_by_field(field, &value).map(Payload::Count)
            }
            Command::Edit { key, record } => {
                self.edit_record_by_key(key, &record).map(|_| Payload::None)
            }
            Command::GetAll => self.get_all().map(Payload::Records),
            Command::CheckIntegrity => self.integrity_report().map(Payload::Integrity),
            Command::Backup { path } => self.backup(path).map(|_| Payload::None),
            Command::Restore { path } => self.restore_from_backup(path).map(Payload::Path),
            Command::ExportCsv { path } => self.export_csv(path).map(Payload::Count),
        }
    }

    /// Run a command and fold any error into the response
    pub fn handle(&mut self, command: Command) -> Response {
        match self.execute(command) {
            Ok(payload) => Response::ok(payload),
            Err(e) => Response::from_error(&e),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Whether a database is open
    pub fn is_open(&self) -> bool {
        self.paths.is_some()
    }

    /// Path of the open data file
    pub fn path(&self) -> Option<&Path> {
        self.paths.as_ref().map(|p| p.data.as_path())
    }

    /// Number of indexed (active) ids
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Snapshot of the index, ordered by offset
    pub fn index_entries(&self) -> Vec<IndexEntry> {
        self.index.sorted_entries()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn ensure_open(&self) -> Result<()> {
        if self.paths.is_some() {
            Ok(())
        } else {
            Err(SlotError::NotOpen)
        }
    }

    fn index_path(&self) -> Result<&Path> {
        self.paths
            .as_ref()
            .map(|p| p.index.as_path())
            .ok_or(SlotError::NotOpen)
    }

    fn persist_index(&self) -> Result<()> {
        self.index
            .persist(self.index_path()?, self.config.sync_strategy)
    }

    fn read_slot(&mut self, offset: u64) -> Result<StoredRecord> {
        let bytes = self.file.read_at(offset, RECORD_SIZE)?;
        StoredRecord::decode(&bytes)
    }

    /// The one scan primitive: active slots matching `predicate`
    fn select(&mut self, predicate: &Predicate) -> Result<Vec<(u64, StoredRecord)>> {
        SlotScanner::new(&mut self.file)
            .active()
            .filter(|item| match item {
                Ok((_, record)) => predicate.matches(record),
                Err(_) => true,
            })
            .collect()
    }

    fn live_slot(record: &Record) -> StoredRecord {
        let mut stored = StoredRecord::from_record(record);
        stored.active = 1;
        stored
    }

    fn paths_for(&self, data: &Path) -> StorePaths {
        StorePaths {
            data: data.to_path_buf(),
            index: self.sidecar(data),
        }
    }

    /// `path` with the index extension appended to its full file name
    fn sidecar(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(&self.config.index_extension);
        PathBuf::from(name)
    }

    /// `stem_restored.db` for `dir/stem.ext`, `name.db` for `dir/name`
    ///
    /// Relative to the working directory. The split is on the last `.` of the
    /// bare file name, so `.bak` becomes `_restored.db`.
    fn restored_path(&self, backup: &Path) -> PathBuf {
        let name = backup
            .file_name()
            .unwrap_or(backup.as_os_str())
            .to_string_lossy();
        let restored = match name.rfind('.') {
            Some(dot) => format!("{}{}", &name[..dot], self.config.restored_suffix),
            None => format!("{}.db", name),
        };
        PathBuf::from(restored)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for RecordStore {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Error closing record store: {}", e);
        }
    }
}
