//! # SlotDB
//!
//! A single-file record store with:
//! - Fixed-width 67-byte records appended to a flat binary file
//! - A side-index from primary key to byte offset for O(1) point lookups
//! - Tombstone deletes and in-place edits that never move a slot
//! - Backup, and restore with an unconditional index rebuild
//! - CSV export and a coarse integrity check
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Collaborator (CLI / GUI / tests)             │
//! │            field name + raw text value  →  Command          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       RecordStore                           │
//! │      parsing · predicates · index protocol · backups        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  ByteStore  │          │ OffsetIndex │
//!   │ (data file) │          │  (.idx file)│
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use slotdb::{Field, Record, RecordStore};
//!
//! # fn main() -> slotdb::Result<()> {
//! let mut store = RecordStore::default();
//! store.create_database("students.db")?;
//! store.add_record(&Record::new(1, "Ann", 4.5, 2))?;
//! let hits = store.search_by_field(Field::Course, "2")?;
//! assert_eq!(hits.len(), 1);
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod record;
pub mod index;
pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SlotError, Result};
pub use config::{Config, SyncStrategy};
pub use record::{Field, Record};
pub use store::{IntegrityReport, RecordStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SlotDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
