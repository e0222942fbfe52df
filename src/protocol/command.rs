//! Command definitions
//!
//! Represents requests from a collaborator.

use std::path::PathBuf;

use crate::record::{Field, Record};

/// A parsed command
#[derive(Debug, Clone)]
pub enum Command {
    /// Create a fresh database and open it
    Create { path: PathBuf },

    /// Open (or create) a database
    Open { path: PathBuf },

    /// Close the open database
    Close,

    /// Close and delete a database and its side-index
    Remove { path: PathBuf },

    /// Drop every record
    Clear,

    /// Persist the index
    Save,

    /// Append a record
    Add { record: Record },

    /// Find active records by field value
    Search { field: Field, value: String },

    /// Tombstone active records by field value
    Delete { field: Field, value: String },

    /// Rewrite the record indexed under `key`
    Edit { key: i32, record: Record },

    /// List every active record
    GetAll,

    /// Compare active-slot and index counts
    CheckIntegrity,

    /// Copy data and index files to `path`
    Backup { path: PathBuf },

    /// Restore from a backup and rebuild the index
    Restore { path: PathBuf },

    /// Write active records as CSV
    ExportCsv { path: PathBuf },
}

impl Command {
    /// Short command name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Open { .. } => "open",
            Command::Close => "close",
            Command::Remove { .. } => "remove",
            Command::Clear => "clear",
            Command::Save => "save",
            Command::Add { .. } => "add",
            Command::Search { .. } => "search",
            Command::Delete { .. } => "delete",
            Command::Edit { .. } => "edit",
            Command::GetAll => "list",
            Command::CheckIntegrity => "check",
            Command::Backup { .. } => "backup",
            Command::Restore { .. } => "restore",
            Command::ExportCsv { .. } => "export",
        }
    }
}
