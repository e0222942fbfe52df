//! Error types for SlotDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlotError
pub type Result<T> = std::result::Result<T, SlotError>;

/// Unified error type for SlotDB operations
#[derive(Debug, Error)]
pub enum SlotError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store State Errors
    // -------------------------------------------------------------------------
    #[error("Database is not open")]
    NotOpen,

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate key (id): {0}")]
    DuplicateKey(i32),

    #[error("Record not found: id {0}")]
    RecordNotFound(i32),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Cannot parse {value:?} as a value for field '{field}'")]
    Parse { field: &'static str, value: String },

    #[error("Unknown field '{0}' (expected one of: id, name, isActive, averageGrade, cours)")]
    UnknownField(String),

    // -------------------------------------------------------------------------
    // Consistency Errors
    // -------------------------------------------------------------------------
    #[error("Integrity mismatch: {indexed} indexed ids, {active} active records in file")]
    IntegrityMismatch { indexed: usize, active: usize },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
