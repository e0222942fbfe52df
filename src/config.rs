//! Configuration for SlotDB
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, SlotError};

/// Main configuration for a SlotDB store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// How hard data-file writes and index persists push bytes to disk
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // File Naming Configuration
    // -------------------------------------------------------------------------
    /// Suffix appended to the data file path to name its side-index.
    /// Layout on disk:
    ///   students.db       (fixed-width records)
    ///   students.db.idx   (id -> offset pairs)
    pub index_extension: String,

    /// Replaces the backup file's extension to name the restored data file
    /// (`backup.db` -> `backup_restored.db`)
    pub restored_suffix: String,
}

/// Sync strategy for file writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every write and every index persist (safest, slowest)
    EveryWrite,

    /// Hand writes to the OS and let it schedule the flush
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_strategy: SyncStrategy::OsBuffered,
            index_extension: ".idx".to_string(),
            restored_suffix: "_restored.db".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the side-index suffix (default `.idx`)
    pub fn index_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.index_extension = ext.into();
        self
    }

    /// Set the restore target suffix (default `_restored.db`)
    pub fn restored_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.restored_suffix = suffix.into();
        self
    }

    pub fn build(self) -> Result<Config> {
        if self.config.index_extension.is_empty() {
            return Err(SlotError::Config(
                "index extension must not be empty".to_string(),
            ));
        }
        if self.config.restored_suffix.is_empty() {
            return Err(SlotError::Config(
                "restored suffix must not be empty".to_string(),
            ));
        }
        Ok(self.config)
    }
}
