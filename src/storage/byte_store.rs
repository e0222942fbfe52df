//! Byte Store
//!
//! Exclusive owner of one read-write file handle.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::Result;

/// Thin wrapper over a single random-access binary file
///
/// The sequential cursor is tracked here rather than in the OS file
/// position, so positional writes issued in the middle of a scan do not
/// disturb it.
pub struct ByteStore {
    /// Path of the currently (or last) opened file
    path: Option<PathBuf>,
    /// Open handle; `None` when closed
    file: Option<File>,
    /// Sequential read cursor for `read_next`
    cursor: u64,
    /// Whether writes are fsynced
    sync_strategy: SyncStrategy,
}

impl ByteStore {
    /// Create a closed byte store
    pub fn new(sync_strategy: SyncStrategy) -> Self {
        Self {
            path: None,
            file: None,
            cursor: 0,
            sync_strategy,
        }
    }

    /// Create (or destroy and recreate) an empty file and open it read-write
    pub fn create(&mut self, path: &Path) -> Result<()> {
        self.close()?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        self.install(path, file);
        Ok(())
    }

    /// Open an existing file read-write, creating an empty one if absent
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.close()?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        self.install(path, file);
        Ok(())
    }

    fn install(&mut self, path: &Path, file: File) {
        self.path = Some(path.to_path_buf());
        self.file = Some(file);
        self.cursor = 0;
    }

    /// Flush and release the handle. Safe to call when already closed.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        self.cursor = 0;
        Ok(())
    }

    /// Whether a handle is currently held
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the current (or last opened) file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current file length in bytes
    pub fn len(&mut self) -> Result<u64> {
        Ok(self.handle()?.metadata()?.len())
    }

    /// Discard all contents, leaving an empty open file
    pub fn truncate(&mut self) -> Result<()> {
        let file = self.handle()?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        self.cursor = 0;
        self.sync()
    }

    /// Write `bytes` at end-of-file and return the offset the write began at
    ///
    /// On failure the file is cut back to its previous length, so no partial
    /// write survives to shift the offsets of later appends.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        let file = self.handle()?;
        let offset = file.seek(SeekFrom::End(0))?;

        if let Err(e) = file.write_all(bytes).and_then(|_| file.flush()) {
            if let Err(rollback) = file.set_len(offset) {
                tracing::warn!("Failed to roll back partial append at {}: {}", offset, rollback);
            }
            return Err(e.into());
        }

        self.sync()?;
        tracing::trace!("Appended {} bytes at offset {}", bytes.len(), offset);
        Ok(offset)
    }

    /// Overwrite exactly `bytes.len()` bytes beginning at `offset`
    ///
    /// Writing past end-of-file extends the file and zero-fills the gap.
    pub fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        let file = self.handle()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(bytes)?;
        file.flush()?;
        self.sync()
    }

    /// Read exactly `size` bytes at `offset`
    pub fn read_at(&mut self, offset: u64, size: usize) -> Result<Vec<u8>> {
        let file = self.handle()?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; size];
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reset the sequential cursor to offset 0
    pub fn seek_to_begin(&mut self) {
        self.cursor = 0;
    }

    /// Read the next `size` bytes from the sequential cursor
    ///
    /// Returns `Ok(None)` when fewer than `size` bytes remain; trailing
    /// partial data is end-of-stream, never a short buffer.
    pub fn read_next(&mut self, size: usize) -> Result<Option<Vec<u8>>> {
        let cursor = self.cursor;
        let end = self.len()?;
        let file = self.handle()?;

        if end.saturating_sub(cursor) < size as u64 {
            return Ok(None);
        }

        file.seek(SeekFrom::Start(cursor))?;
        let mut buf = vec![0u8; size];
        file.read_exact(&mut buf)?;

        self.cursor = cursor + size as u64;
        Ok(Some(buf))
    }

    /// Copy the current file to `dest`, overwriting it
    pub fn copy_to(&mut self, dest: &Path) -> Result<u64> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
            file.sync_data()?;
        }
        let src = self.path.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "byte store has no file to copy")
        })?;
        Self::copy_file(&src, dest)
    }

    /// Byte-identical copy of `src` to `dest`, overwriting `dest`
    ///
    /// A partially written destination is removed before the error is
    /// returned. Copying a file onto itself fails with `InvalidInput` and
    /// leaves it untouched.
    pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
        if Self::same_file(src, dest) {
            tracing::warn!("Refusing to copy {} onto itself", src.display());
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("source and destination are the same file: {}", dest.display()),
            )
            .into());
        }

        match fs::copy(src, dest) {
            Ok(copied) => {
                tracing::debug!("Copied {} bytes: {} -> {}", copied, src.display(), dest.display());
                Ok(copied)
            }
            Err(e) => {
                // A missing source never touched dest.
                if src.exists() {
                    let _ = fs::remove_file(dest);
                }
                tracing::warn!("Copy {} -> {} failed: {}", src.display(), dest.display(), e);
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn handle(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "byte store is not open").into()
        })
    }

    /// Whether both paths resolve to the same existing file
    fn same_file(a: &Path, b: &Path) -> bool {
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn sync(&mut self) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.handle()?.sync_data()?;
        }
        Ok(())
    }
}

impl Drop for ByteStore {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Error closing byte store: {}", e);
        }
    }
}
