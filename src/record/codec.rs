//! Record codec
//!
//! Explicit field-by-field encoding of the 67-byte slot.

use bytes::{Buf, BufMut};

use crate::error::{Result, SlotError};

/// Width of one stored record
pub const RECORD_SIZE: usize = 4 + NAME_FIELD_SIZE + 1 + 8 + 4;

/// Size of the fixed name buffer, terminator included
const NAME_FIELD_SIZE: usize = 50;

/// Longest name (in bytes) a slot can hold before the terminator
pub const NAME_CAPACITY: usize = NAME_FIELD_SIZE - 1;

/// Byte offset of the active flag inside a slot
pub const ACTIVE_FLAG_OFFSET: usize = 4 + NAME_FIELD_SIZE;

// =============================================================================
// Logical Record
// =============================================================================

/// A student record as seen by callers
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Primary key while the record is active
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub average_grade: f64,
    pub course: i32,
}

impl Record {
    pub fn new(id: i32, name: impl Into<String>, average_grade: f64, course: i32) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: true,
            average_grade,
            course,
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            is_active: true,
            average_grade: 0.0,
            course: 1,
        }
    }
}

// =============================================================================
// Stored Record
// =============================================================================

/// The on-disk form of a record
///
/// The name buffer is kept raw so bytes past the terminator survive a
/// decode/encode cycle unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i32,
    pub name: [u8; NAME_FIELD_SIZE],
    pub active: u8,
    pub average_grade: f64,
    pub course: i32,
}

impl StoredRecord {
    /// Build the stored form of `record`
    ///
    /// Names longer than [`NAME_CAPACITY`] bytes are cut at the last UTF-8
    /// character boundary that fits.
    pub fn from_record(record: &Record) -> Self {
        let mut name = [0u8; NAME_FIELD_SIZE];
        let bytes = record.name.as_bytes();

        let mut len = bytes.len().min(NAME_CAPACITY);
        while !record.name.is_char_boundary(len) {
            len -= 1;
        }
        if len < bytes.len() {
            tracing::debug!(
                "Name of record {} truncated from {} to {} bytes",
                record.id,
                bytes.len(),
                len
            );
        }
        name[..len].copy_from_slice(&bytes[..len]);

        Self {
            id: record.id,
            name,
            active: u8::from(record.is_active),
            average_grade: record.average_grade,
            course: record.course,
        }
    }

    /// Whether the slot is live (not tombstoned)
    pub fn is_active(&self) -> bool {
        self.active != 0
    }

    /// Name bytes up to (not including) the terminator
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_SIZE);
        &self.name[..end]
    }

    /// Name as text; invalid UTF-8 is replaced rather than rejected
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    /// Convert back to the caller-facing form
    pub fn to_record(&self) -> Record {
        Record {
            id: self.id,
            name: self.name(),
            is_active: self.is_active(),
            average_grade: self.average_grade,
            course: self.course,
        }
    }

    /// Encode to exactly [`RECORD_SIZE`] bytes
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        let mut buf = &mut out[..];
        buf.put_i32_le(self.id);
        buf.put_slice(&self.name);
        buf.put_u8(self.active);
        buf.put_f64_le(self.average_grade);
        buf.put_i32_le(self.course);
        out
    }

    /// Decode one slot; `bytes` must be exactly [`RECORD_SIZE`] long
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECORD_SIZE {
            return Err(SlotError::Serialization(format!(
                "record slot must be {} bytes, got {}",
                RECORD_SIZE,
                bytes.len()
            )));
        }

        let mut buf = bytes;
        let id = buf.get_i32_le();
        let mut name = [0u8; NAME_FIELD_SIZE];
        buf.copy_to_slice(&mut name);
        let active = buf.get_u8();
        let average_grade = buf.get_f64_le();
        let course = buf.get_i32_le();

        Ok(Self {
            id,
            name,
            active,
            average_grade,
            course,
        })
    }

    /// Copy of this record with the active byte cleared
    pub fn tombstoned(&self) -> Self {
        Self {
            active: 0,
            ..self.clone()
        }
    }
}
