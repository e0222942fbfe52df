//! Response definitions
//!
//! Represents responses to a collaborator.

use std::path::PathBuf;

use crate::error::SlotError;
use crate::record::Record;
use crate::store::IntegrityReport;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Refused before touching any file
    Rejected,
    Error,
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Offset(u64),
    Records(Vec<Record>),
    Count(usize),
    Integrity(IntegrityReport),
    Path(PathBuf),
}

/// A response to render
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Result for `Ok`, `Payload::None` otherwise
    pub payload: Payload,

    /// Human-readable error text for `Rejected` and `Error`
    pub message: Option<String>,
}

impl Response {
    /// Create an OK response
    pub fn ok(payload: Payload) -> Self {
        Self {
            status: Status::Ok,
            payload,
            message: None,
        }
    }

    /// Create a REJECTED response
    pub fn rejected(message: &str) -> Self {
        Self {
            status: Status::Rejected,
            payload: Payload::None,
            message: Some(message.to_string()),
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Payload::None,
            message: Some(message.to_string()),
        }
    }

    /// Map a store error onto a response
    pub fn from_error(err: &SlotError) -> Self {
        match err {
            SlotError::NotOpen
            | SlotError::DuplicateKey(_)
            | SlotError::RecordNotFound(_)
            | SlotError::Parse { .. }
            | SlotError::UnknownField(_)
            | SlotError::IntegrityMismatch { .. } => Self::rejected(&err.to_string()),
            SlotError::Io(_) | SlotError::Serialization(_) | SlotError::Config(_) => {
                Self::error(&err.to_string())
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
