//! Record Module
//!
//! The fixed-width record format and the predicates evaluated against it.
//!
//! ## Slot Layout (67 bytes, little-endian, no padding)
//! ```text
//! ┌─────────┬──────────────────┬──────────┬──────────────┬────────────┐
//! │ id (4)  │    name (50)     │active (1)│ avgGrade (8) │ course (4) │
//! │  i32    │ NUL-terminated   │  0 / 1   │   f64 IEEE   │    i32     │
//! └─────────┴──────────────────┴──────────┴──────────────┴────────────┘
//!  0         4                  54         55             63         67
//! ```
//!
//! Slots sit back to back from offset 0 with no file header. A slot is
//! never moved once appended; deleting only clears its active byte.

mod codec;
mod field;
mod scanner;

pub use codec::{Record, StoredRecord, ACTIVE_FLAG_OFFSET, NAME_CAPACITY, RECORD_SIZE};
pub use field::{Field, Predicate};
pub use scanner::SlotScanner;
