//! Index Module
//!
//! Primary-key index from record id to slot offset, and its side-index file.
//!
//! ## Responsibilities
//! - O(1) id -> offset lookups for point reads, deletes and edits
//! - Duplicate-key detection on add and id-changing edits
//! - Whole-file persistence after every successful mutation
//!
//! ## Side-Index File Format
//! ```text
//! ┌──────────┬─────────────┬──────────┬─────────────┬─────
//! │ id (4)   │ offset (8)  │ id (4)   │ offset (8)  │ ...
//! │ i32 LE   │ i64 LE      │ i32 LE   │ i64 LE      │
//! └──────────┴─────────────┴──────────┴─────────────┴─────
//! ```
//! No header and no count. A short trailing pair is dropped on load.

mod offset_index;

pub use offset_index::{IndexEntry, OffsetIndex};
