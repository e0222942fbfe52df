//! Storage Module
//!
//! Raw byte-level access to a single random-access file.
//!
//! ## Responsibilities
//! - Create/open/close/truncate the data file
//! - Append at end-of-file, returning the write offset
//! - Positional reads and overwrites
//! - A sequential read cursor that never yields a short buffer
//! - Whole-file copies that never leave a truncated destination behind
//!
//! The byte store holds no domain knowledge; record layout lives in
//! [`crate::record`].
//!
//! ## Cursor Model
//! ```text
//!   offset 0                                    end-of-file
//!   ├──────────┬──────────┬──────────┬──────────┬───┤
//!   │  slot 0  │  slot 1  │  slot 2  │  slot 3  │...│  <- trailing partial
//!   └──────────┴──────────┴──────────┴──────────┴───┘     bytes = end of stream
//!        ▲                       ▲
//!     read_at/write_at        read_next cursor (independent of writes)
//! ```

mod byte_store;

pub use byte_store::ByteStore;
