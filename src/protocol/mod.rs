//! Protocol Module
//!
//! The contract between the store and whatever presentation layer drives it.
//!
//! A collaborator (the bundled CLI, a GUI, a test harness) builds a
//! [`Command`] from a field name in the fixed set
//! `{id, name, isActive, averageGrade, cours}` plus a raw text value, hands
//! it to [`crate::RecordStore::handle`], and renders the [`Response`].
//! All value parsing and predicate evaluation stays inside the store.
//!
//! ### Response Shapes
//! - `Ok` + `Records`   : search / list results, file order
//! - `Ok` + `Count`     : rows deleted or exported
//! - `Ok` + `Offset`    : slot offset of an added record
//! - `Rejected` + text  : request refused before any write (duplicate key,
//!                        missing record, bad value, closed store)
//! - `Error` + text     : I/O or serialization failure

mod command;
mod response;

pub use command::Command;
pub use response::{Payload, Response, Status};
