//! Indexed in-memory lookup tables.

mod index;
mod indexed;

pub use index::{IndexKind, SecondaryIndex};
pub use indexed::{IndexedTable, Row};
