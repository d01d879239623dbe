//! Input parsing and data source handling.

mod format;
mod loader;
mod source;

pub use format::LineFormat;
pub use loader::TableLoader;
pub use source::{Compression, Lines, Source};
