//! Vocab: controlled-vocabulary validation for string fields.
//!
//! A vocabulary is a delimited text file (optionally gzipped) with a header
//! line. Each validator names the columns whose values are accepted and the
//! columns whose values only earn a suggestion, then answers one question per
//! string: accept, suggest a correction, or reject.
//!
//! # Core Pieces
//!
//! - [`LineFormat`]: per-column delimiters and multi-valued sub-delimiters
//! - [`IndexedTable`]: rows keyed by a primary column with lazy secondary indices
//! - [`EnumLookupValidator`]: in-memory or streaming lookups against one dataset
//! - [`FormatRegistry`]: validators keyed by format name, built from JSON config
//!
//! # Example
//!
//! ```no_run
//! use vocab::ValidatorSetConfig;
//!
//! let config = ValidatorSetConfig::from_path("formats.json")?;
//! let registry = config.build_registry()?;
//!
//! match registry.validate("animal_subject", "cat")? {
//!     None => println!("ok"),
//!     Some(message) => println!("{}", message),
//! }
//! # Ok::<(), vocab::VocabError>(())
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod registry;
pub mod table;
pub mod validation;

pub use config::{FormatConfig, RulesConfig, ValidatorConfig, ValidatorSetConfig};
pub use error::{Result, VocabError};
pub use input::{Compression, LineFormat, Source, TableLoader};
pub use registry::FormatRegistry;
pub use table::{IndexedTable, Row};
pub use validation::{EnumLookupValidator, FormatValidator, MatchRules, Verdict};
