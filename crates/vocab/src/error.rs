//! Error types for the vocab library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vocab operations.
#[derive(Debug, Error)]
pub enum VocabError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing or malformed construction parameters.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A line does not match the declared delimiter shape.
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// A lookup against a known table found no match.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// A column name was declared twice.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A primary key was inserted twice.
    #[error("Duplicate primary key: {0}")]
    DuplicateKey(String),

    /// A row was inserted without a value in the primary column.
    #[error("Missing primary key in column '{0}'")]
    MissingPrimaryKey(String),

    /// Two validators were registered under the same format name.
    #[error("Duplicate format: {0}")]
    DuplicateFormat(String),

    /// No validator is registered under the requested format name.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VocabError {
    /// Build a format error for the given 1-based line number.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        VocabError::Format {
            line,
            message: message.into(),
        }
    }

    /// Whether this is the expected "not found" outcome of a lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VocabError::KeyNotFound(_))
    }
}

/// Result type alias for vocab operations.
pub type Result<T> = std::result::Result<T, VocabError>;
