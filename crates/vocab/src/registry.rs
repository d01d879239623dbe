//! Format validators keyed by format name.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Result, VocabError};
use crate::validation::FormatValidator;

/// The set of custom formats handed to a schema engine.
#[derive(Default)]
pub struct FormatRegistry {
    validators: IndexMap<String, Box<dyn FormatValidator>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator under its own format name.
    pub fn register(&mut self, validator: Box<dyn FormatValidator>) -> Result<()> {
        let name = validator.format_name().to_string();
        if self.validators.contains_key(&name) {
            return Err(VocabError::DuplicateFormat(name));
        }
        self.validators.insert(name, validator);
        Ok(())
    }

    /// The validator for `format`, if registered.
    pub fn get(&self, format: &str) -> Option<&dyn FormatValidator> {
        self.validators.get(format).map(|v| v.as_ref())
    }

    /// Validate `value` with the validator for `format`.
    pub fn validate(&self, format: &str, value: &str) -> Result<Option<String>> {
        self.get(format)
            .ok_or_else(|| VocabError::UnknownFormat(format.to_string()))?
            .validate(value)
    }

    /// Registered format names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Iterate over the registered validators.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FormatValidator> {
        self.validators.values().map(|v| v.as_ref())
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether no formats are registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
