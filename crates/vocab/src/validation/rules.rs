//! Which columns are accepted and which only produce suggestions.

use std::collections::HashSet;

use crate::error::{Result, VocabError};

/// The `correct` / `suggestions` column lists of a validator.
///
/// Values found in a `correct` column are accepted. Values found in a
/// `suggestions` column are rejected with a hint naming the `correct` values
/// of the same row. A column can appear at most once across both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRules {
    correct: Vec<String>,
    suggestions: Vec<String>,
    seen: HashSet<String>,
}

impl MatchRules {
    /// Create empty rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column whose values are accepted.
    pub fn add_correct(mut self, column: impl Into<String>) -> Result<Self> {
        let column = self.claim(column.into())?;
        self.correct.push(column);
        Ok(self)
    }

    /// Add a column whose values produce a suggestion.
    pub fn add_suggested(mut self, column: impl Into<String>) -> Result<Self> {
        let column = self.claim(column.into())?;
        self.suggestions.push(column);
        Ok(self)
    }

    /// Add several accepted columns, in order.
    pub fn add_correct_columns<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        columns.into_iter().try_fold(self, |rules, c| rules.add_correct(c))
    }

    /// Add several suggestion columns, in order.
    pub fn add_suggested_columns<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        columns.into_iter().try_fold(self, |rules, c| rules.add_suggested(c))
    }

    fn claim(&mut self, column: String) -> Result<String> {
        if !self.seen.insert(column.clone()) {
            return Err(VocabError::DuplicateColumn(column));
        }
        Ok(column)
    }

    /// Accepted columns, in declared order.
    pub fn correct(&self) -> &[String] {
        &self.correct
    }

    /// Suggestion columns, in declared order.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Whether `column` is named in either list.
    pub fn contains(&self, column: &str) -> bool {
        self.seen.contains(column)
    }

    /// All referenced columns: correct first, then suggestions.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.correct
            .iter()
            .chain(self.suggestions.iter())
            .map(String::as_str)
    }

    /// Fail unless at least one correct column is declared.
    pub fn ensure_correct(&self) -> Result<()> {
        if self.correct.is_empty() {
            return Err(VocabError::Config(
                "at least one correct column is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail if a referenced column does not satisfy `exists`.
    pub fn ensure_columns_exist(&self, exists: impl Fn(&str) -> bool) -> Result<()> {
        match self.columns().find(|c| !exists(c)) {
            Some(missing) => Err(VocabError::Config(format!(
                "column '{}' does not exist in the dataset",
                missing
            ))),
            None => Ok(()),
        }
    }

    /// Primary column and columns to index when materializing a table.
    pub fn index_plan(&self) -> Result<(&str, Vec<&str>)> {
        self.ensure_correct()?;
        let mut columns = self.columns();
        let primary = columns.next().unwrap_or_default();
        Ok((primary, columns.collect()))
    }
}
