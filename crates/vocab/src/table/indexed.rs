//! In-memory table keyed by a primary column with lazy secondary indices.

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{Result, VocabError};

use super::index::{IndexKind, SecondaryIndex};

/// One row: a cell per column, in column order. `None` is an absent value.
pub type Row = Vec<Option<String>>;

/// A table of string cells addressed by primary key.
///
/// Rows are stored in insertion order. Every column gets an index slot that
/// is filled the first time the column is used for a secondary lookup (or by
/// [`create_index`](Self::create_index)); once filled, later
/// [`add_row`](Self::add_row) calls keep it up to date.
#[derive(Debug, Clone)]
pub struct IndexedTable {
    /// Column name → position.
    columns: IndexMap<String, usize>,
    /// Position of the primary column.
    primary: usize,
    /// Primary key → row.
    rows: IndexMap<String, Row>,
    /// Per-column multi-value separator.
    sub_delimiters: Vec<Option<String>>,
    /// Per-column secondary index slot.
    indices: Vec<OnceCell<SecondaryIndex>>,
}

impl IndexedTable {
    /// Create an empty table with the given columns.
    pub fn new<I, S>(columns: I, primary_column: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positions = IndexMap::new();
        for (position, name) in columns.into_iter().map(Into::into).enumerate() {
            if positions.contains_key(&name) {
                return Err(VocabError::DuplicateColumn(name));
            }
            positions.insert(name, position);
        }
        if positions.is_empty() {
            return Err(VocabError::Config(
                "a table must have at least one column".to_string(),
            ));
        }
        let primary = *positions.get(primary_column).ok_or_else(|| {
            VocabError::Config(format!(
                "primary column '{}' is not one of the table columns",
                primary_column
            ))
        })?;

        let width = positions.len();
        Ok(Self {
            columns: positions,
            primary,
            rows: IndexMap::new(),
            sub_delimiters: vec![None; width],
            indices: (0..width).map(|_| OnceCell::new()).collect(),
        })
    }

    /// Set per-column sub-delimiters, in column order.
    ///
    /// Columns with a sub-delimiter get multi-valued indices. Any index built
    /// so far is discarded.
    pub fn with_sub_delimiters(mut self, sub_delimiters: Vec<Option<String>>) -> Result<Self> {
        if sub_delimiters.len() != self.columns.len() {
            return Err(VocabError::Config(format!(
                "expected {} sub-delimiters, got {}",
                self.columns.len(),
                sub_delimiters.len()
            )));
        }
        if let Some(position) = sub_delimiters.iter().position(|s| s.as_deref() == Some("")) {
            return Err(VocabError::Config(format!(
                "sub-delimiter for column {} cannot be empty",
                position
            )));
        }
        self.sub_delimiters = sub_delimiters;
        for slot in &mut self.indices {
            slot.take();
        }
        Ok(self)
    }

    /// Append a row.
    ///
    /// Fails if the arity does not match the column count, the primary cell
    /// is absent, or the primary key already exists. On failure the table is
    /// unchanged.
    pub fn add_row(&mut self, cells: Row) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(VocabError::Config(format!(
                "row has {} cells but the table has {} columns",
                cells.len(),
                self.columns.len()
            )));
        }
        let key = match &cells[self.primary] {
            Some(key) => key.clone(),
            None => return Err(VocabError::MissingPrimaryKey(self.primary_column().to_string())),
        };
        if self.rows.contains_key(&key) {
            return Err(VocabError::DuplicateKey(key));
        }

        for (position, cell) in cells.iter().enumerate() {
            if let (Some(cell), Some(index)) = (cell, self.indices[position].get_mut()) {
                index.insert(cell, &key);
            }
        }
        self.rows.insert(key, cells);
        Ok(())
    }

    /// Cell of `column` in the row with `primary_key`.
    ///
    /// Fails with [`VocabError::KeyNotFound`] if the column or key is unknown.
    /// The primary column yields the key itself.
    pub fn get(&self, column: &str, primary_key: &str) -> Result<Option<&str>> {
        let position = self.position(column)?;
        let (key, row) = self
            .rows
            .get_key_value(primary_key)
            .ok_or_else(|| VocabError::KeyNotFound(format!("row '{}'", primary_key)))?;
        if position == self.primary {
            return Ok(Some(key.as_str()));
        }
        Ok(row[position].as_deref())
    }

    /// Cell at a column position and row position (insertion order).
    pub fn get_at(&self, column_index: usize, row_index: usize) -> Result<Option<&str>> {
        let (_, row) = self
            .rows
            .get_index(row_index)
            .ok_or_else(|| VocabError::KeyNotFound(format!("row index {}", row_index)))?;
        row.get(column_index)
            .map(Option::as_deref)
            .ok_or_else(|| VocabError::KeyNotFound(format!("column index {}", column_index)))
    }

    /// Cells of `column` for each of `primary_keys`.
    pub fn get_many<S: AsRef<str>>(&self, column: &str, primary_keys: &[S]) -> Result<Vec<Option<&str>>> {
        primary_keys
            .iter()
            .map(|key| self.get(column, key.as_ref()))
            .collect()
    }

    /// Cells of `column` for every row whose `secondary_column` holds
    /// `secondary_value`.
    ///
    /// Builds the index of `secondary_column` on first use.
    pub fn get_by_secondary(
        &self,
        column: &str,
        secondary_value: &str,
        secondary_column: &str,
    ) -> Result<Vec<Option<&str>>> {
        self.position(column)?;
        let secondary = self.position(secondary_column)?;
        let keys = self.index_at(secondary).get(secondary_value).ok_or_else(|| {
            VocabError::KeyNotFound(format!(
                "'{}' in column '{}'",
                secondary_value, secondary_column
            ))
        })?;
        self.get_many(column, keys)
    }

    /// Primary keys of rows whose `column` holds `value`.
    ///
    /// Returns `None` both for an unknown column and for a value that does
    /// not occur. Builds the column's index on first use.
    pub fn primary_keys_for(&self, value: &str, column: &str) -> Option<&[String]> {
        let position = self.columns.get(column).copied()?;
        self.index_at(position).get(value)
    }

    /// Build the secondary index for `column` if it does not exist yet.
    pub fn create_index(&self, column: &str) -> Result<()> {
        let position = self.position(column)?;
        self.index_at(position);
        Ok(())
    }

    /// Whether the index for `column` has been built.
    pub fn is_indexed(&self, column: &str) -> bool {
        self.columns
            .get(column)
            .map(|&p| self.indices[p].get().is_some())
            .unwrap_or(false)
    }

    /// Whether `key` is a primary key.
    pub fn is_row_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Whether `value` is a key of the already-built index of `column`.
    ///
    /// Never builds an index; returns false for unindexed columns.
    pub fn is_secondary_row_key(&self, value: &str, column: &str) -> bool {
        self.columns
            .get(column)
            .and_then(|&p| self.indices[p].get())
            .map(|index| index.contains(value))
            .unwrap_or(false)
    }

    /// Whether `column` is a column of this table.
    pub fn is_column_key(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Sub-delimiter of a column, if it is multi-valued.
    pub fn sub_delimiter(&self, column: &str) -> Option<&str> {
        let position = *self.columns.get(column)?;
        self.sub_delimiters[position].as_deref()
    }

    /// Name of the primary column.
    pub fn primary_column(&self) -> &str {
        self.columns
            .get_index(self.primary)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Primary keys in insertion order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// (row count, column count).
    pub fn size(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, column: &str) -> Result<usize> {
        self.columns
            .get(column)
            .copied()
            .ok_or_else(|| VocabError::KeyNotFound(format!("column '{}'", column)))
    }

    fn index_at(&self, position: usize) -> &SecondaryIndex {
        self.indices[position].get_or_init(|| self.build_index(position))
    }

    fn build_index(&self, position: usize) -> SecondaryIndex {
        let kind = IndexKind::from_sub_delimiter(self.sub_delimiters[position].as_deref());
        let mut index = SecondaryIndex::new(kind);
        for (key, row) in &self.rows {
            if let Some(cell) = &row[position] {
                index.insert(cell, key);
            }
        }
        debug!(
            column = position,
            keys = index.len(),
            rows = self.rows.len(),
            "Built secondary index"
        );
        index
    }
}
