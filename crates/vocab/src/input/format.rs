//! Line format: splitting delimited text into column cells.
//!
//! A [`LineFormat`] is an ordered list of N-1 delimiters for N columns. Each
//! delimiter is located by its first occurrence in the text remaining after
//! the previous one, so different columns may use different separators
//! (`"a$b#c*d"` splits on `["$", "#", "*"]`). The last column takes the rest
//! of the line verbatim.
//!
//! Individual columns may be declared multi-valued with a sub-delimiter, in
//! which case a cell like `"cat, house cat"` holds several logical values.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{Result, VocabError};

/// Describes how one line of delimited text maps onto columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    /// Column delimiters, in order. Length is column count - 1.
    delimiters: Vec<String>,
    /// Per-column multi-value separator. Length is column count.
    sub_delimiters: Vec<Option<String>>,
}

impl LineFormat {
    /// Create a format from the ordered column delimiters.
    pub fn new<I, S>(delimiters: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let delimiters: Vec<String> = delimiters.into_iter().map(Into::into).collect();
        if delimiters.is_empty() {
            return Err(VocabError::Config(
                "a line format needs at least one delimiter".to_string(),
            ));
        }
        if delimiters.iter().any(|d| d.is_empty()) {
            return Err(VocabError::Config(
                "column delimiters cannot be empty".to_string(),
            ));
        }
        let sub_delimiters = vec![None; delimiters.len() + 1];
        Ok(Self {
            delimiters,
            sub_delimiters,
        })
    }

    /// Declare the column at `index` multi-valued, split on `sub_delimiter`.
    pub fn with_sub_delimiter(mut self, index: usize, sub_delimiter: impl Into<String>) -> Result<Self> {
        let sub_delimiter = sub_delimiter.into();
        if index >= self.column_count() {
            return Err(VocabError::Config(format!(
                "column index {} is out of range for a format with {} columns",
                index,
                self.column_count()
            )));
        }
        if sub_delimiter.is_empty() {
            return Err(VocabError::Config(format!(
                "sub-delimiter for column {} cannot be empty",
                index
            )));
        }
        self.sub_delimiters[index] = Some(sub_delimiter);
        Ok(self)
    }

    /// Number of columns a line splits into.
    pub fn column_count(&self) -> usize {
        self.delimiters.len() + 1
    }

    /// The column delimiters.
    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    /// Sub-delimiter of a column, if it is multi-valued.
    pub fn sub_delimiter(&self, index: usize) -> Option<&str> {
        self.sub_delimiters.get(index).and_then(|s| s.as_deref())
    }

    /// All per-column sub-delimiters, in column order.
    pub fn sub_delimiters(&self) -> &[Option<String>] {
        &self.sub_delimiters
    }

    /// Whether the column at `index` holds delimited lists.
    pub fn is_multi_valued(&self, index: usize) -> bool {
        self.sub_delimiter(index).is_some()
    }

    /// Split a line into cells. Empty substrings become `None`.
    ///
    /// Fails with [`VocabError::Format`] when a delimiter cannot be found in
    /// the remaining text.
    pub fn split_line(&self, line: &str) -> Result<Vec<Option<String>>> {
        self.split_numbered(line, 1)
    }

    /// Like [`split_line`](Self::split_line), propagating end of input.
    pub fn split_line_opt(&self, line: Option<&str>) -> Result<Option<Vec<Option<String>>>> {
        line.map(|l| self.split_line(l)).transpose()
    }

    /// Split a line, reporting `line_number` on failure.
    pub(crate) fn split_numbered(&self, line: &str, line_number: usize) -> Result<Vec<Option<String>>> {
        let mut cells = Vec::with_capacity(self.column_count());
        let mut rest = line;

        for (column, delimiter) in self.delimiters.iter().enumerate() {
            let location = rest.find(delimiter.as_str()).ok_or_else(|| {
                VocabError::format(
                    line_number,
                    format!(
                        "delimiter {:?} after column {} not found",
                        delimiter, column
                    ),
                )
            })?;
            cells.push(non_empty(&rest[..location]));
            rest = &rest[location + delimiter.len()..];
        }
        cells.push(non_empty(rest));

        Ok(cells)
    }

    /// Split a multi-valued cell into its set of values.
    ///
    /// Returns `None` if the column has no sub-delimiter, which is distinct
    /// from an empty set.
    pub fn split_entry(&self, cell: &str, index: usize) -> Option<HashSet<String>> {
        let sub = self.sub_delimiter(index)?;
        Some(
            cell.split(sub)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Whether `cell` in column `index` matches `subject`.
    ///
    /// A cell matches on whole-string equality, or for multi-valued columns
    /// when `subject` is one of its values.
    pub fn cell_matches(&self, cell: &str, index: usize, subject: &str) -> bool {
        if cell == subject {
            return true;
        }
        match self.sub_delimiter(index) {
            Some(sub) => cell.split(sub).any(|part| !part.is_empty() && part == subject),
            None => false,
        }
    }

    /// Map each column name in a header line to its position.
    pub fn column_name_to_index(&self, header: &str) -> Result<IndexMap<String, usize>> {
        let mut positions = IndexMap::with_capacity(self.column_count());
        for (index, name) in self.split_numbered(header, 1)?.into_iter().enumerate() {
            let name = name.ok_or_else(|| {
                VocabError::format(1, format!("header has no name for column {}", index))
            })?;
            if positions.insert(name.clone(), index).is_some() {
                return Err(VocabError::format(
                    1,
                    format!("header repeats column name '{}'", name),
                ));
            }
        }
        Ok(positions)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
