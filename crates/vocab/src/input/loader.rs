//! Materializing a dataset file into an [`IndexedTable`].

use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Result, VocabError};
use crate::table::IndexedTable;
use crate::validation::MatchRules;

use super::format::LineFormat;
use super::source::{Lines, Source};

/// Reads a delimited dataset into an indexed table.
///
/// The first line is the header naming the columns; every other non-blank
/// line becomes a row.
#[derive(Debug, Clone)]
pub struct TableLoader {
    format: LineFormat,
}

impl TableLoader {
    /// Create a loader for the given line format.
    pub fn new(format: LineFormat) -> Self {
        Self { format }
    }

    /// The line format used to split rows.
    pub fn format(&self) -> &LineFormat {
        &self.format
    }

    /// Load a plain or gzip-compressed file.
    ///
    /// `secondary_columns` are indexed eagerly once all rows are in.
    pub fn load<S: AsRef<str>>(
        &self,
        path: impl AsRef<Path>,
        primary_column: &str,
        secondary_columns: &[S],
    ) -> Result<IndexedTable> {
        let source = Source::new(path.as_ref())?;
        let started = Instant::now();
        let table = self.load_lines(source.open()?, primary_column, secondary_columns)?;
        info!(
            path = %source.path().display(),
            rows = table.row_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded vocabulary table"
        );
        Ok(table)
    }

    /// Load a file, choosing indices from the match rules.
    ///
    /// The first correct column is the primary column; the remaining correct
    /// columns and every suggestion column are indexed.
    pub fn load_for_rules(&self, path: impl AsRef<Path>, rules: &MatchRules) -> Result<IndexedTable> {
        let (primary, secondary) = rules.index_plan()?;
        self.load(path, primary, &secondary)
    }

    /// Load from any buffered reader.
    pub fn load_reader<R: BufRead, S: AsRef<str>>(
        &self,
        reader: R,
        primary_column: &str,
        secondary_columns: &[S],
    ) -> Result<IndexedTable> {
        self.load_lines(Lines::new(reader, None), primary_column, secondary_columns)
    }

    fn load_lines<R: BufRead, S: AsRef<str>>(
        &self,
        mut lines: Lines<R>,
        primary_column: &str,
        secondary_columns: &[S],
    ) -> Result<IndexedTable> {
        let header = lines.header()?;
        let columns = self.format.column_name_to_index(&header)?;
        let mut table = IndexedTable::new(columns.into_keys(), primary_column)?
            .with_sub_delimiters(self.format.sub_delimiters().to_vec())?;

        while let Some((line_number, line)) = lines.next_line()? {
            if line.is_empty() {
                continue;
            }
            let cells = self.format.split_numbered(line, line_number)?;
            table.add_row(cells).map_err(|e| match e {
                VocabError::MissingPrimaryKey(column) => VocabError::format(
                    line_number,
                    format!("no value in primary column '{}'", column),
                ),
                other => other,
            })?;
        }

        for column in secondary_columns {
            table.create_index(column.as_ref())?;
        }
        debug!(
            rows = table.row_count(),
            indexed = secondary_columns.len(),
            "Indexed vocabulary table"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DATA: &str = "Scientific_Name\tSynonyms\tCommon_Name\n\
                        Felis catus\tFelis domesticus, Felis silvestris catus\tcat\n\
                        Canis lupus familiaris\tCanis familiaris\tdog\n\
                        \n";

    fn loader() -> TableLoader {
        let format = LineFormat::new(["\t", "\t"])
            .unwrap()
            .with_sub_delimiter(1, ", ")
            .unwrap();
        TableLoader::new(format)
    }

    #[test]
    fn test_load_reader() {
        let table = loader()
            .load_reader(Cursor::new(DATA), "Scientific_Name", &["Synonyms", "Common_Name"])
            .unwrap();

        assert_eq!(table.size(), (2, 3));
        assert!(table.is_indexed("Synonyms"));
        assert!(table.is_indexed("Common_Name"));
        assert_eq!(table.get("Common_Name", "Felis catus").unwrap(), Some("cat"));
        assert_eq!(
            table
                .get_by_secondary("Scientific_Name", "Felis domesticus", "Synonyms")
                .unwrap(),
            vec![Some("Felis catus")]
        );
    }

    #[test]
    fn test_header_is_not_a_row() {
        let table = loader()
            .load_reader(Cursor::new(DATA), "Scientific_Name", &[] as &[&str])
            .unwrap();
        assert!(!table.is_row_key("Scientific_Name"));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let data = "a\tb\tc\nx\ty\tz\nbroken\n";
        let err = loader()
            .load_reader(Cursor::new(data), "a", &[] as &[&str])
            .unwrap_err();
        match err {
            VocabError::Format { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_primary_value_reports_line_number() {
        let data = "a\tb\tc\n\ty\tz\n";
        let err = loader()
            .load_reader(Cursor::new(data), "a", &[] as &[&str])
            .unwrap_err();
        assert!(matches!(err, VocabError::Format { line: 2, .. }));
    }

    #[test]
    fn test_unknown_secondary_column() {
        let err = loader()
            .load_reader(Cursor::new(DATA), "Scientific_Name", &["Nope"])
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
