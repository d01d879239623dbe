//! Enum-style format validators backed by a reference dataset.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, VocabError};
use crate::input::{LineFormat, Source, TableLoader};
use crate::table::IndexedTable;

use super::rules::MatchRules;
use super::scan::{scan, ColumnPlan};
use super::verdict::Verdict;

/// A custom string format check, as invoked by a JSON Schema engine.
///
/// The engine calls [`validate`](Self::validate) once per string tagged with
/// [`format_name`](Self::format_name). `Ok(None)` means the value is valid.
pub trait FormatValidator: Send + Sync {
    /// The `format` keyword this validator answers for.
    fn format_name(&self) -> &str;

    /// Validate one candidate, returning a message when it is not valid.
    fn validate(&self, candidate: &str) -> Result<Option<String>>;
}

/// Where the vocabulary lives.
#[derive(Debug)]
enum Backing {
    /// Fully loaded and indexed.
    Materialized(IndexedTable),
    /// Re-scanned from disk on every call.
    Streaming { source: Source, format: LineFormat },
}

/// Validates strings against the columns of a tabular vocabulary.
///
/// A value in one of the rules' correct columns is accepted. A value in a
/// suggestion column is rejected with the correct-column values of the
/// matching rows as hints. Anything else is rejected.
///
/// # Example
///
/// ```no_run
/// use vocab::{EnumLookupValidator, LineFormat, MatchRules};
///
/// let format = LineFormat::new(["\t", "\t", "\t"])?
///     .with_sub_delimiter(2, ", ")?
///     .with_sub_delimiter(3, ", ")?;
/// let rules = MatchRules::new()
///     .add_correct_columns(["Scientific_Name", "Synonyms"])?
///     .add_suggested("Other_Common_Name")?;
/// let validator = EnumLookupValidator::load(
///     "animal_subject",
///     "GenBankControlledVocabulary.tsv.gz",
///     format,
///     rules,
/// )?;
/// println!("{}", validator.check("cat")?);
/// # Ok::<(), vocab::VocabError>(())
/// ```
#[derive(Debug)]
pub struct EnumLookupValidator {
    format_name: String,
    rules: MatchRules,
    backing: Backing,
}

impl EnumLookupValidator {
    /// Validate against an already built table.
    ///
    /// Every rule column must exist in the table. Indices needed for lookups
    /// are built here, so validation never mutates the table.
    pub fn materialized(
        format_name: impl Into<String>,
        table: IndexedTable,
        rules: MatchRules,
    ) -> Result<Self> {
        let format_name = checked_name(format_name.into())?;
        rules.ensure_correct()?;
        rules.ensure_columns_exist(|c| table.is_column_key(c))?;

        for column in rules.columns() {
            if !is_primary_lookup(&table, column) {
                table.create_index(column)?;
            }
        }
        debug!(
            format = %format_name,
            rows = table.row_count(),
            "Created materialized validator"
        );

        Ok(Self {
            format_name,
            rules,
            backing: Backing::Materialized(table),
        })
    }

    /// Validate by scanning `path` on every call.
    ///
    /// The header is read once here to check that every rule column exists.
    pub fn streaming(
        format_name: impl Into<String>,
        path: impl Into<PathBuf>,
        format: LineFormat,
        rules: MatchRules,
    ) -> Result<Self> {
        let format_name = checked_name(format_name.into())?;
        rules.ensure_correct()?;
        let source = Source::new(path)?;
        check_header(&source, &format, &rules)?;
        debug!(
            format = %format_name,
            path = %source.path().display(),
            "Created streaming validator"
        );

        Ok(Self {
            format_name,
            rules,
            backing: Backing::Streaming { source, format },
        })
    }

    /// Load `path` into memory and validate against the indexed table.
    pub fn load(
        format_name: impl Into<String>,
        path: impl AsRef<Path>,
        format: LineFormat,
        rules: MatchRules,
    ) -> Result<Self> {
        rules.ensure_correct()?;
        let source = Source::new(path.as_ref())?;
        check_header(&source, &format, &rules)?;
        let table = TableLoader::new(format).load_for_rules(source.path(), &rules)?;
        Self::materialized(format_name, table, rules)
    }

    /// Decide whether `subject` is accepted, suggested, or rejected.
    ///
    /// Fails only on I/O or malformed data in streaming mode.
    pub fn check(&self, subject: &str) -> Result<Verdict> {
        let verdict = match &self.backing {
            Backing::Materialized(table) => self.lookup(table, subject),
            Backing::Streaming { source, format } => {
                scan(source.open()?, format, &self.rules, subject)?
            }
        };
        trace!(format = %self.format_name, verdict = verdict.label(), "Checked value");
        Ok(verdict)
    }

    /// The rejection message for `subject`, `None` if it is accepted.
    pub fn message(&self, subject: &str) -> Result<Option<String>> {
        Ok(self.check(subject)?.message())
    }

    /// The match rules.
    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Whether the vocabulary is held in memory.
    pub fn is_materialized(&self) -> bool {
        matches!(self.backing, Backing::Materialized(_))
    }

    /// The in-memory table, if materialized.
    pub fn table(&self) -> Option<&IndexedTable> {
        match &self.backing {
            Backing::Materialized(table) => Some(table),
            Backing::Streaming { .. } => None,
        }
    }

    /// The scanned file, if streaming.
    pub fn source_path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::Materialized(_) => None,
            Backing::Streaming { source, .. } => Some(source.path()),
        }
    }

    fn lookup(&self, table: &IndexedTable, subject: &str) -> Verdict {
        let accepted = self
            .rules
            .correct()
            .iter()
            .any(|column| in_column(table, column, subject));
        if accepted {
            return Verdict::Accept;
        }

        for column in self.rules.suggestions() {
            let Some(keys) = table.primary_keys_for(subject, column) else {
                continue;
            };
            let mut options = Vec::new();
            for correct in self.rules.correct() {
                for key in keys {
                    if let Ok(Some(value)) = table.get(correct, key) {
                        options.push(value.to_string());
                    }
                }
            }
            return Verdict::Suggest {
                subject: subject.to_string(),
                options,
            };
        }

        Verdict::Reject {
            subject: subject.to_string(),
            columns: self.rules.correct().to_vec(),
        }
    }
}

impl FormatValidator for EnumLookupValidator {
    fn format_name(&self) -> &str {
        &self.format_name
    }

    fn validate(&self, candidate: &str) -> Result<Option<String>> {
        self.message(candidate)
    }
}

/// A single-valued primary column is matched by key identity, not an index.
fn is_primary_lookup(table: &IndexedTable, column: &str) -> bool {
    column == table.primary_column() && table.sub_delimiter(column).is_none()
}

fn in_column(table: &IndexedTable, column: &str, subject: &str) -> bool {
    if is_primary_lookup(table, column) {
        table.is_row_key(subject)
    } else {
        table.primary_keys_for(subject, column).is_some()
    }
}

fn check_header(source: &Source, format: &LineFormat, rules: &MatchRules) -> Result<()> {
    let header = source.open()?.header()?;
    ColumnPlan::resolve(&header, format, rules).map(|_| ())
}

fn checked_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(VocabError::Config("format name cannot be empty".to_string()));
    }
    Ok(name)
}
