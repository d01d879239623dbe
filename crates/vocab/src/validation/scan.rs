//! Streaming lookup: a linear scan over the dataset for every query.
//!
//! Used when a vocabulary is validated against too rarely to be worth
//! holding in memory. Each call re-reads the source from the header on.

use std::io::BufRead;

use tracing::trace;

use crate::error::{Result, VocabError};
use crate::input::{LineFormat, Lines};

use super::rules::MatchRules;
use super::verdict::Verdict;

/// Column positions of the rule columns in one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnPlan {
    correct: Vec<usize>,
    suggestions: Vec<usize>,
}

impl ColumnPlan {
    /// Resolve rule columns against a header line.
    pub(crate) fn resolve(header: &str, format: &LineFormat, rules: &MatchRules) -> Result<Self> {
        let positions = format.column_name_to_index(header)?;
        let lookup = |names: &[String]| -> Result<Vec<usize>> {
            names
                .iter()
                .map(|name| {
                    positions.get(name).copied().ok_or_else(|| {
                        VocabError::Config(format!(
                            "column '{}' does not exist in the dataset",
                            name
                        ))
                    })
                })
                .collect()
        };
        Ok(Self {
            correct: lookup(rules.correct())?,
            suggestions: lookup(rules.suggestions())?,
        })
    }
}

/// Scan `lines` for `subject`.
///
/// The first row with `subject` in a correct column ends the scan with
/// [`Verdict::Accept`]. Rows with `subject` in a suggestion column are
/// remembered until the end of input, since a later row may still accept.
/// The suggestion then comes from the first suggestion column (in declared
/// order) that matched, listing correct-column values column by column,
/// rows in file order.
pub(crate) fn scan<R: BufRead>(
    mut lines: Lines<R>,
    format: &LineFormat,
    rules: &MatchRules,
    subject: &str,
) -> Result<Verdict> {
    let header = lines.header()?;
    let plan = ColumnPlan::resolve(&header, format, rules)?;

    // Correct-column cells of matching rows, per suggestion column.
    let mut hits: Vec<Vec<Vec<Option<String>>>> = vec![Vec::new(); plan.suggestions.len()];

    while let Some((line_number, line)) = lines.next_line()? {
        if line.is_empty() {
            continue;
        }
        let mut cells = format.split_numbered(line, line_number)?;

        let accepted = plan.correct.iter().any(|&position| {
            cells[position]
                .as_deref()
                .is_some_and(|cell| format.cell_matches(cell, position, subject))
        });
        if accepted {
            trace!(line = line_number, "Accepted during scan");
            return Ok(Verdict::Accept);
        }

        let matched: Vec<usize> = plan
            .suggestions
            .iter()
            .enumerate()
            .filter(|&(_, &position)| {
                cells[position]
                    .as_deref()
                    .is_some_and(|cell| format.cell_matches(cell, position, subject))
            })
            .map(|(slot, _)| slot)
            .collect();
        if matched.is_empty() {
            continue;
        }
        let correct_cells: Vec<Option<String>> = plan
            .correct
            .iter()
            .map(|&position| cells[position].take())
            .collect();
        for slot in matched {
            hits[slot].push(correct_cells.clone());
        }
    }

    Ok(verdict_from_hits(subject, rules, hits))
}

fn verdict_from_hits(
    subject: &str,
    rules: &MatchRules,
    hits: Vec<Vec<Vec<Option<String>>>>,
) -> Verdict {
    let Some(rows) = hits.into_iter().find(|rows| !rows.is_empty()) else {
        return Verdict::Reject {
            subject: subject.to_string(),
            columns: rules.correct().to_vec(),
        };
    };

    let mut options = Vec::new();
    for column in 0..rules.correct().len() {
        options.extend(rows.iter().filter_map(|row| row[column].clone()));
    }
    Verdict::Suggest {
        subject: subject.to_string(),
        options,
    }
}
