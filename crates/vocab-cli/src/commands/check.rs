//! Check command - validate values against one configured format.

use std::path::PathBuf;

use colored::Colorize;
use tracing::debug;
use vocab::{ValidatorSetConfig, Verdict, VocabError};

/// Returns `Ok(false)` if any value is not accepted.
pub fn run(
    config: PathBuf,
    format: String,
    values: Vec<String>,
    json_output: bool,
    _verbose: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let set = ValidatorSetConfig::from_path(&config)?;
    let entry = set
        .string_format
        .iter()
        .find(|entry| entry.format_tag == format)
        .ok_or_else(|| VocabError::UnknownFormat(format.clone()))?;

    let validator = entry.build(set.base_dir.as_deref())?;
    debug!(
        format = %format,
        materialized = validator.is_materialized(),
        "Checking {} value(s)",
        values.len()
    );

    let verdicts = values
        .iter()
        .map(|value| validator.check(value))
        .collect::<Result<Vec<Verdict>, _>>()?;
    let all_accepted = verdicts.iter().all(Verdict::is_accept);

    if json_output {
        let results: Vec<_> = values
            .iter()
            .zip(&verdicts)
            .map(|(value, verdict)| {
                serde_json::json!({
                    "value": value,
                    "accepted": verdict.is_accept(),
                    "result": verdict,
                    "message": verdict.message(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (value, verdict) in values.iter().zip(&verdicts) {
            match verdict {
                Verdict::Accept => println!("{} {}", "ok".green().bold(), value.white()),
                Verdict::Suggest { .. } => {
                    println!("{} {}", "suggest".yellow().bold(), verdict)
                }
                Verdict::Reject { .. } => println!("{} {}", "reject".red().bold(), verdict),
            }
        }
    }

    Ok(all_accepted)
}
