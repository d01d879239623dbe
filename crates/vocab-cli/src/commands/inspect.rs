//! Inspect command - list configured formats and how they are backed.

use std::path::PathBuf;

use colored::Colorize;
use vocab::{EnumLookupValidator, FormatValidator, ValidatorSetConfig};

pub fn run(
    config: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let set = ValidatorSetConfig::from_path(&config)?;
    let base_dir = set.base_dir.as_deref();

    let mut entries = Vec::with_capacity(set.string_format.len());
    for entry in &set.string_format {
        let validator = entry.build(base_dir)?;
        entries.push((entry.resolved_path(base_dir), validator));
    }

    if json_output {
        let formats: Vec<_> = entries
            .iter()
            .map(|(path, validator)| {
                serde_json::json!({
                    "format": validator.format_name(),
                    "path": path,
                    "mode": mode(validator),
                    "correct": validator.rules().correct(),
                    "suggestions": validator.rules().suggestions(),
                    "rows": validator.table().map(|t| t.row_count()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&formats)?);
        return Ok(true);
    }

    println!(
        "{} {}",
        "Formats in".cyan().bold(),
        config.display().to_string().white()
    );
    println!();
    for (path, validator) in &entries {
        println!(
            "  {} ({})",
            validator.format_name().white().bold(),
            mode(validator)
        );
        println!("    File:        {}", path.display());
        println!("    Correct:     {}", validator.rules().correct().join(", ").green());
        if !validator.rules().suggestions().is_empty() {
            println!(
                "    Suggestions: {}",
                validator.rules().suggestions().join(", ").yellow()
            );
        }
        if let Some(table) = validator.table() {
            let (rows, columns) = table.size();
            println!("    Size:        {} rows x {} columns", rows, columns);
        }
    }

    Ok(true)
}

fn mode(validator: &EnumLookupValidator) -> &'static str {
    if validator.is_materialized() {
        "in memory"
    } else {
        "streaming"
    }
}
