//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vocab: check strings against controlled vocabularies
#[derive(Parser)]
#[command(name = "vocab")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check values against one configured format
    Check {
        /// Path to the validator configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Format tag to check against
        #[arg(short, long)]
        format: String,

        /// Values to check
        #[arg(value_name = "VALUE", required = true)]
        values: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the formats in a configuration and build each validator
    Inspect {
        /// Path to the validator configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
