//! Vocab CLI - controlled-vocabulary checks from the command line.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            config,
            format,
            values,
            json,
        } => commands::check::run(config, format, values, json, cli.verbose),

        Commands::Inspect { config, json } => commands::inspect::run(config, json, cli.verbose),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
