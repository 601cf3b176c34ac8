//! Main entry point for the pset CLI.
//!
//! `pset` loads a YAML parameter schema and either resolves a set of
//! arguments against it (`check`) or describes the parameters it defines
//! (`describe`).

mod cli;
mod commands;
mod error;
mod schema;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = paramset::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        cli::Command::Check(cmd) => cmd.execute(&global),
        cli::Command::Describe(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
