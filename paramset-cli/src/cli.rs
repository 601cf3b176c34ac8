//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CheckCommand, DescribeCommand};
use clap::{Parser, Subcommand};

/// Check parameter schemas against arguments, environment and config files.
#[derive(Parser)]
#[command(name = "pset")]
#[command(
    version,
    about = "Check parameter schemas against arguments, environment and config files",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve parameters from config files, environment and arguments
    Check(CheckCommand),

    /// Describe the parameters a schema defines
    Describe(DescribeCommand),
}
