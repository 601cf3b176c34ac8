//! Utility functions for CLI operations.

use std::env;

use clap::ValueEnum;
use paramset::source::MapEnv;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Parses a `KEY=VALUE` argument.
pub fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("no variable name in '{s}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// The environment resolution sees: the process environment unless
/// `ignore_process` is set, with `overrides` applied on top.
pub fn build_env(ignore_process: bool, overrides: &[(String, String)]) -> MapEnv {
    let process: Vec<(String, String)> = if ignore_process {
        Vec::new()
    } else {
        env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    };
    MapEnv::new(process.into_iter().chain(overrides.iter().cloned()))
}
