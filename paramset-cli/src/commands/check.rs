//! Command to resolve arguments, environment and config files against a
//! schema and report the outcome.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use clap::Args;
use paramset::resolve::{AcceptRemainder, IgnoreErrors, RejectRemainder};
use paramset::{init_logger, Location, ParameterSet};
use serde::Serialize;

use crate::error::CliError;
use crate::schema::Schema;
use crate::utils::{build_env, parse_env_pair, GlobalOptions, OutputFormat};

/// Resolve parameters against a schema.
#[derive(Args)]
pub struct CheckCommand {
    /// Parameter schema (YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Set an environment variable for this check (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Ignore the process environment
    #[arg(long)]
    pub ignore_environment: bool,

    /// Arguments to resolve, after `--`
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl CheckCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = init_logger(global.verbose, global.quiet);
        let schema = Schema::load(&self.schema)?;

        let builder = ParameterSet::builder()
            .error_handler(IgnoreErrors)
            .env_source(build_env(self.ignore_environment, &self.env));
        let builder = if schema.allow_remainder {
            builder.remainder_handler(AcceptRemainder)
        } else {
            builder.remainder_handler(RejectRemainder)
        };
        let mut ps = schema.build(builder)?;

        logger.info(&format!(
            "resolving {} arguments for {}",
            self.args.len(),
            ps.program_name()
        ));
        let error_count = ps.parse(self.args).len();
        let report = CheckReport::new(&ps);

        match self.format {
            OutputFormat::Text => print!("{}", report.to_text()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if error_count > 0 {
            return Err(CliError::SemanticFailure(format!(
                "{error_count} error{} found",
                if error_count == 1 { "" } else { "s" }
            )));
        }
        Ok(())
    }
}

/// The outcome of one resolution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckReport {
    program: String,
    checked_at: String,
    values: Vec<ValueReport>,
    positional: Vec<ValueReport>,
    unused: BTreeMap<String, Vec<Location>>,
    remainder: Vec<String>,
    errors: Vec<ErrorReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ValueReport {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    where_set: Vec<Location>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ErrorReport {
    parameter: Option<String>,
    message: String,
    location: Option<Location>,
}

impl CheckReport {
    fn new(ps: &ParameterSet) -> Self {
        let values = ps
            .named_params()
            .map(|p| ValueReport {
                name: p.name().to_string(),
                group: Some(p.group_name().to_string()),
                value: p.current_value(),
                where_set: p.where_set().to_vec(),
            })
            .collect();
        let positional = ps
            .positional_params()
            .iter()
            .map(|p| ValueReport {
                name: p.name().to_string(),
                group: None,
                value: p.current_value(),
                where_set: Vec::new(),
            })
            .collect();
        let errors = ps
            .errors()
            .iter()
            .flat_map(|(name, errs)| {
                errs.iter().map(move |err| ErrorReport {
                    parameter: (!name.is_empty()).then(|| name.to_string()),
                    message: err.to_string(),
                    location: err.location().cloned(),
                })
            })
            .collect();

        Self {
            program: ps.program_name().to_string(),
            checked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            values,
            positional,
            unused: ps.unused().clone(),
            remainder: ps.remainder().to_vec(),
            errors,
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "program: {}", self.program);

        if !self.positional.is_empty() {
            let _ = writeln!(out, "positional:");
            for v in &self.positional {
                let _ = writeln!(out, "  {} = {}", v.name, v.value.as_deref().unwrap_or("-"));
            }
        }

        if !self.values.is_empty() {
            let _ = writeln!(out, "values:");
            for v in &self.values {
                let _ = writeln!(out, "  {} = {}", v.name, v.value.as_deref().unwrap_or("-"));
                for loc in &v.where_set {
                    let _ = writeln!(out, "      set at {loc}");
                }
            }
        }

        if !self.unused.is_empty() {
            let _ = writeln!(out, "unused:");
            for (name, locations) in &self.unused {
                for loc in locations {
                    let _ = writeln!(out, "  {name}: {loc}");
                }
            }
        }

        if !self.remainder.is_empty() {
            let _ = writeln!(out, "remainder: {}", self.remainder.join(" "));
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "errors:");
            for e in &self.errors {
                let label = e.parameter.as_deref().unwrap_or("general");
                let _ = writeln!(out, "  {label}: {}", e.message);
            }
        }
        out
    }
}
