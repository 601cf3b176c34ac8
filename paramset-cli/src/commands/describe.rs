//! Command to describe the parameters a schema defines.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use paramset::resolve::IgnoreErrors;
use paramset::setter::ValueReq;
use paramset::source::MapEnv;
use paramset::{Attributes, NamedParameter, ParameterSet};
use serde::Serialize;

use crate::error::CliError;
use crate::schema::Schema;
use crate::utils::{GlobalOptions, OutputFormat};

/// Describe the parameters defined by a schema.
#[derive(Args)]
pub struct DescribeCommand {
    /// Parameter schema (YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Include parameters hidden from standard usage
    #[arg(long)]
    pub all: bool,
}

impl DescribeCommand {
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let schema = Schema::load(&self.schema)?;
        let builder = ParameterSet::builder()
            .error_handler(IgnoreErrors)
            .env_source(MapEnv::default());
        let ps = schema.build(builder)?;
        let description = Description::new(&ps, self.all);

        match self.format {
            OutputFormat::Text => print!("{}", description.to_text()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&description)?),
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Description {
    program: String,
    terminal_param: String,
    env_prefixes: Vec<String>,
    groups: Vec<GroupDescription>,
    positional: Vec<PositionalDescription>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct GroupDescription {
    name: String,
    description: String,
    parameters: Vec<ParamDescription>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ParamDescription {
    names: Vec<String>,
    description: String,
    value: ValueReq,
    allowed_values: String,
    initial_value: Option<String>,
    attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    see_also: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct PositionalDescription {
    name: String,
    description: String,
    allowed_values: String,
    terminal: bool,
}

impl ParamDescription {
    fn new(p: &NamedParameter) -> Self {
        Self {
            names: p.all_names().to_vec(),
            description: p.description().to_string(),
            value: p.value_req(),
            allowed_values: p.allowed_values(),
            initial_value: p.initial_value().map(str::to_string),
            attributes: p.attributes(),
            see_also: p.see_also().to_vec(),
        }
    }
}

impl Description {
    fn new(ps: &ParameterSet, include_hidden: bool) -> Self {
        let groups = ps
            .groups()
            .map(|g| GroupDescription {
                name: g.name().to_string(),
                description: g.description().to_string(),
                parameters: g
                    .members()
                    .iter()
                    .filter_map(|name| ps.named_param(name))
                    .filter(|p| include_hidden || !p.attributes().is_dont_show_in_std_usage())
                    .map(ParamDescription::new)
                    .collect(),
            })
            .filter(|g| !g.parameters.is_empty())
            .collect();
        let positional = ps
            .positional_params()
            .iter()
            .map(|p| PositionalDescription {
                name: p.name().to_string(),
                description: p.description().to_string(),
                allowed_values: p.allowed_values(),
                terminal: p.is_terminal(),
            })
            .collect();

        Self {
            program: ps.program_name().to_string(),
            terminal_param: ps.terminal_param().to_string(),
            env_prefixes: ps.env_prefixes().to_vec(),
            groups,
            positional,
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.program);
        if !self.env_prefixes.is_empty() {
            let _ = writeln!(out, "environment prefixes: {}", self.env_prefixes.join(", "));
        }

        for group in &self.groups {
            let _ = writeln!(out);
            if group.description.is_empty() {
                let _ = writeln!(out, "[{}]", group.name);
            } else {
                let _ = writeln!(out, "[{}] {}", group.name, group.description);
            }
            for p in &group.parameters {
                let names: Vec<String> = p.names.iter().map(|n| format!("-{n}")).collect();
                let _ = writeln!(out, "  {}", names.join(", "));
                if !p.description.is_empty() {
                    let _ = writeln!(out, "      {}", p.description);
                }
                let _ = writeln!(out, "      takes: {}", value_text(p.value, &p.allowed_values));
                if let Some(initial) = &p.initial_value {
                    let _ = writeln!(out, "      initial value: {initial}");
                }
                let flags = attribute_text(p.attributes);
                if !flags.is_empty() {
                    let _ = writeln!(out, "      attributes: {}", flags.join(", "));
                }
                if !p.see_also.is_empty() {
                    let _ = writeln!(out, "      see also: {}", p.see_also.join(", "));
                }
            }
        }

        if !self.positional.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "positional:");
            for p in &self.positional {
                let suffix = if p.terminal { "..." } else { "" };
                let _ = writeln!(out, "  {}{suffix}: {}", p.name, p.allowed_values);
                if !p.description.is_empty() {
                    let _ = writeln!(out, "      {}", p.description);
                }
            }
            let _ = writeln!(out, "arguments after {} are not parameters", self.terminal_param);
        }
        out
    }
}

fn value_text(req: ValueReq, allowed: &str) -> String {
    match req {
        ValueReq::Mandatory => allowed.to_string(),
        ValueReq::Optional => format!("optionally {allowed}"),
        ValueReq::None => "no value".to_string(),
    }
}

fn attribute_text(attrs: Attributes) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if attrs.is_command_line_only() {
        flags.push("command-line only");
    }
    if attrs.is_must_be_set() {
        flags.push("must be set");
    }
    if attrs.is_set_only_once() {
        flags.push("set only once");
    }
    if attrs.is_dont_show_in_std_usage() {
        flags.push("hidden");
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(ValueReq::None, "anything"), "no value");
        assert_eq!(value_text(ValueReq::Optional, "a bool"), "optionally a bool");
        assert_eq!(value_text(ValueReq::Mandatory, "an int"), "an int");
    }

    #[test]
    fn test_attribute_text() {
        assert!(attribute_text(Attributes::new()).is_empty());
        let attrs = Attributes::new().must_be_set().set_only_once();
        assert_eq!(attribute_text(attrs), vec!["must be set", "set only once"]);
    }
}
