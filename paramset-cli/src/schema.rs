//! Parameter schema files.
//!
//! A schema is a YAML description of a program's parameters. `pset` builds
//! a [`ParameterSet`] from it so that argument lists, environments and
//! config files can be checked without writing any code.
//!
//! ```yaml
//! program: mytool
//! env-prefixes: [MT_]
//! config-files:
//!   - path: mytool.cfg
//!     existence: optional
//!     strict: false
//! groups:
//!   - name: net
//!     description: network settings
//!     config-files:
//!       - path: net.cfg
//! parameters:
//!   - name: port
//!     type: int
//!     group: net
//!     default: "8080"
//!     min: 1
//!     max: 65535
//!   - name: format
//!     type: enum
//!     allowed: { text: plain text, json: JSON }
//! positional:
//!   - name: input
//!     type: pathname
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use paramset::param::{validate_group_name, validate_param_name};
use paramset::setter::{
    checks, BoolSetter, DurationSetter, EnumListSetter, EnumSetter, FloatSetter, IntSetter,
    ListSetter, MapSetter, NilSetter, PathnameSetter, Setter, StringSetter, TimeSetter,
    ValueReq,
};
use paramset::{
    Attributes, Binding, Existence, FileKind, NamedOpts, ParamSetBuilder, ParameterSet,
    PositionalOpts, Strictness,
};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// A complete schema.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Schema {
    /// Program name matched by program-specific config lines.
    pub program: Option<String>,

    /// String ending named-parameter processing (default `--`).
    pub terminal_param: Option<String>,

    /// Environment variable prefixes.
    #[serde(default)]
    pub env_prefixes: Vec<String>,

    /// Global config files, in reading order.
    #[serde(default)]
    pub config_files: Vec<ConfigFileEntry>,

    /// Group descriptions and group config files.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,

    /// Named parameters.
    #[serde(default)]
    pub parameters: Vec<ParamSpec>,

    /// Positional parameters, in order.
    #[serde(default)]
    pub positional: Vec<PositionalSpec>,

    /// Whether leftover arguments are acceptable.
    #[serde(default)]
    pub allow_remainder: bool,
}

/// A config file entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigFileEntry {
    /// File path; relative paths are taken from the schema's directory.
    pub path: PathBuf,

    /// Whether the file must exist.
    #[serde(default)]
    pub existence: ConfigExistence,

    /// Whether unknown names are errors (global files only).
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

/// Existence rule for a config file.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigExistence {
    /// The file must exist.
    MustExist,
    /// A missing file is skipped.
    #[default]
    Optional,
}

impl From<ConfigExistence> for Existence {
    fn from(e: ConfigExistence) -> Self {
        match e {
            ConfigExistence::MustExist => Existence::MustExist,
            ConfigExistence::Optional => Existence::Optional,
        }
    }
}

/// Existence rule for a pathname value.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PathExistence {
    /// The path must exist.
    MustExist,
    /// The path must not exist.
    MustNotExist,
    /// Anything goes.
    #[default]
    Optional,
}

impl From<PathExistence> for Existence {
    fn from(e: PathExistence) -> Self {
        match e {
            PathExistence::MustExist => Existence::MustExist,
            PathExistence::MustNotExist => Existence::MustNotExist,
            PathExistence::Optional => Existence::Optional,
        }
    }
}

/// Kind of filesystem entry a pathname must name.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PathKind {
    /// Anything.
    #[default]
    Any,
    /// A regular file.
    File,
    /// A directory.
    Dir,
}

impl From<PathKind> for FileKind {
    fn from(k: PathKind) -> Self {
        match k {
            PathKind::Any => FileKind::Any,
            PathKind::File => FileKind::File,
            PathKind::Dir => FileKind::Dir,
        }
    }
}

/// A group entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GroupSpec {
    /// Group name.
    pub name: String,

    /// Help text.
    #[serde(default)]
    pub description: String,

    /// Files that may only set this group's members.
    #[serde(default)]
    pub config_files: Vec<ConfigFileEntry>,
}

/// Value types a parameter can have.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ParamType {
    /// `true`/`false` flag.
    Bool,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Any text.
    String,
    /// One of the `allowed` keys.
    Enum,
    /// A list of `allowed` keys.
    EnumList,
    /// A list of strings.
    List,
    /// A list of integers.
    IntList,
    /// `key` or `key=bool` entries.
    Map,
    /// A duration such as `1h30m`.
    Duration,
    /// An RFC 3339 timestamp or a date.
    Time,
    /// A filesystem path.
    Pathname,
    /// No value at all.
    Nil,
    /// Names a config file read at that point in the arguments.
    ConfigFile,
}

/// Attribute names.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeName {
    /// See [`Attributes::command_line_only`].
    CommandLineOnly,
    /// See [`Attributes::must_be_set`].
    MustBeSet,
    /// See [`Attributes::set_only_once`].
    SetOnlyOnce,
    /// See [`Attributes::dont_show_in_std_usage`].
    DontShowInStdUsage,
}

/// A named parameter entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ParamSpec {
    /// Principal name.
    pub name: String,

    /// Value type.
    #[serde(rename = "type")]
    pub kind: ParamType,

    /// Alternate names.
    #[serde(default)]
    pub alt_names: Vec<String>,

    /// Help text.
    #[serde(default)]
    pub description: String,

    /// Group name (default `cmd`).
    pub group: Option<String>,

    /// Initial value, in the same syntax as any other value.
    pub default: Option<String>,

    /// Allowed values and their descriptions (enum types).
    #[serde(default)]
    pub allowed: BTreeMap<String, String>,

    /// List separator (list types).
    pub separator: Option<String>,

    /// Smallest allowed value (int).
    pub min: Option<i64>,

    /// Largest allowed value (int).
    pub max: Option<i64>,

    /// Existence rule (pathname).
    #[serde(default)]
    pub existence: PathExistence,

    /// Entry kind (pathname).
    #[serde(default)]
    pub file_kind: PathKind,

    /// Whether the flag stores `false` when given (bool).
    #[serde(default)]
    pub inverted: bool,

    /// Attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeName>,

    /// Related parameter names.
    #[serde(default)]
    pub see_also: Vec<String>,
}

/// A positional parameter entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PositionalSpec {
    /// Name used in messages.
    pub name: String,

    /// Value type.
    #[serde(rename = "type")]
    pub kind: ParamType,

    /// Help text.
    #[serde(default)]
    pub description: String,

    /// Whether every later argument is remainder.
    #[serde(default)]
    pub terminal: bool,
}

impl Schema {
    /// Reads and validates a schema file.
    ///
    /// Relative config file paths are made relative to the schema's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::InvalidArguments(format!("cannot read schema {}: {e}", path.display()))
        })?;
        let mut schema: Self = serde_yaml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;

        if let Some(dir) = path.parent() {
            schema.rebase(dir);
        }
        schema.validate()?;
        Ok(schema)
    }

    fn rebase(&mut self, dir: &Path) {
        let rebase = |entry: &mut ConfigFileEntry| {
            let tilde = entry.path.starts_with("~");
            if entry.path.is_relative() && !tilde {
                entry.path = dir.join(&entry.path);
            }
        };
        self.config_files.iter_mut().for_each(rebase);
        for group in &mut self.groups {
            group.config_files.iter_mut().for_each(rebase);
        }
    }

    /// Checks everything that would otherwise make registration panic.
    pub fn validate(&self) -> Result<(), CliError> {
        let mut seen = HashSet::new();
        let mut claim = |name: &str| -> Result<(), CliError> {
            validate_param_name(name).map_err(CliError::Config)?;
            if seen.insert(name.to_string()) {
                Ok(())
            } else {
                Err(CliError::Config(format!("the name '{name}' is used twice")))
            }
        };

        for param in &self.parameters {
            claim(&param.name)?;
            for alt in &param.alt_names {
                claim(alt)?;
            }
            if let Some(group) = &param.group {
                validate_group_name(group).map_err(CliError::Config)?;
            }
            validate_type(&param.name, param)?;
        }
        for pos in &self.positional {
            claim(&pos.name)?;
            if matches!(pos.kind, ParamType::Nil | ParamType::ConfigFile) {
                return Err(CliError::Config(format!(
                    "positional parameter '{}' must take a value",
                    pos.name
                )));
            }
        }

        let named: HashSet<&str> = self
            .parameters
            .iter()
            .flat_map(|p| std::iter::once(&p.name).chain(&p.alt_names))
            .map(String::as_str)
            .collect();
        for param in &self.parameters {
            if let Some(missing) = param.see_also.iter().find(|n| !named.contains(n.as_str())) {
                return Err(CliError::Config(format!(
                    "parameter '{}' refers to unknown parameter '{missing}'",
                    param.name
                )));
            }
        }

        if let Some(pos) = self.positional.iter().rev().skip(1).find(|p| p.terminal) {
            return Err(CliError::Config(format!(
                "terminal positional parameter '{}' must be the last one",
                pos.name
            )));
        }
        if self.positional.iter().any(|p| p.terminal) && !self.parameters.is_empty() {
            return Err(CliError::Config(
                "a terminal positional parameter cannot be mixed with named parameters"
                    .to_string(),
            ));
        }

        for (i, prefix) in self.env_prefixes.iter().enumerate() {
            if prefix.is_empty() {
                return Err(CliError::Config("an environment prefix cannot be empty".into()));
            }
            if let Some(other) = self.env_prefixes[..i]
                .iter()
                .find(|p| p.starts_with(prefix.as_str()) || prefix.starts_with(p.as_str()))
            {
                return Err(CliError::Config(format!(
                    "environment prefix '{prefix}' overlaps with '{other}'"
                )));
            }
        }

        let mut groups = HashSet::new();
        for group in &self.groups {
            validate_group_name(&group.name).map_err(CliError::Config)?;
            if !groups.insert(group.name.as_str()) {
                return Err(CliError::Config(format!(
                    "group '{}' is described twice",
                    group.name
                )));
            }
        }

        if matches!(&self.terminal_param, Some(t) if t.is_empty()) {
            return Err(CliError::Config("the terminal parameter cannot be empty".into()));
        }
        Ok(())
    }

    /// Registers everything in the schema into a set built from `builder`.
    pub fn build(&self, mut builder: ParamSetBuilder) -> Result<ParameterSet, CliError> {
        if let Some(program) = &self.program {
            builder = builder.program_name(program);
        }
        if let Some(terminal) = &self.terminal_param {
            builder = builder.terminal_param(terminal);
        }
        let mut ps = builder.build();

        for group in &self.groups {
            ps.add_group(&group.name, &group.description);
        }
        for prefix in &self.env_prefixes {
            ps.add_env_prefix(prefix);
        }
        for entry in &self.config_files {
            let strictness = if entry.strict {
                Strictness::ParamMustExist
            } else {
                Strictness::ParamNeedNotExist
            };
            ps.add_config_file(&entry.path, entry.existence.into(), strictness);
        }

        for param in &self.parameters {
            if param.kind == ParamType::ConfigFile {
                ps.add_config_file_param(&param.name, &param.description);
                continue;
            }
            let setter = param.setter()?;
            let mut attrs = Attributes::new();
            for attr in &param.attributes {
                attrs = match attr {
                    AttributeName::CommandLineOnly => attrs.command_line_only(),
                    AttributeName::MustBeSet => attrs.must_be_set(),
                    AttributeName::SetOnlyOnce => attrs.set_only_once(),
                    AttributeName::DontShowInStdUsage => attrs.dont_show_in_std_usage(),
                };
            }
            let mut opts = NamedOpts::new()
                .alt_names(param.alt_names.iter().cloned())
                .attrs(attrs);
            if let Some(group) = &param.group {
                opts = opts.group(group.clone());
            }
            for other in &param.see_also {
                opts = opts.see_also(other.clone());
            }
            ps.add_named(&param.name, setter, &param.description, opts);
        }

        for group in &self.groups {
            for entry in &group.config_files {
                ps.add_group_config_file(&group.name, &entry.path, entry.existence.into());
            }
        }

        for pos in &self.positional {
            let setter = pos.setter()?;
            let opts = if pos.terminal {
                PositionalOpts::new().terminal()
            } else {
                PositionalOpts::new()
            };
            ps.add_positional(&pos.name, setter, &pos.description, opts);
        }

        Ok(ps)
    }
}

fn validate_type(name: &str, param: &ParamSpec) -> Result<(), CliError> {
    let is_enum = matches!(param.kind, ParamType::Enum | ParamType::EnumList);
    if is_enum {
        if param.allowed.len() < 2 {
            return Err(CliError::Config(format!(
                "parameter '{name}' needs at least two allowed values"
            )));
        }
        if param.allowed.keys().any(String::is_empty) {
            return Err(CliError::Config(format!(
                "parameter '{name}' has an empty allowed value"
            )));
        }
    } else if !param.allowed.is_empty() {
        return Err(CliError::Config(format!(
            "parameter '{name}' is not an enumeration but lists allowed values"
        )));
    }

    if matches!(&param.separator, Some(s) if s.is_empty()) {
        return Err(CliError::Config(format!(
            "parameter '{name}' has an empty separator"
        )));
    }
    if let (Some(lo), Some(hi)) = (param.min, param.max) {
        if lo > hi {
            return Err(CliError::Config(format!(
                "parameter '{name}': min {lo} is above max {hi}"
            )));
        }
    }
    if param.kind == ParamType::ConfigFile && param.default.is_some() {
        return Err(CliError::Config(format!(
            "config-file parameter '{name}' cannot have a default"
        )));
    }
    Ok(())
}

impl ParamSpec {
    fn setter(&self) -> Result<Box<dyn Setter>, CliError> {
        make_setter(self)
    }
}

impl PositionalSpec {
    fn setter(&self) -> Result<Box<dyn Setter>, CliError> {
        make_setter(&ParamSpec {
            name: self.name.clone(),
            kind: self.kind,
            alt_names: Vec::new(),
            description: self.description.clone(),
            group: None,
            default: None,
            allowed: BTreeMap::new(),
            separator: None,
            min: None,
            max: None,
            existence: PathExistence::Optional,
            file_kind: PathKind::Any,
            inverted: false,
            attributes: Vec::new(),
            see_also: Vec::new(),
        })
    }
}

fn make_setter(spec: &ParamSpec) -> Result<Box<dyn Setter>, CliError> {
    let name = spec.name.as_str();
    let sep = spec.separator.as_deref().unwrap_or(",");
    let mut setter: Box<dyn Setter> = match spec.kind {
        ParamType::Bool => {
            let value = Binding::new(false);
            if spec.inverted {
                Box::new(BoolSetter::inverted(&value))
            } else {
                Box::new(BoolSetter::new(&value))
            }
        }
        ParamType::Int => {
            let mut setter = IntSetter::new(&Binding::new(0));
            match (spec.min, spec.max) {
                (Some(lo), Some(hi)) => setter = setter.with_check(checks::between(lo, hi)),
                (Some(lo), None) => setter = setter.with_check(checks::ge(lo)),
                (None, Some(hi)) => setter = setter.with_check(checks::le(hi)),
                (None, None) => {}
            }
            Box::new(setter)
        }
        ParamType::Float => Box::new(FloatSetter::new(&Binding::new(0.0))),
        ParamType::String => Box::new(StringSetter::new(&Binding::new(String::new()))),
        ParamType::Enum => {
            let initial = spec
                .default
                .clone()
                .or_else(|| spec.allowed.keys().next().cloned())
                .unwrap_or_default();
            if !spec.allowed.contains_key(&initial) {
                return Err(CliError::Config(format!(
                    "parameter '{name}': default '{initial}' is not an allowed value"
                )));
            }
            // the initial value is already in place
            return Ok(Box::new(EnumSetter::new(
                &Binding::new(initial),
                spec.allowed.clone(),
            )));
        }
        ParamType::EnumList => Box::new(
            EnumListSetter::new(&Binding::new(Vec::new()), spec.allowed.clone())
                .with_separator(sep),
        ),
        ParamType::List => Box::new(
            ListSetter::<String>::new(&Binding::new(Vec::new())).with_separator(sep),
        ),
        ParamType::IntList => {
            Box::new(ListSetter::<i64>::new(&Binding::new(Vec::new())).with_separator(sep))
        }
        ParamType::Map => {
            Box::new(MapSetter::new(&Binding::new(BTreeMap::new())).with_separator(sep))
        }
        ParamType::Duration => Box::new(DurationSetter::new(&Binding::new(Duration::ZERO))),
        ParamType::Time => {
            Box::new(TimeSetter::new(&Binding::new(DateTime::<FixedOffset>::default())))
        }
        ParamType::Pathname => {
            Box::new(
                PathnameSetter::new(&Binding::new(PathBuf::new()))
                    .with_existence(spec.existence.into(), spec.file_kind.into()),
            )
        }
        ParamType::Nil => Box::new(NilSetter),
        ParamType::ConfigFile => {
            return Err(CliError::Config(format!(
                "parameter '{name}': config-file parameters are registered separately"
            )))
        }
    };

    if let Some(default) = &spec.default {
        let result = if setter.value_req() == ValueReq::None {
            Err(format!("parameter '{name}' takes no value, so it cannot have a default"))
        } else {
            setter
                .set_with_val(name, default)
                .map_err(|e| format!("parameter '{name}': bad default: {e}"))
        };
        result.map_err(CliError::Config)?;
    }
    Ok(setter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Schema {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_minimal_schema() {
        let schema = parse("parameters:\n  - name: a\n    type: int\n");
        assert_eq!(schema.parameters.len(), 1);
        assert_eq!(schema.parameters[0].kind, ParamType::Int);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Schema, _> = serde_yaml::from_str("colour: red\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let schema = parse(
            "parameters:\n  - {name: a, type: int, alt-names: [x]}\n  - {name: x, type: bool}\n",
        );
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("used twice"));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_enum_needs_two_values() {
        let schema = parse("parameters:\n  - {name: f, type: enum, allowed: {a: A}}\n");
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_overlapping_prefixes_rejected() {
        let schema = parse("env-prefixes: [AB_, AB_C_]\n");
        assert!(schema.validate().unwrap_err().to_string().contains("overlaps"));
    }

    #[test]
    fn test_terminal_positional_rules() {
        let schema = parse(
            "positional:\n  - {name: a, type: string, terminal: true}\n  - {name: b, type: string}\n",
        );
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_bad_default_is_config_error() {
        let schema = parse("parameters:\n  - {name: n, type: int, default: lots}\n");
        let err = schema.build(ParameterSet::builder()).unwrap_err();
        assert!(err.to_string().contains("bad default"));
    }

    #[test]
    fn test_build_applies_defaults_and_attributes() {
        let schema = parse(
            "program: demo\nparameters:\n  - name: n\n    type: int\n    default: \"5\"\n    attributes: [must-be-set]\n  - name: mode\n    type: enum\n    allowed: {fast: quick, slow: careful}\n    default: slow\n",
        );
        schema.validate().unwrap();
        let ps = schema.build(ParameterSet::builder()).unwrap();

        assert_eq!(ps.program_name(), "demo");
        let n = ps.named_param("n").unwrap();
        assert_eq!(n.initial_value(), Some("5"));
        assert!(n.attributes().is_must_be_set());
        assert_eq!(ps.named_param("mode").unwrap().current_value().as_deref(), Some("slow"));
    }

    #[test]
    fn test_relative_config_paths_rebased() {
        let mut schema = parse("config-files:\n  - path: a.cfg\n  - path: /abs/b.cfg\n");
        schema.rebase(Path::new("/schemas"));
        assert_eq!(schema.config_files[0].path, PathBuf::from("/schemas/a.cfg"));
        assert_eq!(schema.config_files[1].path, PathBuf::from("/abs/b.cfg"));
        assert!(schema.config_files[0].strict);
        assert_eq!(schema.config_files[0].existence, ConfigExistence::Optional);
    }
}
