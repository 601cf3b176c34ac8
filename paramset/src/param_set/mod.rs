//! The parameter set: registration, resolution state and introspection.
//!
//! A [`ParameterSet`] goes through two phases. While registering, the
//! program adds parameters, groups, config files and environment prefixes.
//! A single call to [`parse`](ParameterSet::parse) or
//! [`parse_command_line`](ParameterSet::parse_command_line) then resolves
//! every source; after that the set is read-only apart from the audit data.

mod builder;
mod registry;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

use crate::binding::Binding;
use crate::error::ErrMap;
use crate::location::Location;
use crate::param::{Group, NamedParameter, PositionalParameter};
use crate::resolve::{ErrorHandler, RemainderHandler};
use crate::source::{ConfigFileSpec, EnvSource};

pub use builder::{ParamSetBuilder, DEFAULT_TERMINAL_PARAM};

/// A check run after every source has been read.
///
/// An `Err` is recorded as a set-wide error.
pub type FinalCheck = Box<dyn FnMut() -> Result<(), String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseState {
    Registering,
    Parsed { first_call: String },
}

/// Every parameter a program accepts and the outcome of resolving them.
///
/// # Examples
///
/// ```
/// use paramset::resolve::IgnoreErrors;
/// use paramset::setter::{BoolSetter, IntSetter};
/// use paramset::{Binding, NamedOpts, ParameterSet};
///
/// let count = Binding::new(1_i64);
/// let verbose = Binding::new(false);
///
/// let mut ps = ParameterSet::builder()
///     .program_name("demo")
///     .error_handler(IgnoreErrors)
///     .build();
/// ps.add_named("count", IntSetter::new(&count), "how many", NamedOpts::new());
/// ps.add_named("v", BoolSetter::new(&verbose), "talk more", NamedOpts::new());
///
/// let errors = ps.parse(["-count", "3", "-v"]);
/// assert!(errors.is_empty());
/// assert_eq!(count.get(), 3);
/// assert!(verbose.get());
/// ```
pub struct ParameterSet {
    pub(crate) program_name: String,
    pub(crate) terminal_param: String,
    pub(crate) named: Vec<NamedParameter>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) positional: Vec<PositionalParameter>,
    pub(crate) groups: BTreeMap<String, Group>,
    pub(crate) config_files: Vec<ConfigFileSpec>,
    pub(crate) env_prefixes: Vec<String>,
    pub(crate) final_checks: Vec<FinalCheck>,
    pub(crate) errors: ErrMap,
    pub(crate) unused: BTreeMap<String, Vec<Location>>,
    pub(crate) remainder: Vec<String>,
    pub(crate) remainder_start: Option<Location>,
    pub(crate) state: ParseState,
    pub(crate) error_handler: Box<dyn ErrorHandler>,
    pub(crate) remainder_handler: Box<dyn RemainderHandler>,
    pub(crate) env: Box<dyn EnvSource>,
    pub(crate) pending_files: Binding<Vec<PathBuf>>,
    pub(crate) files_read: Vec<PathBuf>,
}

impl ParameterSet {
    /// Returns a builder for configuring a new set.
    pub fn builder() -> ParamSetBuilder {
        ParamSetBuilder::default()
    }

    /// Creates a set with the default handlers and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub(crate) fn from_parts(
        program_name: String,
        terminal_param: String,
        error_handler: Box<dyn ErrorHandler>,
        remainder_handler: Box<dyn RemainderHandler>,
        env: Box<dyn EnvSource>,
    ) -> Self {
        Self {
            program_name,
            terminal_param,
            named: Vec::new(),
            by_name: HashMap::new(),
            positional: Vec::new(),
            groups: BTreeMap::new(),
            config_files: Vec::new(),
            env_prefixes: Vec::new(),
            final_checks: Vec::new(),
            errors: ErrMap::new(),
            unused: BTreeMap::new(),
            remainder: Vec::new(),
            remainder_start: None,
            state: ParseState::Registering,
            error_handler,
            remainder_handler,
            env,
            pending_files: Binding::default(),
            files_read: Vec::new(),
        }
    }

    /// The name matched against program lists in config files.
    #[must_use]
    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// The argument that ends named-parameter processing.
    #[must_use]
    pub fn terminal_param(&self) -> &str {
        &self.terminal_param
    }

    /// Returns `true` once a parse has been attempted.
    #[must_use]
    pub fn has_been_parsed(&self) -> bool {
        matches!(self.state, ParseState::Parsed { .. })
    }

    /// Named parameters, in registration order.
    pub fn named_params(&self) -> impl Iterator<Item = &NamedParameter> {
        self.named.iter()
    }

    /// Looks a named parameter up by any of its names.
    #[must_use]
    pub fn named_param(&self, name: &str) -> Option<&NamedParameter> {
        self.by_name.get(name).map(|&idx| &self.named[idx])
    }

    /// Positional parameters, in index order.
    #[must_use]
    pub fn positional_params(&self) -> &[PositionalParameter] {
        &self.positional
    }

    /// Groups, in name order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Looks a group up by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Global config files, in reading order.
    #[must_use]
    pub fn config_files(&self) -> &[ConfigFileSpec] {
        &self.config_files
    }

    /// Environment prefixes, in registration order.
    #[must_use]
    pub fn env_prefixes(&self) -> &[String] {
        &self.env_prefixes
    }

    /// Every error recorded so far.
    #[must_use]
    pub fn errors(&self) -> &ErrMap {
        &self.errors
    }

    /// Names seen in lenient sources that match no parameter, with every
    /// place each was seen.
    #[must_use]
    pub fn unused(&self) -> &BTreeMap<String, Vec<Location>> {
        &self.unused
    }

    /// Arguments left after named-parameter processing ended.
    #[must_use]
    pub fn remainder(&self) -> &[String] {
        &self.remainder
    }

    /// Where the remainder starts, if it is not empty.
    #[must_use]
    pub fn remainder_start(&self) -> Option<&Location> {
        self.remainder_start.as_ref()
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSet")
            .field("program_name", &self.program_name)
            .field("named", &self.named)
            .field("positional", &self.positional)
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("errors", &self.errors.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
