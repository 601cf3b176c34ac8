//! Parameters, groups and the options used to register them.
//!
//! A [`NamedParameter`] is matched by `-name`/`--name` (or any alternate
//! name) in every source. A [`PositionalParameter`] is matched by its
//! position among the leading arguments. Named parameters belong to a
//! [`Group`]; groups may carry their own config files.

mod name;

use std::fmt;

use crate::attributes::Attributes;
use crate::location::Location;
use crate::setter::{Setter, ValueReq};
use crate::source::ConfigFileSpec;

pub use name::{validate_group_name, validate_param_name};

/// The group parameters join when no group is given.
pub const DEFAULT_GROUP: &str = "cmd";

/// An action run after each successful assignment.
///
/// Receives the location of the assignment and the name used. An `Err` is
/// recorded against the parameter.
pub type PostAction = Box<dyn FnMut(&Location, &str) -> Result<(), String>>;

/// Options for [`ParameterSet::add_named`](crate::ParameterSet::add_named).
///
/// # Examples
///
/// ```
/// use paramset::{Attributes, NamedOpts};
///
/// let opts = NamedOpts::new()
///     .alt_names(["v"])
///     .attrs(Attributes::new().command_line_only())
///     .group("output");
/// ```
#[derive(Default)]
pub struct NamedOpts {
    pub(crate) alt_names: Vec<String>,
    pub(crate) attributes: Attributes,
    pub(crate) group: Option<String>,
    pub(crate) post_actions: Vec<PostAction>,
    pub(crate) see_also: Vec<String>,
}

impl NamedOpts {
    /// No options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds alternate names the parameter also answers to.
    #[must_use]
    pub fn alt_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.alt_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the parameter's attributes.
    #[must_use]
    pub fn attrs(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Puts the parameter in `group` instead of [`DEFAULT_GROUP`].
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Adds an action to run after each successful assignment.
    #[must_use]
    pub fn post_action(
        mut self,
        action: impl FnMut(&Location, &str) -> Result<(), String> + 'static,
    ) -> Self {
        self.post_actions.push(Box::new(action));
        self
    }

    /// Names a related parameter, for help text.
    ///
    /// The name must be registered by the time parsing starts.
    #[must_use]
    pub fn see_also(mut self, name: impl Into<String>) -> Self {
        self.see_also.push(name.into());
        self
    }
}

/// Options for [`ParameterSet::add_positional`](crate::ParameterSet::add_positional).
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionalOpts {
    pub(crate) terminal: bool,
}

impl PositionalOpts {
    /// No options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every argument after this one becomes the remainder.
    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }
}

/// A flag-style parameter.
pub struct NamedParameter {
    pub(crate) names: Vec<String>,
    pub(crate) setter: Box<dyn Setter>,
    pub(crate) attributes: Attributes,
    pub(crate) group: String,
    pub(crate) description: String,
    pub(crate) where_set: Vec<Location>,
    pub(crate) initial_value: Option<String>,
    pub(crate) post_actions: Vec<PostAction>,
    pub(crate) see_also: Vec<String>,
}

impl NamedParameter {
    /// The principal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// Alternate names, in registration order.
    #[must_use]
    pub fn alt_names(&self) -> &[String] {
        &self.names[1..]
    }

    /// Every name, principal first.
    #[must_use]
    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    /// The help description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The owning group's name.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group
    }

    /// The attributes fixed at registration.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    /// Whether a value must, may or must not follow.
    #[must_use]
    pub fn value_req(&self) -> ValueReq {
        self.setter.value_req()
    }

    /// Description of the accepted values.
    #[must_use]
    pub fn allowed_values(&self) -> String {
        self.setter.allowed_values()
    }

    /// The value before resolution, if the setter can show it.
    #[must_use]
    pub fn initial_value(&self) -> Option<&str> {
        self.initial_value.as_deref()
    }

    /// The value now, if the setter can show it.
    #[must_use]
    pub fn current_value(&self) -> Option<String> {
        self.setter.current_value()
    }

    /// Every accepted assignment, oldest first.
    #[must_use]
    pub fn where_set(&self) -> &[Location] {
        &self.where_set
    }

    /// Returns `true` once any source has set the parameter.
    #[must_use]
    pub fn has_been_set(&self) -> bool {
        !self.where_set.is_empty()
    }

    /// Related parameter names.
    #[must_use]
    pub fn see_also(&self) -> &[String] {
        &self.see_also
    }
}

impl fmt::Debug for NamedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedParameter")
            .field("names", &self.names)
            .field("group", &self.group)
            .field("attributes", &self.attributes)
            .field("where_set", &self.where_set)
            .finish_non_exhaustive()
    }
}

/// A parameter identified by its position.
pub struct PositionalParameter {
    pub(crate) name: String,
    pub(crate) setter: Box<dyn Setter>,
    pub(crate) description: String,
    pub(crate) terminal: bool,
    pub(crate) index: usize,
}

impl PositionalParameter {
    /// The parameter's name, used in messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the arguments after this one form the remainder.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// 0-based position among the positional parameters.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Description of the accepted values.
    #[must_use]
    pub fn allowed_values(&self) -> String {
        self.setter.allowed_values()
    }

    /// The value now, if the setter can show it.
    #[must_use]
    pub fn current_value(&self) -> Option<String> {
        self.setter.current_value()
    }
}

impl fmt::Debug for PositionalParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionalParameter")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// A named collection of parameters, for help and group config files.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) members: Vec<String>,
    pub(crate) config_files: Vec<ConfigFileSpec>,
    pub(crate) described: bool,
}

impl Group {
    pub(crate) fn new(name: &str, description: &str, described: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            members: Vec::new(),
            config_files: Vec::new(),
            described,
        }
    }

    /// The group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group description (empty if never given).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Principal names of the member parameters, in registration order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Config files read for this group only.
    #[must_use]
    pub fn config_files(&self) -> &[ConfigFileSpec] {
        &self.config_files
    }
}
