//! Applying one assignment to the parameter it names.

use crate::error::Error;
use crate::location::Location;
use crate::param_set::ParameterSet;
use crate::setter::ValueReq;
use crate::source::Assignment;
use crate::suggest;

/// How a source treats names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MatchRule {
    /// The argument list: unknown names are errors, with suggestions.
    CommandLine,
    /// Unknown names are errors.
    Strict,
    /// Unknown names are recorded as unused.
    Lenient,
    /// Only members of the group may be set; unknown names are errors.
    Group(String),
}

impl MatchRule {
    /// The rule for a config line that names this program explicitly.
    pub(crate) fn for_program_line(&self) -> Self {
        match self {
            Self::Lenient => Self::Strict,
            other => other.clone(),
        }
    }
}

impl ParameterSet {
    pub(crate) fn apply(&mut self, assignment: Assignment, rule: &MatchRule) {
        let Some(&idx) = self.by_name.get(&assignment.name) else {
            self.unknown(assignment, rule);
            return;
        };

        if let MatchRule::Group(group) = rule {
            let param = &self.named[idx];
            if param.group != *group {
                self.errors.add(
                    param.name().to_string(),
                    Error::NotGroupMember {
                        name: assignment.name,
                        group: group.clone(),
                        location: assignment.location,
                    },
                );
                return;
            }
        }

        self.set_named(idx, &assignment.name, assignment.value.as_deref(), assignment.location);
    }

    fn unknown(&mut self, assignment: Assignment, rule: &MatchRule) {
        if *rule == MatchRule::Lenient {
            log::debug!(
                "{}: '{}' is not a parameter, recording as unused",
                assignment.location,
                assignment.name
            );
            self.unused
                .entry(assignment.name)
                .or_default()
                .push(assignment.location);
            return;
        }

        let suggestions = suggest::close_names(&assignment.name, self.by_name.keys());
        self.errors.add(
            assignment.name.clone(),
            Error::UnknownParameter {
                name: assignment.name,
                suggestions,
                location: assignment.location,
            },
        );
    }

    fn set_named(&mut self, idx: usize, used: &str, value: Option<&str>, location: Location) {
        let param = &mut self.named[idx];
        let key = param.name().to_string();

        if param.attributes.is_command_line_only() && !location.source().is_command_line() {
            self.errors.add(
                key,
                Error::CommandLineOnly {
                    name: used.to_string(),
                    location,
                },
            );
            return;
        }

        if param.attributes.is_set_only_once() && param.has_been_set() {
            log::debug!("{location}: '{key}' is already set, ignoring");
            return;
        }

        let result = match (param.setter.value_req(), value) {
            (ValueReq::None, Some(v)) => Err(Error::UnexpectedValue {
                name: used.to_string(),
                value: v.to_string(),
                location: location.clone(),
            }),
            (ValueReq::Mandatory, None) => Err(Error::MissingValue {
                name: used.to_string(),
                location: location.clone(),
            }),
            (_, Some(v)) => param.setter.set_with_val(used, v).map_err(|source| Error::BadValue {
                name: used.to_string(),
                location: location.clone(),
                source,
            }),
            (_, None) => param.setter.set(used).map_err(|source| Error::BadValue {
                name: used.to_string(),
                location: location.clone(),
                source,
            }),
        };

        if let Err(err) = result {
            self.errors.add(key, err);
            return;
        }

        log::debug!("{location}: set '{key}'");
        param.where_set.push(location.clone());
        for action in &mut param.post_actions {
            if let Err(message) = action(&location, used) {
                self.errors.add(
                    key.clone(),
                    Error::PostAction {
                        name: used.to_string(),
                        location: location.clone(),
                        message,
                    },
                );
            }
        }
    }

    pub(crate) fn set_positional(&mut self, index: usize, value: &str, location: Location) {
        let param = &mut self.positional[index];
        match param.setter.set_with_val(&param.name, value) {
            Ok(()) => log::debug!("{location}: set positional '{}'", param.name),
            Err(source) => self.errors.add(
                param.name.clone(),
                Error::BadValue {
                    name: param.name.clone(),
                    location,
                    source,
                },
            ),
        }
    }
}
