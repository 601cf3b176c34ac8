//! Error types for the paramset library.
//!
//! Two classes of failure exist. Mistakes in the way a program registers its
//! parameters are programmer errors and panic at registration time. Problems
//! with the values a user supplies are collected as [`Error`] values in an
//! [`ErrMap`] so that every one of them can be reported together once
//! resolution has finished.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::location::Location;

/// Result type alias for fallible library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A user-input error found while resolving parameter values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A name that is not registered, from a source where that matters.
    #[error("{location}: '{name}' is not a parameter of this program{}", suggest(.suggestions))]
    UnknownParameter {
        /// The name as given.
        name: String,
        /// Close registered names, best first.
        suggestions: Vec<String>,
        /// Where the name appeared.
        location: Location,
    },

    /// A group config file set a parameter belonging to another group.
    #[error("{location}: '{name}' is not a member of group {group}")]
    NotGroupMember {
        /// The parameter name as given.
        name: String,
        /// The group whose config file was being read.
        group: String,
        /// Where the name appeared.
        location: Location,
    },

    /// A command-line-only parameter was set from a file or the environment.
    #[error("{location}: '{name}' can only be set on the command line")]
    CommandLineOnly {
        /// The parameter name as given.
        name: String,
        /// Where the assignment appeared.
        location: Location,
    },

    /// A parameter needing a value was given none.
    #[error("{location}: '{name}' needs a value but none was given")]
    MissingValue {
        /// The parameter name as given.
        name: String,
        /// Where the parameter appeared.
        location: Location,
    },

    /// A parameter taking no value was given one.
    #[error("{location}: '{name}' takes no value but '{value}' was given")]
    UnexpectedValue {
        /// The parameter name as given.
        name: String,
        /// The value that was supplied.
        value: String,
        /// Where the assignment appeared.
        location: Location,
    },

    /// The parameter's setter rejected the value.
    #[error("{location}: bad value for '{name}': {source}")]
    BadValue {
        /// The parameter name as given.
        name: String,
        /// Where the assignment appeared.
        location: Location,
        /// The setter's reason.
        #[source]
        source: SetterError,
    },

    /// Fewer arguments than registered positional parameters.
    #[error("{}missing {count} positional parameter{}: {}",
        location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default(),
        if *.count == 1 { "" } else { "s" },
        .names.join(", "))]
    MissingPositional {
        /// How many were missing.
        count: usize,
        /// The names of the missing parameters, in index order.
        names: Vec<String>,
        /// The last argument present, if any.
        location: Option<Location>,
    },

    /// A named-parameter argument did not start with `-`.
    #[error("{location}: '{token}' does not start with '-'")]
    MissingDash {
        /// The argument as given.
        token: String,
        /// Where the argument appeared.
        location: Location,
    },

    /// A `MustBeSet` parameter was never given a value.
    #[error("'{name}' must be set somewhere")]
    MustBeSet {
        /// The parameter's principal name.
        name: String,
    },

    /// A final check reported a problem.
    #[error("final check failed: {message}")]
    FinalCheck {
        /// The check's message.
        message: String,
    },

    /// A post action reported a problem.
    #[error("{location}: action for '{name}' failed: {message}")]
    PostAction {
        /// The parameter name as given.
        name: String,
        /// Where the assignment appeared.
        location: Location,
        /// The action's message.
        message: String,
    },

    /// A config file could not be read.
    #[error("cannot read config file {}: {reason}", path.display())]
    ConfigFileIo {
        /// The file that failed.
        path: PathBuf,
        /// The underlying reason.
        reason: String,
    },

    /// A config file line could not be interpreted.
    #[error("{location}: {reason}")]
    BadConfigLine {
        /// Where the line is.
        location: Location,
        /// What is wrong with it.
        reason: String,
    },

    /// The same config file was named more than once.
    #[error("config file {} has already been given", path.display())]
    DuplicateConfigFile {
        /// The repeated file.
        path: PathBuf,
        /// Where the repeat was supplied, if from an input.
        location: Option<Location>,
    },

    /// Arguments were left over and nothing expected them.
    #[error("{}unexpected additional arguments: {}",
        location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default(),
        .args.join(" "))]
    UnexpectedRemainder {
        /// The unconsumed arguments.
        args: Vec<String>,
        /// Where the remainder starts.
        location: Option<Location>,
    },

    /// Resolution was requested a second time.
    #[error("parameters have already been parsed (first parsed at {first_call})")]
    AlreadyParsed {
        /// Source position of the first call.
        first_call: String,
    },
}

fn suggest(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

impl Error {
    /// Returns the location this error is tied to, if any.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::UnknownParameter { location, .. }
            | Self::NotGroupMember { location, .. }
            | Self::CommandLineOnly { location, .. }
            | Self::MissingValue { location, .. }
            | Self::UnexpectedValue { location, .. }
            | Self::BadValue { location, .. }
            | Self::MissingDash { location, .. }
            | Self::PostAction { location, .. }
            | Self::BadConfigLine { location, .. } => Some(location),
            Self::MissingPositional { location, .. }
            | Self::DuplicateConfigFile { location, .. }
            | Self::UnexpectedRemainder { location, .. } => location.as_ref(),
            Self::MustBeSet { .. }
            | Self::FinalCheck { .. }
            | Self::ConfigFileIo { .. }
            | Self::AlreadyParsed { .. } => None,
        }
    }
}

/// Why a setter refused a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetterError {
    /// The text could not be parsed as the setter's type.
    #[error("'{value}' is not a valid {kind}: {reason}")]
    InvalidSyntax {
        /// The offending text.
        value: String,
        /// What was expected, e.g. "integer".
        kind: String,
        /// The parser's message.
        reason: String,
    },

    /// The parsed value failed one of the setter's checks.
    #[error("'{value}' failed a check: {reason}")]
    CheckFailed {
        /// The offending text.
        value: String,
        /// The check's message.
        reason: String,
    },

    /// The value is not one of an enumerated set.
    #[error("'{value}' is not an allowed value (allowed: {allowed})")]
    NotAllowed {
        /// The offending text.
        value: String,
        /// The allowed values, comma-separated.
        allowed: String,
    },

    /// The setter needs a value and was triggered without one.
    #[error("a value must be given")]
    ValueRequired,

    /// The setter takes no value and was given one.
    #[error("no value may be given")]
    ValueForbidden,
}

/// Errors collected during resolution, keyed by parameter name.
///
/// Set-wide errors (I/O failures, final checks, leftover arguments) are
/// stored under the empty name. Entries are only ever appended.
///
/// # Examples
///
/// ```
/// use paramset::{ErrMap, Error};
///
/// let mut errs = ErrMap::new();
/// errs.add("count", Error::MustBeSet { name: "count".into() });
/// assert_eq!(errs.len(), 1);
/// assert_eq!(errs.get("count").len(), 1);
/// assert!(errs.get("other").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrMap {
    errors: BTreeMap<String, Vec<Error>>,
}

impl ErrMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error under `name`.
    pub fn add(&mut self, name: impl Into<String>, err: Error) {
        self.errors.entry(name.into()).or_default().push(err);
    }

    /// Total number of errors across all names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Returns `true` if no errors have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The errors recorded under `name`, oldest first.
    #[must_use]
    pub fn get(&self, name: &str) -> &[Error] {
        self.errors.get(name).map_or(&[], Vec::as_slice)
    }

    /// The names that have errors, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Iterates over `(name, errors)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Error])> {
        self.errors
            .iter()
            .map(|(name, errs)| (name.as_str(), errs.as_slice()))
    }
}

impl fmt::Display for ErrMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.len();
        writeln!(f, "{total} error{}:", if total == 1 { "" } else { "s" })?;
        for (name, errs) in self.iter() {
            let label = if name.is_empty() { "general" } else { name };
            for err in errs {
                writeln!(f, "  {label}: {err}")?;
            }
        }
        Ok(())
    }
}
