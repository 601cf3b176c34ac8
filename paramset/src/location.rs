//! Source locations attached to every assignment and every error.
//!
//! A [`Location`] records where a value came from so that errors can be
//! reported precisely and so that each parameter can keep an audit trail of
//! the places it was set.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// The kind of source a value was read from.
///
/// The `CommandLineOnly` attribute is checked against this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// The program's arguments or an explicitly supplied argument slice.
    CommandLine,
    /// A prefixed environment variable.
    Environment,
    /// A line in a configuration file.
    ConfigFile,
}

impl Source {
    /// Returns `true` for argument-list sources.
    #[must_use]
    pub const fn is_command_line(self) -> bool {
        matches!(self, Self::CommandLine)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line"),
            Self::Environment => write!(f, "environment"),
            Self::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Where a value (or an error) originated.
///
/// # Examples
///
/// ```
/// use paramset::{Location, Source};
/// use std::path::PathBuf;
///
/// let loc = Location::ConfigFile {
///     path: PathBuf::from("/etc/prog.cfg"),
///     line: 12,
/// };
/// assert_eq!(loc.source(), Source::ConfigFile);
/// assert_eq!(loc.to_string(), "config file /etc/prog.cfg:12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum Location {
    /// An argument taken from the process command line.
    CommandLine {
        /// 1-based position among the arguments (program name excluded).
        index: usize,
        /// The argument as given.
        token: String,
    },
    /// An argument from a slice supplied by the program itself.
    Supplied {
        /// 1-based position within the supplied arguments.
        index: usize,
        /// The argument as given.
        token: String,
    },
    /// An environment variable.
    Environment {
        /// The full variable name, prefix included.
        variable: String,
    },
    /// A configuration file line.
    ConfigFile {
        /// The file the line was read from.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
    },
}

impl Location {
    /// Returns the kind of source this location belongs to.
    #[must_use]
    pub const fn source(&self) -> Source {
        match self {
            Self::CommandLine { .. } | Self::Supplied { .. } => Source::CommandLine,
            Self::Environment { .. } => Source::Environment,
            Self::ConfigFile { .. } => Source::ConfigFile,
        }
    }

    /// Creates a location for an argument at `index` (1-based).
    #[must_use]
    pub fn argument(kind: ArgSource, index: usize, token: &str) -> Self {
        match kind {
            ArgSource::CommandLine => Self::CommandLine {
                index,
                token: token.to_string(),
            },
            ArgSource::Supplied => Self::Supplied {
                index,
                token: token.to_string(),
            },
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine { index, token } => {
                write!(f, "command line: argument {index} ({token})")
            }
            Self::Supplied { index, token } => {
                write!(f, "supplied arguments: argument {index} ({token})")
            }
            Self::Environment { variable } => write!(f, "environment variable {variable}"),
            Self::ConfigFile { path, line } => {
                write!(f, "config file {}:{line}", path.display())
            }
        }
    }
}

/// Where an argument list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSource {
    /// `std::env::args`, program name removed.
    CommandLine,
    /// Strings handed to [`ParameterSet::parse`](crate::ParameterSet::parse).
    Supplied,
}
