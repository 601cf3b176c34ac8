//! Source readers.
//!
//! Each reader turns its input into `(name, optional value, location)`
//! assignments; the resolution pipeline decides what they mean.
//!
//! # Precedence
//!
//! Sources are read lowest priority first, so later ones overwrite earlier
//! ones (unless a parameter is `SetOnlyOnce`):
//!
//! 1. Group config files
//! 2. Global config files
//! 3. Environment variables with a registered prefix
//! 4. The argument list

pub(crate) mod args;
pub mod config_file;
pub mod environment;

use crate::location::Location;

pub use config_file::{ConfigFileSpec, Strictness};
pub use environment::{EnvSource, MapEnv, ProcessEnv};

/// A name, an optional value and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The parameter name as written (without dashes).
    pub name: String,
    /// The value, if one was given.
    pub value: Option<String>,
    /// Where it came from.
    pub location: Location,
}
