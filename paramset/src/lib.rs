#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # paramset
//!
//! Parameter registration and multi-source value resolution for
//! command-line programs.
//!
//! A program registers its parameters in a [`ParameterSet`], each with a
//! [`Setter`](setter::Setter) that writes into a [`Binding`] the program
//! keeps. One call to [`ParameterSet::parse`] then reads, lowest priority
//! first, group config files, global config files, prefixed environment
//! variables and the argument list. Every user error is collected in an
//! [`ErrMap`] instead of stopping resolution, and every successful
//! assignment is recorded with its [`Location`].
//!
//! ## Core Types
//!
//! - [`ParameterSet`] and [`ParamSetBuilder`]: registration and resolution
//! - [`Binding`]: the shared cell a setter writes into
//! - [`NamedOpts`], [`PositionalOpts`] and [`Attributes`]: registration options
//! - [`Error`], [`SetterError`] and [`ErrMap`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use paramset::resolve::IgnoreErrors;
//! use paramset::setter::{IntSetter, StringSetter};
//! use paramset::source::MapEnv;
//! use paramset::{Attributes, Binding, NamedOpts, ParameterSet};
//!
//! let port = Binding::new(8080_i64);
//! let host = Binding::new(String::from("localhost"));
//!
//! let mut ps = ParameterSet::builder()
//!     .program_name("server")
//!     .error_handler(IgnoreErrors)
//!     .env_source(MapEnv::new([("SRV_host", "example.org")]))
//!     .build();
//! ps.add_env_prefix("SRV_");
//! ps.add_named("port", IntSetter::new(&port), "listen port", NamedOpts::new());
//! ps.add_named(
//!     "host",
//!     StringSetter::new(&host),
//!     "host name",
//!     NamedOpts::new().attrs(Attributes::new().must_be_set()),
//! );
//!
//! assert!(ps.parse(["-port=9000"]).is_empty());
//! assert_eq!(port.get(), 9000);
//! assert_eq!(host.get(), "example.org");
//! ```

pub mod attributes;
pub mod binding;
pub mod error;
pub mod filecheck;
pub mod location;
pub mod logging;
pub mod param;
pub mod param_set;
pub mod resolve;
pub mod setter;
pub mod source;

mod suggest;

// Re-export key types at crate root for convenience
pub use attributes::Attributes;
pub use binding::Binding;
pub use error::{ErrMap, Error, Result, SetterError};
pub use filecheck::{Existence, FileKind};
pub use location::{ArgSource, Location, Source};
pub use logging::{init_logger, LogLevel, Logger};
pub use param::{
    Group, NamedOpts, NamedParameter, PositionalOpts, PositionalParameter, DEFAULT_GROUP,
};
pub use param_set::{FinalCheck, ParamSetBuilder, ParameterSet, DEFAULT_TERMINAL_PARAM};
pub use source::{ConfigFileSpec, Strictness};
