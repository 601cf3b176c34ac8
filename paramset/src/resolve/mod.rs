//! Resolution: reading every source, in precedence order, into the
//! registered parameters.
//!
//! [`ParameterSet::parse`] runs these stages once:
//!
//! 1. group config files, each restricted to its group's members
//! 2. global config files, in the order added
//! 3. prefixed environment variables, in variable-name order
//! 4. the argument list, reading any config file it names in place
//! 5. `MustBeSet` and final checks
//! 6. the remainder handler, then the error handler
//!
//! Errors never stop resolution early (except for missing positional
//! parameters, which leave the argument list unread); they are collected
//! in the set's [`ErrMap`].

mod apply;
mod handlers;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ErrMap, Error};
use crate::filecheck::Existence;
use crate::location::{ArgSource, Location};
use crate::param_set::{ParameterSet, ParseState};
use crate::setter::ValueReq;
use crate::source::args::{ArgEvent, ArgTokenizer};
use crate::source::config_file::{self, ReadError};
use crate::source::{environment, Assignment, Strictness};

pub(crate) use apply::MatchRule;
pub use handlers::{
    AcceptRemainder, ErrorHandler, IgnoreErrors, RejectRemainder, RemainderHandler,
    ReportAndExit, ReportOnly, ERROR_EXIT_CODE,
};

impl ParameterSet {
    /// Resolves every source, taking arguments from `args`.
    ///
    /// Argument locations are reported as supplied arguments. Returns the
    /// collected errors after the error handler has seen them.
    ///
    /// A second call records [`Error::AlreadyParsed`] and does nothing else.
    ///
    /// # Panics
    ///
    /// Panics if a `see_also` name was never registered.
    #[track_caller]
    pub fn parse<I, S>(&mut self, args: I) -> &ErrMap
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let caller = std::panic::Location::caller().to_string();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.resolve(&caller, ArgSource::Supplied, &args)
    }

    /// Resolves every source, taking arguments from the process command
    /// line (program name excluded).
    ///
    /// # Panics
    ///
    /// As for [`parse`](Self::parse).
    #[track_caller]
    pub fn parse_command_line(&mut self) -> &ErrMap {
        let caller = std::panic::Location::caller().to_string();
        let args: Vec<String> = env::args_os()
            .skip(1)
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.resolve(&caller, ArgSource::CommandLine, &args)
    }

    fn resolve(&mut self, caller: &str, kind: ArgSource, args: &[String]) -> &ErrMap {
        if let ParseState::Parsed { first_call } = &self.state {
            let err = Error::AlreadyParsed {
                first_call: first_call.clone(),
            };
            self.errors.add("", err);
            self.error_handler.handle(&self.program_name, &self.errors);
            return &self.errors;
        }
        self.state = ParseState::Parsed {
            first_call: caller.to_string(),
        };
        log::debug!("{}: resolving parameters (from {caller})", self.program_name);

        self.check_see_also();
        self.read_group_config_files();
        self.read_global_config_files();
        self.read_environment();
        self.read_arguments(kind, args);
        self.check_must_be_set();
        self.run_final_checks();

        self.remainder_handler.handle(
            &self.remainder,
            self.remainder_start.as_ref(),
            &mut self.errors,
        );
        self.error_handler.handle(&self.program_name, &self.errors);
        &self.errors
    }

    fn check_see_also(&self) {
        for param in &self.named {
            for other in &param.see_also {
                assert!(
                    self.by_name.contains_key(other),
                    "parameter '{}' refers to unknown parameter '{other}'",
                    param.name()
                );
            }
        }
    }

    fn read_group_config_files(&mut self) {
        let files: Vec<(String, PathBuf, Existence)> = self
            .groups
            .values()
            .flat_map(|g| {
                g.config_files
                    .iter()
                    .map(|spec| (g.name.clone(), spec.path.clone(), spec.existence))
            })
            .collect();

        for (group, path, existence) in files {
            self.read_config_file(&path, existence, &MatchRule::Group(group));
        }
    }

    fn read_global_config_files(&mut self) {
        let files = self.config_files.clone();
        for spec in files {
            let rule = match spec.strictness {
                Strictness::ParamMustExist => MatchRule::Strict,
                Strictness::ParamNeedNotExist => MatchRule::Lenient,
            };
            self.read_config_file(&spec.path, spec.existence, &rule);
        }
    }

    fn read_config_file(&mut self, path: &Path, existence: Existence, rule: &MatchRule) {
        self.files_read.push(path.to_path_buf());
        let lines = match config_file::read_lines(path) {
            Ok(lines) => lines,
            Err(ReadError::Missing) if existence == Existence::Optional => {
                log::debug!("optional config file {} not found", path.display());
                return;
            }
            Err(ReadError::Missing) => {
                self.errors.add(
                    "",
                    Error::ConfigFileIo {
                        path: path.to_path_buf(),
                        reason: "the file does not exist".to_string(),
                    },
                );
                return;
            }
            Err(ReadError::Failed(err)) => {
                self.errors.add("", err);
                return;
            }
        };
        log::debug!("reading {} lines from {}", lines.len(), path.display());

        for line in lines {
            let entry = match config_file::parse_line(&line.text) {
                Ok(entry) => entry,
                Err(reason) => {
                    self.errors.add(
                        "",
                        Error::BadConfigLine {
                            location: line.location,
                            reason,
                        },
                    );
                    continue;
                }
            };

            let line_rule = match &entry.programs {
                None => rule.clone(),
                Some(programs) if programs.contains(&self.program_name) => {
                    rule.for_program_line()
                }
                Some(_) => {
                    self.unused
                        .entry(entry.name)
                        .or_default()
                        .push(line.location);
                    continue;
                }
            };

            self.apply(
                Assignment {
                    name: entry.name,
                    value: entry.value,
                    location: line.location,
                },
                &line_rule,
            );
        }
    }

    fn read_environment(&mut self) {
        for assignment in environment::assignments(self.env.as_ref(), &self.env_prefixes) {
            self.apply(assignment, &MatchRule::Lenient);
        }
    }

    fn read_arguments(&mut self, kind: ArgSource, args: &[String]) {
        let terminal_flags: Vec<bool> = self.positional.iter().map(|p| p.terminal).collect();
        let tokenized = {
            let named = &self.named;
            let by_name = &self.by_name;
            ArgTokenizer {
                kind,
                positional: &terminal_flags,
                terminal_param: &self.terminal_param,
                needs_value: |name: &str| {
                    by_name
                        .get(name)
                        .is_some_and(|&idx| named[idx].value_req() == ValueReq::Mandatory)
                },
            }
            .tokenize(args)
        };

        for event in tokenized.events {
            match event {
                ArgEvent::Positional {
                    index,
                    value,
                    location,
                } => self.set_positional(index, &value, location),
                ArgEvent::Named(assignment) => {
                    let location = assignment.location.clone();
                    self.apply(assignment, &MatchRule::CommandLine);
                    self.read_pending_config_files(&location);
                }
                ArgEvent::MissingPositional {
                    count,
                    first_missing,
                    location,
                } => {
                    let names: Vec<String> = self.positional[first_missing..]
                        .iter()
                        .map(|p| p.name.clone())
                        .collect();
                    self.errors.add(
                        names[0].clone(),
                        Error::MissingPositional {
                            count,
                            names,
                            location,
                        },
                    );
                }
                ArgEvent::MissingDash { token, location } => {
                    self.errors.add("", Error::MissingDash { token, location });
                }
            }
        }

        self.remainder = tokenized.remainder;
        self.remainder_start = tokenized.remainder_start;
    }

    fn read_pending_config_files(&mut self, location: &Location) {
        for path in self.pending_files.take() {
            if self.files_read.contains(&path) {
                self.errors.add(
                    "",
                    Error::DuplicateConfigFile {
                        path,
                        location: Some(location.clone()),
                    },
                );
                continue;
            }
            self.read_config_file(&path, Existence::MustExist, &MatchRule::Strict);
        }
    }

    fn check_must_be_set(&mut self) {
        for param in &self.named {
            if param.attributes.is_must_be_set() && !param.has_been_set() {
                self.errors.add(
                    param.name().to_string(),
                    Error::MustBeSet {
                        name: param.name().to_string(),
                    },
                );
            }
        }
    }

    fn run_final_checks(&mut self) {
        for check in &mut self.final_checks {
            if let Err(message) = check() {
                self.errors.add("", Error::FinalCheck { message });
            }
        }
    }
}
