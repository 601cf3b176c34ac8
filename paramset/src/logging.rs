//! Logging for the paramset library.
//!
//! Resolution traces its decisions (skipped files, set-once skips, unused
//! names) through the `log` facade. The [`Logger`] here is what the
//! reporting error handlers write the final error report with.

use std::env;
use std::fmt;

use crate::error::ErrMap;
use crate::location::Location;

/// Environment variable consulted by [`init_logger`].
pub const LOG_MODE_VAR: &str = "PARAMSET_LOG_MODE";

/// How much a [`Logger`] prints.
///
/// # Examples
///
/// ```
/// use paramset::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Nothing, not even the error report.
    Quiet,
    /// The error report and warnings.
    Normal,
    /// Also progress notes such as the number of arguments resolved.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a level name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error naming `s` if it is not `quiet`, `normal` or
    /// `verbose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramset::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("{LOG_MODE_VAR}: unknown level '{s}'")),
        }
    }
}

/// Writes diagnostics to stderr, filtered by [`LogLevel`].
///
/// # Examples
///
/// ```
/// use paramset::{Error, ErrMap, Logger, LogLevel};
///
/// let mut errors = ErrMap::new();
/// errors.add("count", Error::MustBeSet { name: "count".into() });
///
/// let lines = Logger::report_lines("mytool", &errors);
/// assert_eq!(lines, vec!["mytool: 'count' must be set somewhere".to_string()]);
///
/// Logger::new(LogLevel::Quiet).report("mytool", &errors); // prints nothing
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger printing at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs an error message unless the level is Quiet.
    pub fn error(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("ERROR: {message}");
        }
    }

    /// Logs a warning message unless the level is Quiet.
    pub fn warn(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("WARN: {message}");
        }
    }

    /// Logs an informational message at Verbose level.
    pub fn info(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("INFO: {message}");
        }
    }

    /// Prints the error report for `program`: one line per error and, when
    /// there is more than one, a closing count.
    pub fn report(&self, program: &str, errors: &ErrMap) {
        if self.level < LogLevel::Normal || errors.is_empty() {
            return;
        }
        for line in Self::report_lines(program, errors) {
            eprintln!("{line}");
        }
        let total = errors.len();
        if total > 1 {
            self.info(&format!("{program}: {total} errors"));
        }
    }

    /// The lines [`report`](Self::report) prints, in the order a reader
    /// meets the inputs.
    ///
    /// Errors tied to a location (a config file line, a variable, an
    /// argument) come first, ordered by that location's source and
    /// position, so a file's problems read top to bottom. Errors with no
    /// location follow in name order.
    #[must_use]
    pub fn report_lines(program: &str, errors: &ErrMap) -> Vec<String> {
        let mut located = Vec::new();
        let mut unlocated = Vec::new();
        for (_, errs) in errors.iter() {
            for err in errs {
                match err.location() {
                    Some(loc) => located.push((loc, err)),
                    None => unlocated.push(err),
                }
            }
        }
        located.sort_by_cached_key(|(loc, _)| reading_order(loc));

        located
            .into_iter()
            .map(|(_, err)| err)
            .chain(unlocated)
            .map(|err| format!("{program}: {err}"))
            .collect()
    }
}

/// Sort key following resolution order: config files by path and line,
/// then variables by name, then arguments by position.
fn reading_order(loc: &Location) -> (u8, String, usize) {
    match loc {
        Location::ConfigFile { path, line } => (0, path.display().to_string(), *line),
        Location::Environment { variable } => (1, variable.clone(), 0),
        Location::CommandLine { index, .. } | Location::Supplied { index, .. } => {
            (2, String::new(), *index)
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

/// Initializes a logger from CLI flags and the environment.
///
/// Priority: `verbose`, then `quiet`, then [`LOG_MODE_VAR`], then Normal.
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    if let Ok(env_value) = env::var(LOG_MODE_VAR) {
        if let Ok(level) = LogLevel::parse(&env_value) {
            return Logger::new(level);
        }
    }

    Logger::new(LogLevel::Normal)
}
