//! What happens to errors and leftover arguments once resolution is done.

use std::process;

use crate::error::{ErrMap, Error};
use crate::location::Location;
use crate::logging::Logger;

/// Exit status used by [`ReportAndExit`].
pub const ERROR_EXIT_CODE: i32 = 1;

/// Called once at the end of resolution with every collected error.
pub trait ErrorHandler {
    /// Handles the errors for the program called `program`.
    fn handle(&mut self, program: &str, errors: &ErrMap);
}

impl<F: FnMut(&str, &ErrMap)> ErrorHandler for F {
    fn handle(&mut self, program: &str, errors: &ErrMap) {
        self(program, errors);
    }
}

/// Prints every error and exits with [`ERROR_EXIT_CODE`] if there were any.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportAndExit {
    logger: Logger,
}

impl ReportAndExit {
    /// Reports through `logger`.
    #[must_use]
    pub const fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl ErrorHandler for ReportAndExit {
    fn handle(&mut self, program: &str, errors: &ErrMap) {
        if errors.is_empty() {
            return;
        }
        self.logger.report(program, errors);
        process::exit(ERROR_EXIT_CODE);
    }
}

/// Prints every error and returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportOnly {
    logger: Logger,
}

impl ReportOnly {
    /// Reports through `logger`.
    #[must_use]
    pub const fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl ErrorHandler for ReportOnly {
    fn handle(&mut self, program: &str, errors: &ErrMap) {
        self.logger.report(program, errors);
    }
}

/// Does nothing; the caller inspects the returned [`ErrMap`].
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreErrors;

impl ErrorHandler for IgnoreErrors {
    fn handle(&mut self, _program: &str, _errors: &ErrMap) {}
}

/// Called once at the end of resolution with the unconsumed arguments.
///
/// Runs before the [`ErrorHandler`], so anything it records is reported.
pub trait RemainderHandler {
    /// Handles `remainder`, which starts at `start` when non-empty.
    fn handle(&mut self, remainder: &[String], start: Option<&Location>, errors: &mut ErrMap);
}

impl<F: FnMut(&[String], Option<&Location>, &mut ErrMap)> RemainderHandler for F {
    fn handle(&mut self, remainder: &[String], start: Option<&Location>, errors: &mut ErrMap) {
        self(remainder, start, errors);
    }
}

/// Records an error if anything is left over.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectRemainder;

impl RemainderHandler for RejectRemainder {
    fn handle(&mut self, remainder: &[String], start: Option<&Location>, errors: &mut ErrMap) {
        if !remainder.is_empty() {
            errors.add(
                "",
                Error::UnexpectedRemainder {
                    args: remainder.to_vec(),
                    location: start.cloned(),
                },
            );
        }
    }
}

/// Leaves the remainder for the program to read.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptRemainder;

impl RemainderHandler for AcceptRemainder {
    fn handle(&mut self, _remainder: &[String], _start: Option<&Location>, _errors: &mut ErrMap) {}
}
