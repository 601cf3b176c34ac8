use std::env;
use std::path::Path;

use super::ParameterSet;
use crate::logging::init_logger;
use crate::resolve::{ErrorHandler, RemainderHandler, RejectRemainder, ReportAndExit};
use crate::source::{EnvSource, ProcessEnv};

/// The default terminal-parameter string.
pub const DEFAULT_TERMINAL_PARAM: &str = "--";

/// Builder for [`ParameterSet`].
///
/// # Examples
///
/// ```
/// use paramset::resolve::{AcceptRemainder, IgnoreErrors};
/// use paramset::ParameterSet;
///
/// let ps = ParameterSet::builder()
///     .program_name("mytool")
///     .error_handler(IgnoreErrors)
///     .remainder_handler(AcceptRemainder)
///     .build();
/// assert_eq!(ps.program_name(), "mytool");
/// assert_eq!(ps.terminal_param(), "--");
/// ```
#[must_use]
pub struct ParamSetBuilder {
    program_name: Option<String>,
    terminal_param: String,
    error_handler: Option<Box<dyn ErrorHandler>>,
    remainder_handler: Option<Box<dyn RemainderHandler>>,
    env: Option<Box<dyn EnvSource>>,
}

impl Default for ParamSetBuilder {
    fn default() -> Self {
        Self {
            program_name: None,
            terminal_param: DEFAULT_TERMINAL_PARAM.to_string(),
            error_handler: None,
            remainder_handler: None,
            env: None,
        }
    }
}

impl ParamSetBuilder {
    /// Sets the name matched against program lists in config files.
    ///
    /// Defaults to the file name of the running executable.
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Sets the argument that ends named-parameter processing.
    pub fn terminal_param(mut self, param: impl Into<String>) -> Self {
        self.terminal_param = param.into();
        self
    }

    /// Sets what happens to the collected errors. Defaults to
    /// [`ReportAndExit`].
    pub fn error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Sets what happens to leftover arguments. Defaults to
    /// [`RejectRemainder`].
    pub fn remainder_handler(mut self, handler: impl RemainderHandler + 'static) -> Self {
        self.remainder_handler = Some(Box::new(handler));
        self
    }

    /// Sets where environment variables are read from. Defaults to
    /// [`ProcessEnv`].
    pub fn env_source(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Builds the set.
    ///
    /// # Panics
    ///
    /// Panics if the terminal parameter is empty.
    #[must_use]
    pub fn build(self) -> ParameterSet {
        assert!(
            !self.terminal_param.is_empty(),
            "the terminal parameter cannot be empty"
        );

        let program_name = self.program_name.unwrap_or_else(default_program_name);
        ParameterSet::from_parts(
            program_name,
            self.terminal_param,
            self.error_handler
                .unwrap_or_else(|| Box::new(ReportAndExit::new(init_logger(false, false)))),
            self.remainder_handler
                .unwrap_or_else(|| Box::new(RejectRemainder)),
            self.env.unwrap_or_else(|| Box::new(ProcessEnv)),
        )
    }
}

fn default_program_name() -> String {
    env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "program".to_string())
}
