//! Config-file specs and the line-oriented config reader.
//!
//! A config file holds one setting per line:
//!
//! ```text
//! // comment
//! name = value
//! flag
//! prog1,prog2/name = value
//! #include other.cfg
//! ```
//!
//! Whitespace around the program list, name and value is ignored. A line
//! with a program list only applies to the programs it names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;
use crate::filecheck::{self, Existence};
use crate::location::Location;

/// Prefix of a comment line.
pub const COMMENT_PREFIX: &str = "//";

/// Directive that reads another file in place.
pub const INCLUDE_DIRECTIVE: &str = "#include";

const MAX_INCLUDE_DEPTH: usize = 10;

/// How unknown names in a config file are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Every name must be a parameter of this program.
    ParamMustExist,
    /// Unknown names are recorded as unused; the file may be shared.
    ParamNeedNotExist,
}

/// A config file to read during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFileSpec {
    pub(crate) path: PathBuf,
    pub(crate) existence: Existence,
    pub(crate) strictness: Strictness,
}

impl ConfigFileSpec {
    /// Creates a spec.
    ///
    /// # Panics
    ///
    /// Panics if `existence` is [`Existence::MustNotExist`]; a config file
    /// that must not exist can never be read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, existence: Existence, strictness: Strictness) -> Self {
        let path = path.into();
        assert!(
            existence != Existence::MustNotExist,
            "config file {}: a config file cannot be required not to exist",
            path.display()
        );
        Self {
            path,
            existence,
            strictness,
        }
    }

    /// The file path, `~` expanded.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file must exist.
    #[must_use]
    pub fn existence(&self) -> Existence {
        self.existence
    }

    /// How unknown names are treated.
    #[must_use]
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }
}

/// A non-blank, non-comment line and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawLine {
    pub(crate) text: String,
    pub(crate) location: Location,
}

/// Why a config file yielded no lines.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// The top-level file does not exist.
    Missing,
    /// Anything else; already described as a user error.
    Failed(Error),
}

/// Reads the meaningful lines of `path`, following includes.
pub(crate) fn read_lines(path: &Path) -> Result<Vec<RawLine>, ReadError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ReadError::Missing
        } else {
            ReadError::Failed(io_error(path, &e))
        }
    })?;

    let mut lines = Vec::new();
    let mut chain = vec![path.to_path_buf()];
    collect(path, &contents, &mut chain, &mut lines).map_err(ReadError::Failed)?;
    Ok(lines)
}

fn io_error(path: &Path, e: &io::Error) -> Error {
    Error::ConfigFileIo {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn collect(
    path: &Path,
    contents: &str,
    chain: &mut Vec<PathBuf>,
    out: &mut Vec<RawLine>,
) -> crate::Result<()> {
    for (i, raw) in contents.lines().enumerate() {
        let text = raw.trim();
        let location = Location::ConfigFile {
            path: path.to_path_buf(),
            line: i + 1,
        };

        if text.is_empty() || text.starts_with(COMMENT_PREFIX) {
            continue;
        }

        if let Some(target) = text.strip_prefix(INCLUDE_DIRECTIVE) {
            include(path, target.trim(), location, chain, out)?;
            continue;
        }

        out.push(RawLine {
            text: text.to_string(),
            location,
        });
    }
    Ok(())
}

fn include(
    from: &Path,
    target: &str,
    location: Location,
    chain: &mut Vec<PathBuf>,
    out: &mut Vec<RawLine>,
) -> crate::Result<()> {
    if target.is_empty() {
        return Err(Error::BadConfigLine {
            location,
            reason: format!("{INCLUDE_DIRECTIVE} needs a file name"),
        });
    }
    let expanded = filecheck::expand_tilde(target).map_err(|reason| Error::BadConfigLine {
        location: location.clone(),
        reason,
    })?;
    let included = match from.parent() {
        Some(dir) if expanded.is_relative() => dir.join(expanded),
        _ => expanded,
    };

    if chain.contains(&included) {
        return Err(Error::BadConfigLine {
            location,
            reason: format!("include loop: {} is already being read", included.display()),
        });
    }
    if chain.len() > MAX_INCLUDE_DEPTH {
        return Err(Error::BadConfigLine {
            location,
            reason: format!("includes are nested more than {MAX_INCLUDE_DEPTH} deep"),
        });
    }

    let contents = fs::read_to_string(&included).map_err(|e| io_error(&included, &e))?;
    chain.push(included.clone());
    let result = collect(&included, &contents, chain, out);
    chain.pop();
    result
}

/// A config line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigEntry {
    pub(crate) programs: Option<Vec<String>>,
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

/// Splits `[progs/]name[=value]`.
pub(crate) fn parse_line(text: &str) -> Result<ConfigEntry, String> {
    let (lhs, value) = match text.split_once('=') {
        Some((lhs, value)) => (lhs, Some(value.trim().to_string())),
        None => (text, None),
    };

    let (programs, name) = match lhs.split_once('/') {
        Some((progs, name)) => {
            let progs: Vec<String> = progs.split(',').map(|p| p.trim().to_string()).collect();
            if progs.iter().any(String::is_empty) {
                return Err(format!("empty program name in '{}'", lhs.trim()));
            }
            (Some(progs), name.trim())
        }
        None => (None, lhs.trim()),
    };

    if name.is_empty() {
        return Err("no parameter name given".to_string());
    }

    Ok(ConfigEntry {
        programs,
        name: name.to_string(),
        value,
    })
}
