//! File existence rules shared by config-file specs and pathname setters.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Whether a file is required to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Existence {
    /// The file must exist.
    MustExist,
    /// The file must not exist. Not valid for config files.
    MustNotExist,
    /// The file may or may not exist.
    Optional,
}

impl fmt::Display for Existence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustExist => write!(f, "must exist"),
            Self::MustNotExist => write!(f, "must not exist"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// What kind of filesystem entry is expected if it exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// Anything.
    #[default]
    Any,
    /// A regular file.
    File,
    /// A directory.
    Dir,
}

/// Checks `path` against an existence rule and a kind.
///
/// # Errors
///
/// Returns a description of the violation.
pub fn check(path: &Path, existence: Existence, kind: FileKind) -> Result<(), String> {
    match (path.symlink_metadata(), existence) {
        (Err(e), Existence::MustExist) if e.kind() == io::ErrorKind::NotFound => {
            Err(format!("{} does not exist", path.display()))
        }
        (Err(e), Existence::MustNotExist | Existence::Optional)
            if e.kind() == io::ErrorKind::NotFound =>
        {
            Ok(())
        }
        (Err(e), _) => Err(format!("{}: {e}", path.display())),
        (Ok(_), Existence::MustNotExist) => Err(format!("{} already exists", path.display())),
        (Ok(_), _) => {
            let meta = path
                .metadata()
                .map_err(|e| format!("{}: {e}", path.display()))?;
            match kind {
                FileKind::File if !meta.is_file() => {
                    Err(format!("{} is not a regular file", path.display()))
                }
                FileKind::Dir if !meta.is_dir() => {
                    Err(format!("{} is not a directory", path.display()))
                }
                _ => Ok(()),
            }
        }
    }
}

/// Expands a leading `~` to the home directory.
///
/// `~user` is left unexpanded.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn expand_tilde(path: &str) -> Result<PathBuf, String> {
    if path != "~" && !path.starts_with("~/") && !path.starts_with("~\\") {
        return Ok(PathBuf::from(path));
    }

    let home = home::home_dir().ok_or_else(|| "cannot determine home directory".to_string())?;
    if path == "~" {
        Ok(home)
    } else {
        Ok(home.join(&path[2..]))
    }
}

/// Like [`expand_tilde`], but leaves the path as given when it is not
/// UTF-8 or the home directory is unknown.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    path.to_str()
        .and_then(|s| expand_tilde(s).ok())
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(check(&missing, Existence::MustExist, FileKind::Any).is_err());
        assert!(check(dir.path(), Existence::MustExist, FileKind::Any).is_ok());
    }

    #[test]
    fn test_must_not_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(check(&missing, Existence::MustNotExist, FileKind::Any).is_ok());
        let err = check(dir.path(), Existence::MustNotExist, FileKind::Any).unwrap_err();
        assert!(err.contains("already exists"));
    }

    #[test]
    fn test_kind_checked_when_present() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();

        assert!(check(&file, Existence::Optional, FileKind::File).is_ok());
        assert!(check(&file, Existence::Optional, FileKind::Dir).is_err());
        assert!(check(dir.path(), Existence::Optional, FileKind::Dir).is_ok());
        assert!(check(&dir.path().join("x"), Existence::Optional, FileKind::Dir).is_ok());
    }

    #[test]
    fn test_expand_tilde() {
        let home = home::home_dir().unwrap();
        assert_eq!(expand_tilde("~").unwrap(), home);
        assert_eq!(expand_tilde("~/a/b").unwrap(), home.join("a/b"));
        assert_eq!(expand_tilde("/abs").unwrap(), PathBuf::from("/abs"));
        assert_eq!(expand_tilde("~user/x").unwrap(), PathBuf::from("~user/x"));
    }
}
