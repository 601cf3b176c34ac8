use std::path::PathBuf;

use super::{Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;
use crate::filecheck::{self, Existence, FileKind};

/// Sets a `PathBuf`, expanding a leading `~` and checking existence.
///
/// # Examples
///
/// ```
/// use paramset::filecheck::{Existence, FileKind};
/// use paramset::setter::{PathnameSetter, Setter};
/// use paramset::Binding;
/// use std::path::PathBuf;
///
/// let out = Binding::new(PathBuf::new());
/// let mut setter = PathnameSetter::new(&out).with_existence(Existence::MustExist, FileKind::Dir);
/// assert!(setter.set_with_val("out", "/definitely/not/here").is_err());
/// ```
pub struct PathnameSetter {
    value: Binding<PathBuf>,
    existence: Existence,
    kind: FileKind,
}

impl PathnameSetter {
    /// A setter writing into `value` with no existence requirement.
    #[must_use]
    pub fn new(value: &Binding<PathBuf>) -> Self {
        Self {
            value: value.clone(),
            existence: Existence::Optional,
            kind: FileKind::Any,
        }
    }

    /// Requires the path to satisfy `existence` and, if present, `kind`.
    #[must_use]
    pub fn with_existence(mut self, existence: Existence, kind: FileKind) -> Self {
        self.existence = existence;
        self.kind = kind;
        self
    }
}

impl Setter for PathnameSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let path = filecheck::expand_tilde(value).map_err(|reason| SetterError::InvalidSyntax {
            value: value.to_string(),
            kind: "pathname".to_string(),
            reason,
        })?;
        filecheck::check(&path, self.existence, self.kind).map_err(|reason| {
            SetterError::CheckFailed {
                value: value.to_string(),
                reason,
            }
        })?;
        self.value.set(path);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        let mut desc = "a pathname".to_string();
        match self.kind {
            FileKind::Any => {}
            FileKind::File => desc.push_str(" of a regular file"),
            FileKind::Dir => desc.push_str(" of a directory"),
        }
        if self.existence != Existence::Optional {
            desc.push_str(&format!(" which {}", self.existence));
        }
        desc
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.with(|p| p.to_string_lossy().into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expands_tilde() {
        let p = Binding::new(PathBuf::new());
        let mut setter = PathnameSetter::new(&p);
        setter.set_with_val("p", "~/notes.txt").unwrap();
        assert_eq!(p.get(), home::home_dir().unwrap().join("notes.txt"));
    }

    #[test]
    fn test_must_not_exist() {
        let dir = TempDir::new().unwrap();
        let taken = dir.path().join("taken");
        fs::write(&taken, "x").unwrap();

        let p = Binding::new(PathBuf::new());
        let mut setter = PathnameSetter::new(&p).with_existence(Existence::MustNotExist, FileKind::Any);
        let err = setter
            .set_with_val("p", taken.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, SetterError::CheckFailed { .. }));
        assert_eq!(p.get(), PathBuf::new());

        let fresh = dir.path().join("fresh");
        setter.set_with_val("p", fresh.to_str().unwrap()).unwrap();
        assert_eq!(p.get(), fresh);
    }

    #[test]
    fn test_allowed_values_text() {
        let p = Binding::new(PathBuf::new());
        let setter = PathnameSetter::new(&p).with_existence(Existence::MustExist, FileKind::File);
        assert_eq!(
            setter.allowed_values(),
            "a pathname of a regular file which must exist"
        );
    }
}
