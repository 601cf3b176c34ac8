//! Per-parameter attributes checked during resolution.

use serde::Serialize;

/// Fixed set of capabilities attached to a named parameter at registration.
///
/// # Examples
///
/// ```
/// use paramset::Attributes;
///
/// let attrs = Attributes::new().must_be_set().set_only_once();
/// assert!(attrs.is_must_be_set());
/// assert!(attrs.is_set_only_once());
/// assert!(!attrs.is_command_line_only());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Attributes {
    command_line_only: bool,
    must_be_set: bool,
    set_only_once: bool,
    dont_show_in_std_usage: bool,
}

impl Attributes {
    /// No attributes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            command_line_only: false,
            must_be_set: false,
            set_only_once: false,
            dont_show_in_std_usage: false,
        }
    }

    /// Values from config files or the environment are rejected.
    #[must_use]
    pub const fn command_line_only(mut self) -> Self {
        self.command_line_only = true;
        self
    }

    /// Resolution fails if no source sets the parameter.
    #[must_use]
    pub const fn must_be_set(mut self) -> Self {
        self.must_be_set = true;
        self
    }

    /// The first accepted value wins; later ones are silently skipped.
    #[must_use]
    pub const fn set_only_once(mut self) -> Self {
        self.set_only_once = true;
        self
    }

    /// Left out of the standard usage listing.
    #[must_use]
    pub const fn dont_show_in_std_usage(mut self) -> Self {
        self.dont_show_in_std_usage = true;
        self
    }

    /// See [`Attributes::command_line_only`].
    #[must_use]
    pub const fn is_command_line_only(&self) -> bool {
        self.command_line_only
    }

    /// See [`Attributes::must_be_set`].
    #[must_use]
    pub const fn is_must_be_set(&self) -> bool {
        self.must_be_set
    }

    /// See [`Attributes::set_only_once`].
    #[must_use]
    pub const fn is_set_only_once(&self) -> bool {
        self.set_only_once
    }

    /// See [`Attributes::dont_show_in_std_usage`].
    #[must_use]
    pub const fn is_dont_show_in_std_usage(&self) -> bool {
        self.dont_show_in_std_usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert_eq!(Attributes::default(), Attributes::new());
        let a = Attributes::new();
        assert!(!a.is_command_line_only());
        assert!(!a.is_must_be_set());
        assert!(!a.is_set_only_once());
        assert!(!a.is_dont_show_in_std_usage());
    }

    #[test]
    fn test_builders_combine() {
        let a = Attributes::new()
            .command_line_only()
            .dont_show_in_std_usage();
        assert!(a.is_command_line_only());
        assert!(a.is_dont_show_in_std_usage());
        assert!(!a.is_must_be_set());
    }
}
