use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use super::boolean::parse_bool;
use super::{run_checks, with_checks, Check, Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;

/// Sets a `Vec<T>` from a separated list.
///
/// Each assignment replaces the list unless [`ListSetter::appending`] is
/// used. An empty value gives an empty list.
///
/// # Examples
///
/// ```
/// use paramset::setter::{ListSetter, Setter};
/// use paramset::Binding;
///
/// let ports: Binding<Vec<u16>> = Binding::default();
/// let mut setter = ListSetter::new(&ports);
/// setter.set_with_val("ports", "80,443").unwrap();
/// assert_eq!(ports.get(), vec![80, 443]);
/// ```
pub struct ListSetter<T> {
    value: Binding<Vec<T>>,
    separator: String,
    append: bool,
    checks: Vec<Check<Vec<T>>>,
}

impl<T> ListSetter<T>
where
    T: FromStr + Display + Clone + 'static,
    T::Err: Display,
{
    /// A setter writing into `value`, separating entries with `,`.
    #[must_use]
    pub fn new(value: &Binding<Vec<T>>) -> Self {
        Self {
            value: value.clone(),
            separator: ",".to_string(),
            append: false,
            checks: Vec::new(),
        }
    }

    /// Uses `separator` between entries.
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Appends to the existing list instead of replacing it.
    #[must_use]
    pub fn appending(mut self) -> Self {
        self.append = true;
        self
    }

    /// Adds a check the resulting list must pass.
    #[must_use]
    pub fn with_check(mut self, check: Check<Vec<T>>) -> Self {
        self.checks.push(check);
        self
    }

    fn parse(&self, value: &str) -> Result<Vec<T>, SetterError> {
        if value.is_empty() {
            return Ok(Vec::new());
        }
        value
            .split(self.separator.as_str())
            .map(|entry| {
                entry.parse::<T>().map_err(|e| SetterError::InvalidSyntax {
                    value: entry.to_string(),
                    kind: "list entry".to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

impl<T> Setter for ListSetter<T>
where
    T: FromStr + Display + Clone + 'static,
    T::Err: Display,
{
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let mut parsed = self.parse(value)?;
        if self.append {
            let mut combined = self.value.get();
            combined.append(&mut parsed);
            parsed = combined;
        }
        run_checks(&self.checks, &parsed, value)?;
        self.value.set(parsed);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        let base = format!("a list of values separated by '{}'", self.separator);
        with_checks(&base, self.checks.len())
    }

    fn current_value(&self) -> Option<String> {
        let rendered: Vec<String> = self.value.with(|v| v.iter().map(ToString::to_string).collect());
        Some(rendered.join(&self.separator))
    }

    fn check_setter(&self, name: &str) {
        assert!(
            !self.separator.is_empty(),
            "parameter '{name}': the list separator must not be empty"
        );
    }
}

/// Sets entries in a `BTreeMap<String, bool>`.
///
/// The value is a separated list of `key` (stored as `true`) or
/// `key=bool` entries, merged into the existing map.
///
/// # Examples
///
/// ```
/// use paramset::setter::{MapSetter, Setter};
/// use paramset::Binding;
/// use std::collections::BTreeMap;
///
/// let features: Binding<BTreeMap<String, bool>> = Binding::default();
/// let mut setter = MapSetter::new(&features);
/// setter.set_with_val("features", "fast,safe=no").unwrap();
/// assert_eq!(features.get().get("fast"), Some(&true));
/// assert_eq!(features.get().get("safe"), Some(&false));
/// ```
pub struct MapSetter {
    value: Binding<BTreeMap<String, bool>>,
    separator: String,
}

impl MapSetter {
    /// A setter writing into `value`, separating entries with `,`.
    #[must_use]
    pub fn new(value: &Binding<BTreeMap<String, bool>>) -> Self {
        Self {
            value: value.clone(),
            separator: ",".to_string(),
        }
    }

    /// Uses `separator` between entries.
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }
}

impl Setter for MapSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let mut entries = Vec::new();
        for entry in value.split(self.separator.as_str()) {
            let (key, flag) = match entry.split_once('=') {
                Some((key, flag)) => (key.trim(), parse_bool(flag.trim())?),
                None => (entry.trim(), true),
            };
            if key.is_empty() {
                return Err(SetterError::InvalidSyntax {
                    value: entry.to_string(),
                    kind: "map entry".to_string(),
                    reason: "the key is empty".to_string(),
                });
            }
            entries.push((key.to_string(), flag));
        }
        self.value.update(|map| map.extend(entries));
        Ok(())
    }

    fn allowed_values(&self) -> String {
        format!(
            "a list of entries separated by '{}', each a key optionally followed by '=' and true or false",
            self.separator
        )
    }

    fn current_value(&self) -> Option<String> {
        let rendered: Vec<String> = self
            .value
            .with(|m| m.iter().map(|(k, v)| format!("{k}={v}")).collect());
        Some(rendered.join(&self.separator))
    }

    fn check_setter(&self, name: &str) {
        assert!(
            !self.separator.is_empty() && self.separator != "=",
            "parameter '{name}': the map separator must be non-empty and not '='"
        );
    }
}
