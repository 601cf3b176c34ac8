use std::collections::BTreeMap;

use super::{Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;

/// Allowed values for an enumerated parameter, with their descriptions.
pub type AllowedVals = BTreeMap<String, String>;

fn collect_allowed<K, D>(allowed: impl IntoIterator<Item = (K, D)>) -> AllowedVals
where
    K: Into<String>,
    D: Into<String>,
{
    allowed
        .into_iter()
        .map(|(k, d)| (k.into(), d.into()))
        .collect()
}

fn list_allowed(allowed: &AllowedVals) -> String {
    allowed.keys().cloned().collect::<Vec<_>>().join(", ")
}

fn check_allowed_map(name: &str, allowed: &AllowedVals) {
    assert!(
        allowed.len() >= 2,
        "parameter '{name}': an enumeration needs at least two allowed values, found {}",
        allowed.len()
    );
    assert!(
        !allowed.contains_key(""),
        "parameter '{name}': the empty string cannot be an allowed value"
    );
}

/// Sets a `String` to one of a fixed set of values.
///
/// # Examples
///
/// ```
/// use paramset::setter::{EnumSetter, Setter};
/// use paramset::Binding;
///
/// let fmt = Binding::new("text".to_string());
/// let mut setter = EnumSetter::new(&fmt, [("text", "plain text"), ("json", "JSON")]);
/// setter.check_setter("format");
/// setter.set_with_val("format", "json").unwrap();
/// assert_eq!(fmt.get(), "json");
/// assert!(setter.set_with_val("format", "xml").is_err());
/// ```
pub struct EnumSetter {
    value: Binding<String>,
    allowed: AllowedVals,
}

impl EnumSetter {
    /// A setter accepting the keys of `allowed`; values are descriptions.
    pub fn new<K, D>(value: &Binding<String>, allowed: impl IntoIterator<Item = (K, D)>) -> Self
    where
        K: Into<String>,
        D: Into<String>,
    {
        Self {
            value: value.clone(),
            allowed: collect_allowed(allowed),
        }
    }

    /// The allowed values and their descriptions.
    #[must_use]
    pub fn allowed(&self) -> &AllowedVals {
        &self.allowed
    }
}

impl Setter for EnumSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        if !self.allowed.contains_key(value) {
            return Err(SetterError::NotAllowed {
                value: value.to_string(),
                allowed: list_allowed(&self.allowed),
            });
        }
        self.value.set(value.to_string());
        Ok(())
    }

    fn allowed_values(&self) -> String {
        format!("one of: {}", list_allowed(&self.allowed))
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.get())
    }

    fn check_setter(&self, name: &str) {
        check_allowed_map(name, &self.allowed);
        let initial = self.value.get();
        assert!(
            self.allowed.contains_key(&initial),
            "parameter '{name}': the initial value '{initial}' is not an allowed value"
        );
    }
}

/// Sets a list of values, each from a fixed set.
///
/// Entries are separated by `,` unless another separator is configured.
pub struct EnumListSetter {
    value: Binding<Vec<String>>,
    allowed: AllowedVals,
    separator: String,
}

impl EnumListSetter {
    /// A setter accepting lists of the keys of `allowed`.
    pub fn new<K, D>(
        value: &Binding<Vec<String>>,
        allowed: impl IntoIterator<Item = (K, D)>,
    ) -> Self
    where
        K: Into<String>,
        D: Into<String>,
    {
        Self {
            value: value.clone(),
            allowed: collect_allowed(allowed),
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

impl Setter for EnumListSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let mut parsed = Vec::new();
        for entry in value.split(self.separator.as_str()) {
            let entry = entry.trim();
            if !self.allowed.contains_key(entry) {
                return Err(SetterError::NotAllowed {
                    value: entry.to_string(),
                    allowed: list_allowed(&self.allowed),
                });
            }
            parsed.push(entry.to_string());
        }
        self.value.set(parsed);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        format!(
            "a list of values separated by '{}', each one of: {}",
            self.separator,
            list_allowed(&self.allowed)
        )
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.get().join(&self.separator))
    }

    fn check_setter(&self, name: &str) {
        check_allowed_map(name, &self.allowed);
        assert!(
            !self.separator.is_empty(),
            "parameter '{name}': the list separator must not be empty"
        );
        for key in self.allowed.keys() {
            assert!(
                !key.contains(self.separator.as_str()),
                "parameter '{name}': allowed value '{key}' contains the separator '{}'",
                self.separator
            );
        }
        for initial in self.value.get() {
            assert!(
                self.allowed.contains_key(&initial),
                "parameter '{name}': the initial entry '{initial}' is not an allowed value"
            );
        }
    }
}
