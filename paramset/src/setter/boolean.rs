use super::{Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;

/// Sets a `bool`. The bare flag sets `true` (or `false` if inverted).
///
/// Accepts true/false, 1/0, yes/no and on/off in any case.
///
/// # Examples
///
/// ```
/// use paramset::setter::{BoolSetter, Setter};
/// use paramset::Binding;
///
/// let quiet = Binding::new(false);
/// let mut setter = BoolSetter::new(&quiet);
/// setter.set("quiet").unwrap();
/// assert!(quiet.get());
/// setter.set_with_val("quiet", "off").unwrap();
/// assert!(!quiet.get());
/// ```
pub struct BoolSetter {
    value: Binding<bool>,
    invert: bool,
}

impl BoolSetter {
    /// A setter that stores the flag's value as given.
    #[must_use]
    pub fn new(value: &Binding<bool>) -> Self {
        Self {
            value: value.clone(),
            invert: false,
        }
    }

    /// A setter that stores the negation, for `-no-xxx` style flags.
    #[must_use]
    pub fn inverted(value: &Binding<bool>) -> Self {
        Self {
            value: value.clone(),
            invert: true,
        }
    }
}

/// Parses a boolean value, accepting the common spellings.
///
/// # Errors
///
/// Returns an error for any other text.
pub fn parse_bool(s: &str) -> Result<bool, SetterError> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(SetterError::InvalidSyntax {
            value: s.to_string(),
            kind: "boolean".to_string(),
            reason: "expected true/false/1/0/yes/no/on/off".to_string(),
        }),
    }
}

impl Setter for BoolSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Optional
    }

    fn set(&mut self, _name: &str) -> Result<(), SetterError> {
        self.value.set(!self.invert);
        Ok(())
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let parsed = parse_bool(value)?;
        self.value.set(parsed != self.invert);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        "none (which will be taken as 'true') or some value that can be interpreted as true or false"
            .to_string()
    }

    fn current_value(&self) -> Option<String> {
        Some((self.value.get() != self.invert).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        for s in ["true", "TRUE", "1", "yes", "On", "y"] {
            assert!(parse_bool(s).unwrap(), "{s}");
        }
        for s in ["false", "0", "NO", "off", "n"] {
            assert!(!parse_bool(s).unwrap(), "{s}");
        }
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_inverted_flag() {
        let colour = Binding::new(true);
        let mut setter = BoolSetter::inverted(&colour);
        setter.set("no-colour").unwrap();
        assert!(!colour.get());
        setter.set_with_val("no-colour", "false").unwrap();
        assert!(colour.get());
    }

    #[test]
    fn test_bad_value_leaves_target() {
        let flag = Binding::new(true);
        let mut setter = BoolSetter::new(&flag);
        assert!(setter.set_with_val("f", "perhaps").is_err());
        assert!(flag.get());
    }

    #[test]
    fn test_current_value_reparses() {
        let flag = Binding::new(false);
        let mut setter = BoolSetter::inverted(&flag);
        let shown = setter.current_value().unwrap();
        setter.set_with_val("x", &shown).unwrap();
        assert!(!flag.get());
    }
}
