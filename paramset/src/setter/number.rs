use std::fmt::Display;

use super::{run_checks, with_checks, Check, Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;

/// A primitive numeric type a [`NumberSetter`] can parse.
pub trait Number: Copy + Display + PartialOrd + 'static {
    /// How the type is described to users, e.g. "integer".
    const KIND: &'static str;

    /// Parses the type from text.
    ///
    /// # Errors
    ///
    /// Returns the parser's message.
    fn parse_number(s: &str) -> Result<Self, String>;
}

macro_rules! impl_number {
    ($kind:literal => $($t:ty),+) => {
        $(
            impl Number for $t {
                const KIND: &'static str = $kind;

                fn parse_number(s: &str) -> Result<Self, String> {
                    s.parse::<$t>().map_err(|e| e.to_string())
                }
            }
        )+
    };
}

impl_number!("integer" => i8, i16, i32, i64, i128, isize);
impl_number!("non-negative integer" => u8, u16, u32, u64, u128, usize);
impl_number!("number" => f32, f64);

/// Sets a number, subject to optional checks.
///
/// # Examples
///
/// ```
/// use paramset::setter::{checks, NumberSetter, Setter};
/// use paramset::Binding;
///
/// let port = Binding::new(8080_u16);
/// let mut setter = NumberSetter::new(&port).with_check(checks::ge(1024));
/// assert!(setter.set_with_val("port", "80").is_err());
/// setter.set_with_val("port", "9000").unwrap();
/// assert_eq!(port.get(), 9000);
/// ```
pub struct NumberSetter<T: Number> {
    value: Binding<T>,
    checks: Vec<Check<T>>,
}

/// Sets an `i64`.
pub type IntSetter = NumberSetter<i64>;

/// Sets an `f64`.
pub type FloatSetter = NumberSetter<f64>;

impl<T: Number> NumberSetter<T> {
    /// A setter writing into `value`.
    #[must_use]
    pub fn new(value: &Binding<T>) -> Self {
        Self {
            value: value.clone(),
            checks: Vec::new(),
        }
    }

    /// Adds a check the parsed value must pass.
    #[must_use]
    pub fn with_check(mut self, check: Check<T>) -> Self {
        self.checks.push(check);
        self
    }
}

impl<T: Number> Setter for NumberSetter<T> {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let parsed = T::parse_number(value).map_err(|reason| SetterError::InvalidSyntax {
            value: value.to_string(),
            kind: T::KIND.to_string(),
            reason,
        })?;
        run_checks(&self.checks, &parsed, value)?;
        self.value.set(parsed);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        with_checks(&format!("any {} value", T::KIND), self.checks.len())
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.get().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setter::checks;

    #[test]
    fn test_int_setter() {
        let n = Binding::new(0_i64);
        let mut setter = IntSetter::new(&n);
        setter.set_with_val("n", "-17").unwrap();
        assert_eq!(n.get(), -17);
        assert_eq!(setter.current_value(), Some("-17".to_string()));
    }

    #[test]
    fn test_invalid_syntax_reports_kind() {
        let n = Binding::new(5_u8);
        let mut setter = NumberSetter::new(&n);
        let err = setter.set_with_val("n", "300").unwrap_err();
        match err {
            SetterError::InvalidSyntax { kind, value, .. } => {
                assert_eq!(kind, "non-negative integer");
                assert_eq!(value, "300");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(n.get(), 5);
    }

    #[test]
    fn test_failed_check_leaves_target() {
        let x = Binding::new(0.5_f64);
        let mut setter = FloatSetter::new(&x).with_check(checks::between(0.0, 1.0));
        assert!(matches!(
            setter.set_with_val("x", "1.5"),
            Err(SetterError::CheckFailed { .. })
        ));
        assert!((x.get() - 0.5).abs() < f64::EPSILON);
        setter.set_with_val("x", "0.25").unwrap();
        assert!((x.get() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_value_is_refused() {
        let n = Binding::new(0_i32);
        let mut setter = NumberSetter::new(&n);
        assert_eq!(setter.set("n"), Err(SetterError::ValueRequired));
    }

    #[test]
    fn test_allowed_values_mentions_checks() {
        let n = Binding::new(0_i64);
        let setter = IntSetter::new(&n)
            .with_check(checks::gt(-1))
            .with_check(checks::lt(10));
        assert_eq!(setter.allowed_values(), "any integer value subject to 2 checks");
    }
}
