//! The setter abstraction and the concrete setters.
//!
//! Every parameter delegates to a [`Setter`]. The setter says whether a
//! value must, may, or must not follow the parameter name, turns text into
//! a typed value, writes it into the program's [`Binding`](crate::Binding),
//! and describes what values it accepts.
//!
//! Setters validate their own configuration once, at registration, through
//! [`Setter::check_setter`]. A setter that can never work (an enumeration
//! with a single allowed value, an initial value outside the allowed set)
//! is a programmer error and panics there rather than at resolution time.
//!
//! # Examples
//!
//! ```
//! use paramset::setter::{IntSetter, Setter, ValueReq};
//! use paramset::Binding;
//!
//! let n = Binding::new(0_i64);
//! let mut setter = IntSetter::new(&n);
//! assert_eq!(setter.value_req(), ValueReq::Mandatory);
//! setter.set_with_val("n", "42").unwrap();
//! assert_eq!(n.get(), 42);
//! assert!(setter.set_with_val("n", "forty-two").is_err());
//! assert_eq!(n.get(), 42);
//! ```

pub mod checks;

mod boolean;
mod enumeration;
mod list;
mod misc;
mod number;
mod path;
mod string;
mod time;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use serde::Serialize;

use crate::error::SetterError;

pub use boolean::{parse_bool, BoolSetter};
pub use checks::Check;
pub use enumeration::{AllowedVals, EnumListSetter, EnumSetter};
pub use list::{ListSetter, MapSetter};
pub use misc::NilSetter;
pub(crate) use misc::ConfigFileSetter;
pub use number::{FloatSetter, IntSetter, Number, NumberSetter};
pub use path::PathnameSetter;
pub use string::StringSetter;
pub use time::{parse_duration, DurationSetter, TimeSetter};

/// Whether a value follows the parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueReq {
    /// A value must be given (`-name=value` or `-name value`).
    Mandatory,
    /// A value may be given, but only as `-name=value`.
    Optional,
    /// No value may be given.
    None,
}

/// The capability contract every parameter type implements.
///
/// On failure a setter returns an error and leaves its target untouched.
pub trait Setter {
    /// Whether a value must, may, or must not follow.
    fn value_req(&self) -> ValueReq;

    /// Applies the parameter with no value.
    ///
    /// Only called for `Optional` and `None` setters.
    ///
    /// # Errors
    ///
    /// The default refuses, which suits `Mandatory` setters.
    fn set(&mut self, _name: &str) -> Result<(), SetterError> {
        Err(SetterError::ValueRequired)
    }

    /// Applies the parameter with `value`.
    ///
    /// Only called for `Mandatory` and `Optional` setters.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be parsed or fails a check.
    fn set_with_val(&mut self, name: &str, value: &str) -> Result<(), SetterError>;

    /// A human description of the accepted values.
    fn allowed_values(&self) -> String;

    /// The current value, rendered so that it parses back to the same state.
    fn current_value(&self) -> Option<String> {
        None
    }

    /// Panics if the setter is structurally invalid.
    ///
    /// Called once when the parameter named `name` is registered.
    fn check_setter(&self, _name: &str) {}
}

impl<S: Setter + ?Sized> Setter for Box<S> {
    fn value_req(&self) -> ValueReq {
        (**self).value_req()
    }

    fn set(&mut self, name: &str) -> Result<(), SetterError> {
        (**self).set(name)
    }

    fn set_with_val(&mut self, name: &str, value: &str) -> Result<(), SetterError> {
        (**self).set_with_val(name, value)
    }

    fn allowed_values(&self) -> String {
        (**self).allowed_values()
    }

    fn current_value(&self) -> Option<String> {
        (**self).current_value()
    }

    fn check_setter(&self, name: &str) {
        (**self).check_setter(name);
    }
}

/// Formats a value-description suffix listing the checks in force.
pub(crate) fn with_checks(base: &str, count: usize) -> String {
    match count {
        0 => base.to_string(),
        1 => format!("{base} subject to a check"),
        n => format!("{base} subject to {n} checks"),
    }
}

/// Runs `checks` against `parsed`, mapping failures for `value`.
pub(crate) fn run_checks<T>(
    checks: &[Check<T>],
    parsed: &T,
    value: &str,
) -> Result<(), SetterError> {
    for check in checks {
        check(parsed).map_err(|reason| SetterError::CheckFailed {
            value: value.to_string(),
            reason,
        })?;
    }
    Ok(())
}
