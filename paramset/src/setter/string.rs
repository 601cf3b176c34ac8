use super::{run_checks, with_checks, Check, Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;

/// Sets a `String`, subject to optional checks.
pub struct StringSetter {
    value: Binding<String>,
    checks: Vec<Check<String>>,
}

impl StringSetter {
    /// A setter writing into `value`.
    #[must_use]
    pub fn new(value: &Binding<String>) -> Self {
        Self {
            value: value.clone(),
            checks: Vec::new(),
        }
    }

    /// Adds a check the value must pass.
    #[must_use]
    pub fn with_check(mut self, check: Check<String>) -> Self {
        self.checks.push(check);
        self
    }
}

impl Setter for StringSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let owned = value.to_string();
        run_checks(&self.checks, &owned, value)?;
        self.value.set(owned);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        with_checks("any string", self.checks.len())
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.get())
    }
}
