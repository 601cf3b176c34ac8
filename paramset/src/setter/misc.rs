use std::path::PathBuf;

use super::{Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;
use crate::filecheck;

/// A setter with no target and no value.
///
/// Useful for parameters whose only effect is a post action.
#[derive(Debug, Default, Clone, Copy)]
pub struct NilSetter;

impl Setter for NilSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::None
    }

    fn set(&mut self, _name: &str) -> Result<(), SetterError> {
        Ok(())
    }

    fn set_with_val(&mut self, _name: &str, _value: &str) -> Result<(), SetterError> {
        Err(SetterError::ValueForbidden)
    }

    fn allowed_values(&self) -> String {
        "none".to_string()
    }
}

/// Queues config files named on the command line for immediate reading.
pub(crate) struct ConfigFileSetter {
    pending: Binding<Vec<PathBuf>>,
}

impl ConfigFileSetter {
    pub(crate) fn new(pending: &Binding<Vec<PathBuf>>) -> Self {
        Self {
            pending: pending.clone(),
        }
    }
}

impl Setter for ConfigFileSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let path = filecheck::expand_tilde(value).map_err(|reason| SetterError::InvalidSyntax {
            value: value.to_string(),
            kind: "pathname".to_string(),
            reason,
        })?;
        self.pending.update(|p| p.push(path));
        Ok(())
    }

    fn allowed_values(&self) -> String {
        "the name of a file of parameter settings, one per line".to_string()
    }
}
