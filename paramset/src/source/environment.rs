//! Environment-variable source.
//!
//! Only variables starting with a registered prefix are considered. The
//! prefix is removed and underscores become dashes, so with the prefix
//! `XX_` the variable `XX_max_len` sets the parameter `max-len`.

use std::collections::BTreeMap;
use std::env;

use super::Assignment;
use crate::location::Location;

/// Where environment variables are read from.
///
/// [`ProcessEnv`] reads the real environment; [`MapEnv`] supplies a fixed
/// set, for tests and for programs embedding the resolver.
pub trait EnvSource {
    /// All variables as `(name, value)` pairs.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// A fixed set of variables.
///
/// # Examples
///
/// ```
/// use paramset::source::{EnvSource, MapEnv};
///
/// let env = MapEnv::new([("XX_a_b", "7")]);
/// assert_eq!(env.vars(), vec![("XX_a_b".to_string(), "7".to_string())]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Creates a source holding `vars`.
    pub fn new<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Turns prefixed variables into assignments, sorted by variable name.
///
/// The first prefix (in `prefixes` order) that a variable starts with is
/// used. An empty value counts as no value.
pub(crate) fn assignments(env: &dyn EnvSource, prefixes: &[String]) -> Vec<Assignment> {
    let mut vars = env.vars();
    vars.sort();

    vars.into_iter()
        .filter_map(|(variable, value)| {
            let prefix = prefixes.iter().find(|p| variable.starts_with(p.as_str()))?;
            let name = variable[prefix.len()..].replace('_', "-");
            Some(Assignment {
                name,
                value: (!value.is_empty()).then_some(value),
                location: Location::Environment { variable },
            })
        })
        .collect()
}
