//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the paramset library.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use paramset::resolve::IgnoreErrors;
use paramset::source::MapEnv;
use paramset::{ParamSetBuilder, ParameterSet};

/// Program name used by every test set.
pub const PROG: &str = "testprog";

/// A builder for a set that never exits and sees no real environment.
#[allow(dead_code)]
pub fn builder() -> ParamSetBuilder {
    ParameterSet::builder()
        .program_name(PROG)
        .error_handler(IgnoreErrors)
        .env_source(MapEnv::default())
}

/// A set built with [`builder`].
#[allow(dead_code)]
pub fn new_set() -> ParameterSet {
    builder().build()
}

/// A set whose environment holds exactly `vars`.
#[allow(dead_code)]
pub fn set_with_env(vars: &[(&str, &str)]) -> ParameterSet {
    builder()
        .env_source(MapEnv::new(vars.iter().copied()))
        .build()
}

/// Writes `content` to `dir/filename` and returns the path.
#[allow(dead_code)]
pub fn write_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// RAII guard for setting and restoring environment variables.
///
/// Tests using it must be `#[serial]`.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    /// Sets `key` to `value` until dropped.
    pub fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}
