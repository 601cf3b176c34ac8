//! Common test utilities for CLI integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A schema used by most tests.
#[allow(dead_code)]
pub const BASIC_SCHEMA: &str = r#"
program: demo
env-prefixes: [DEMO_]
config-files:
  - path: demo.cfg
    existence: optional
    strict: false
parameters:
  - name: count
    type: int
    alt-names: [n]
    default: "1"
    min: 0
    max: 100
    description: how many times
  - name: verbose-mode
    type: bool
  - name: format
    type: enum
    allowed: { text: plain text, json: JSON }
  - name: secret
    type: string
    attributes: [dont-show-in-std-usage]
positional:
  - name: input
    type: string
"#;

/// Test environment with a temporary directory for schemas and config files.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a bare command builder for the pset binary.
    pub fn command(&self) -> Command {
        Command::cargo_bin("pset").expect("Failed to find pset binary")
    }

    /// Write a file under the temporary directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write [`BASIC_SCHEMA`] and return its path.
    pub fn basic_schema(&self) -> PathBuf {
        self.write_file("schema.yaml", BASIC_SCHEMA)
    }

    /// A `check` command against `schema` that ignores the process environment.
    pub fn check(&self, schema: &Path) -> Command {
        let mut cmd = self.command();
        cmd.arg("check").arg(schema).arg("--ignore-environment");
        cmd
    }
}
