//! CLI command implementations.
//!
//! - `check`: Resolve parameters against a schema and report the outcome
//! - `describe`: Describe the parameters a schema defines

pub mod check;
pub mod describe;

pub use check::CheckCommand;
pub use describe::DescribeCommand;
