//! Build script for paramset-cli.
//!
//! Generates the `pset.1` man page into OUT_DIR using clap_mangen. The
//! command structure is rebuilt here because a build script cannot depend
//! on the crate it builds.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Keep in step with src/cli.rs.
fn build_cli() -> Command {
    Command::new("pset")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check parameter schemas against arguments, environment and config files")
        .long_about(
            "Loads a YAML parameter schema, then resolves config files, environment \
             variables and command-line arguments against it",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("check")
                .about("Resolve parameters from config files, environment and arguments")
                .long_about(
                    "Resolve the arguments after -- against the schema and report values, \
                     where each was set, unused names and errors",
                ),
            Command::new("describe")
                .about("Describe the parameters a schema defines")
                .long_about("List groups, parameters, accepted values and attributes"),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(
        std::env::var_os("OUT_DIR").ok_or_else(|| io::Error::other("OUT_DIR is not set"))?,
    );
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join("pset.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
