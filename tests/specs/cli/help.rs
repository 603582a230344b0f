//! CLI help and flag specs

use crate::prelude::*;

#[test]
fn help_lists_flags() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("--controller")
        .stdout_has("--commands")
        .stdout_has("--file")
        .stdout_has("--shutdown");
}

#[test]
fn version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(&format!("mgmt {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn command_and_file_conflict() {
    cli()
        .args(&["--command", "batch", "--file", "x.cli"])
        .fails()
        .stderr_has("cannot be used with");
}
