//! CLI error handling specs
//!
//! Verify error messages and exit codes.

use crate::prelude::*;

#[test]
fn no_controller_running() {
    let state = tempfile::tempdir().unwrap();

    cli()
        .env("MGMT_STATE_DIR", state.path())
        .args(&["--command", "/system-property=p:add(value=1)"])
        .fails()
        .stderr_has("Controller not running");
}

#[test]
fn batching_needs_no_controller() {
    let state = tempfile::tempdir().unwrap();

    cli()
        .env("MGMT_STATE_DIR", state.path())
        .args(&["--commands", "batch,/system-property=p:add(value=1),discard-batch"])
        .passes()
        .stdout_eq("");
}

#[test]
fn parse_error_shows_caret() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&["--command", "/system-property=p:add(value=))"])
        .fails()
        .stderr_has("Error: ")
        .stderr_has("^");
}

#[test]
fn commands_stop_at_first_error() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&[
            "--commands",
            ":no-such-operation,/system-property=later:add(value=1)",
        ])
        .fails()
        .stderr_has("CTL0031");

    controller
        .mgmt()
        .args(&["--command", "/system-property=later:read-resource"])
        .fails();
}

#[test]
fn stdin_continues_after_errors_and_exits_one() {
    let controller = Controller::start();

    let run = controller
        .mgmt()
        .stdin(&[
            "discard-batch",
            "/system-property=kept:add(value=1)",
        ])
        .fails()
        .stderr_eq("Error: not in batch mode\n");
    assert_eq!(run.code(), Some(1));

    read_property(&controller, "kept").stdout_has("\"result\" => 1");
}

#[test]
fn unknown_batch_argument() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&["--commands", "batch,run-batch --bogus"])
        .fails()
        .stderr_has("unrecognized argument '--bogus' for run-batch");
}
