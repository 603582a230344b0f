//! File input specs
//!
//! `run-batch --file=<path>` runs a file as one batch; `mgmt --file` feeds a
//! file's lines through the CLI.

use crate::prelude::*;

#[test]
fn run_batch_file_is_atomic() {
    let controller = Controller::start();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.cli");
    std::fs::write(
        &good,
        "# properties\n/system-property=f1:add(value=a)\n\n/system-property=f2:add(value=b)\n",
    )
    .unwrap();
    let bad = dir.path().join("bad.cli");
    std::fs::write(
        &bad,
        "/system-property=f3:add(value=c)\n/system-property=f1:add(value=again)\n",
    )
    .unwrap();

    controller
        .mgmt()
        .args(&["--command", &format!("run-batch --file={}", good.display())])
        .passes()
        .stdout_eq("The batch executed successfully\n");
    read_property(&controller, "f2").stdout_has("\"result\" => \"b\"");

    controller
        .mgmt()
        .args(&["--command", &format!("run-batch --file={}", bad.display())])
        .fails()
        .stderr_has("The batch failed with the following error: CTL0062");
    controller
        .mgmt()
        .args(&["--command", "/system-property=f3:read-resource"])
        .fails()
        .stderr_has("CTL0216");
}

#[test]
fn cli_file_input_stops_at_first_error() {
    let controller = Controller::start();
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.cli");
    std::fs::write(
        &script,
        "run-batch\n/system-property=after:add(value=1)\n",
    )
    .unwrap();

    controller
        .mgmt()
        .args(&["--file", script.to_str().unwrap()])
        .fails()
        .stderr_eq("Error: not in batch mode\n");

    controller
        .mgmt()
        .args(&["--command", "/system-property=after:read-resource"])
        .fails();
}

#[test]
fn missing_cli_file() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&["--file", "/nonexistent/script.cli"])
        .fails()
        .stderr_has("Error: failed to read /nonexistent/script.cli");
}
