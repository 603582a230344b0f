//! Batch execution specs
//!
//! Verify that batches run as one atomic composite and that a failed batch
//! leaves the model untouched.

use crate::prelude::*;

#[test]
fn batch_applies_all_steps() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&[
            "--commands",
            "batch,\
             /system-property=prop1:add(value=prop1_a),\
             /system-property=prop2:add(value=prop2_a),\
             run-batch",
        ])
        .passes()
        .stdout_eq("The batch executed successfully\n");

    read_property(&controller, "prop1").stdout_has("\"result\" => \"prop1_a\"");
    read_property(&controller, "prop2").stdout_has("\"result\" => \"prop2_a\"");
}

#[test]
fn failed_batch_rolls_back_every_step() {
    let controller = Controller::start();
    controller
        .mgmt()
        .args(&["--command", "/system-property=prop1:add(value=prop1_a)"])
        .passes()
        .stdout_has("\"outcome\" => \"success\"");

    controller
        .mgmt()
        .stdin(&[
            "batch",
            "/system-property=prop2:add(value=prop2_a)",
            "/system-property=prop1:add(value=prop1_b)",
            "run-batch",
        ])
        .fails()
        .stderr_has("Error: The batch failed with the following error")
        .stderr_has("CTL0062: Composite operation failed and was rolled back")
        .stderr_has("/system-property=prop1:add(value=prop1_b)")
        .stderr_has("CTL0212");

    read_property(&controller, "prop1").stdout_has("\"result\" => \"prop1_a\"");
    controller
        .mgmt()
        .args(&[
            "--command",
            "/system-property=prop2:read-attribute(name=value)",
        ])
        .fails()
        .stderr_has("CTL0216");
}

#[test]
fn lines_are_not_executed_while_batching() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&[
            "--commands",
            "batch,/system-property=held:add(value=1),list-batch,discard-batch",
        ])
        .passes()
        .stdout_eq("#1 /system-property=held:add(value=1)\n");

    controller
        .mgmt()
        .args(&["--command", "/system-property=held:read-resource"])
        .fails()
        .stderr_has("CTL0216");
}

#[test]
fn run_batch_with_headers() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&[
            "--commands",
            "batch,/system-property=h:add(value=1),run-batch --headers={rollback-on-runtime-failure=true}",
        ])
        .passes()
        .stdout_eq("The batch executed successfully\n");
}

#[test]
fn verbose_run_prints_the_composite_response() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&[
            "--commands",
            "batch,/system-property=v:add(value=1),run-batch --verbose",
        ])
        .passes()
        .stdout_has("\"outcome\" => \"success\"")
        .stdout_has("step-1");
}

#[test]
fn stdin_batch_left_open_is_not_run() {
    let controller = Controller::start();

    controller
        .mgmt()
        .stdin(&["batch", "/system-property=open:add(value=1)"])
        .passes()
        .stderr_has("Warning: input ended in batch mode");

    controller
        .mgmt()
        .args(&["--command", "/system-property=open:read-resource"])
        .fails();
}

#[test]
fn json_output() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&[
            "-o",
            "json",
            "--commands",
            "batch,/system-property=j:add(value=1),run-batch",
        ])
        .passes()
        .stdout_has("\"message\": \"The batch executed successfully\"");
}
