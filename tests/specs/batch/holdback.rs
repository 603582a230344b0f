//! Hold-back specs
//!
//! Held back batches live for one CLI session and come back with all their
//! lines in order.

use crate::prelude::*;

#[test]
fn held_back_batch_is_restored_and_run() {
    let controller = Controller::start();

    controller
        .mgmt()
        .stdin(&[
            "batch",
            "/system-property=a:add(value=1)",
            "/system-property=b:add(value=2)",
            "holdback-batch later",
            "batch -l",
            "/system-property=now:add(value=0)",
            "batch later",
            "list-batch",
            "run-batch",
        ])
        .passes()
        .stdout_has("later\n")
        .stdout_has("#1 /system-property=a:add(value=1)\n#2 /system-property=b:add(value=2)\n")
        .stdout_has("The batch executed successfully");

    read_property(&controller, "a").stdout_has("\"result\" => 1");
    read_property(&controller, "b").stdout_has("\"result\" => 2");
    read_property(&controller, "now").stdout_has("\"result\" => 0");
}

#[test]
fn hold_back_name_collision_keeps_the_active_batch() {
    let controller = Controller::start();

    controller
        .mgmt()
        .stdin(&[
            "batch",
            "/system-property=x:add(value=1)",
            "holdback-batch x",
            "batch",
            "/system-property=y:add(value=2)",
            "holdback-batch x",
            "list-batch",
        ])
        .fails()
        .stderr_has("Error: a batch named 'x' is already held back")
        .stdout_has("#1 /system-property=y:add(value=2)");
}

#[test]
fn unknown_held_back_batch() {
    let controller = Controller::start();

    controller
        .mgmt()
        .args(&["--command", "batch nope"])
        .fails()
        .stderr_has("Error: no held back batch named 'nope'");
}

#[test]
fn sequencing_errors() {
    let controller = Controller::start();

    for line in ["run-batch", "discard-batch", "holdback-batch n"] {
        controller
            .mgmt()
            .args(&["--command", line])
            .fails()
            .stderr_eq("Error: not in batch mode\n");
    }
}
