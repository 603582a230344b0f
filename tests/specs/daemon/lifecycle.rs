//! Controller lifecycle specs
//!
//! Verify startup files, single-instance locking, shutdown and persistence.

use crate::prelude::*;

#[test]
fn startup_creates_state_files() {
    let controller = Controller::start();
    let state = controller.state_path();

    assert!(state.join("controller.sock").exists());
    assert!(state.join("controller.pid").exists());
    assert!(controller.log().contains("--- mgmtd: starting (pid: "));
}

#[test]
fn second_instance_is_refused() {
    let controller = Controller::start();

    let output = controller.daemon_cmd().output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mgmtd is already running"));
}

#[test]
fn shutdown_removes_socket() {
    let mut controller = Controller::start();
    controller.stop();

    let state = controller.state_path().to_path_buf();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || !state.join("controller.sock").exists()));
    assert!(!state.join("controller.pid").exists());
}

#[test]
fn model_survives_restart() {
    let mut controller = Controller::start();
    controller
        .mgmt()
        .args(&[
            "--commands",
            "batch,/system-property=durable:add(value=yes),run-batch",
        ])
        .passes();
    assert!(controller.state_path().join("model.json").exists());

    controller.restart();

    read_property(&controller, "durable").stdout_has("\"result\" => \"yes\"");
}

#[test]
fn daemon_version_and_help() {
    let controller = Controller::start();

    let version = controller.daemon_cmd().arg("--version").output().unwrap();
    assert!(String::from_utf8_lossy(&version.stdout)
        .starts_with(&format!("mgmtd {}", env!("CARGO_PKG_VERSION"))));

    let help = controller.daemon_cmd().arg("--help").output().unwrap();
    assert!(String::from_utf8_lossy(&help.stdout).contains("controller.sock"));
}
