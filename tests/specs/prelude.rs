//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for driving the `mgmtd` controller and the
//! `mgmt` CLI as black boxes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

// Aggressive timeouts for fast tests.
const MGMT_TIMEOUT_IPC_MS: &str = "2000";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Locate a workspace binary: the coverage target dir, the regular debug
/// dir, then next to the running spec binary (`target/debug/deps/..`).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let beside_specs = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(|dir| dir.join(name)));

    [
        Some(manifest_dir.join("target/llvm-cov-target/debug").join(name)),
        Some(manifest_dir.join("target/debug").join(name)),
        beside_specs,
    ]
    .into_iter()
    .flatten()
    .find(|candidate| candidate.exists())
    .unwrap_or_else(|| manifest_dir.join("target/debug").join(name))
}

/// Returns the path to the mgmt binary.
fn mgmt_binary() -> PathBuf {
    binary_path("mgmt")
}

/// Returns the path to the mgmtd controller binary.
pub fn mgmtd_binary() -> PathBuf {
    binary_path("mgmtd")
}

/// Create a CLI builder for mgmt commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: Option<String>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: vec![("MGMT_TIMEOUT_IPC_MS".into(), MGMT_TIMEOUT_IPC_MS.into())],
            stdin: None,
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Feed these lines on stdin
    pub fn stdin(mut self, lines: &[&str]) -> Self {
        let mut text = lines.join("\n");
        text.push('\n');
        self.stdin = Some(text);
        self
    }

    /// Build the command without running it
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(mgmt_binary());
        cmd.args(&self.args);

        // Keep the parent's settings from leaking into tests.
        cmd.env_remove("MGMT_CONTROLLER");
        cmd.env_remove("MGMT_LOG");

        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    fn output(self) -> Output {
        let mut cmd = self.command();
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().expect("command should run");
        let mut pipe = child.stdin.take().unwrap();
        if let Some(text) = &self.stdin {
            pipe.write_all(text.as_bytes()).unwrap();
        }
        drop(pipe);
        child.wait_with_output().expect("command should finish")
    }

    fn expect_exit(self, success: bool) -> RunAssert {
        let output = self.output();
        assert_eq!(
            output.status.success(),
            success,
            "expected mgmt to {}, exit code {:?}\nstdout: {}\nstderr: {}",
            if success { "pass" } else { "fail" },
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect exit code 0
    pub fn passes(self) -> RunAssert {
        self.expect_exit(true)
    }

    /// Run and expect a non-zero exit code
    pub fn fails(self) -> RunAssert {
        self.expect_exit(false)
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

impl RunAssert {
    fn text(&self, stream: Stream) -> String {
        let bytes = match stream {
            Stream::Stdout => &self.output.stdout,
            Stream::Stderr => &self.output.stderr,
        };
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn expect_fragment(self, stream: Stream, fragment: &str, present: bool) -> Self {
        let text = self.text(stream);
        assert_eq!(
            text.contains(fragment),
            present,
            "{} {} '{fragment}'\n{}: {text}",
            stream.name(),
            if present { "lacks" } else { "unexpectedly has" },
            stream.name(),
        );
        self
    }

    pub fn stdout(&self) -> String {
        self.text(Stream::Stdout)
    }

    pub fn stderr(&self) -> String {
        self.text(Stream::Stderr)
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// Exact stdout, diffed on mismatch. Use for output-format specs.
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stderr_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stderr(), expected);
        self
    }

    pub fn stdout_has(self, fragment: &str) -> Self {
        self.expect_fragment(Stream::Stdout, fragment, true)
    }

    pub fn stdout_lacks(self, fragment: &str) -> Self {
        self.expect_fragment(Stream::Stdout, fragment, false)
    }

    pub fn stderr_has(self, fragment: &str) -> Self {
        self.expect_fragment(Stream::Stderr, fragment, true)
    }

    pub fn stderr_lacks(self, fragment: &str) -> Self {
        self.expect_fragment(Stream::Stderr, fragment, false)
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Controller
// =============================================================================

/// A running `mgmtd` with an isolated state directory.
pub struct Controller {
    state_dir: tempfile::TempDir,
    child: Option<Child>,
}

impl Controller {
    /// Start a controller on a fresh state directory and wait for READY.
    pub fn start() -> Self {
        let mut controller = Self {
            state_dir: tempfile::tempdir().unwrap(),
            child: None,
        };
        controller.restart();
        controller
    }

    /// Start (or start again) on the same state directory.
    pub fn restart(&mut self) {
        self.stop();
        let mut child = self.daemon_cmd().stdout(Stdio::piped()).spawn().unwrap();
        let stdout = child.stdout.take().unwrap();
        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line).unwrap();
        assert_eq!(
            line.trim(),
            "READY",
            "controller did not start\nlog: {}",
            self.log()
        );
        self.child = Some(child);
    }

    /// A bare `mgmtd` command bound to this state directory.
    pub fn daemon_cmd(&self) -> Command {
        let mut cmd = Command::new(mgmtd_binary());
        cmd.env("MGMT_STATE_DIR", self.state_path())
            .env_remove("XDG_STATE_HOME")
            .env_remove("MGMT_LOG")
            .stdin(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    /// Run mgmt against this controller
    pub fn mgmt(&self) -> CliBuilder {
        cli().env("MGMT_STATE_DIR", self.state_path())
    }

    /// Get the isolated state directory path
    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Read the controller log file contents (for debugging test failures)
    pub fn log(&self) -> String {
        let log_path = self.state_path().join("controller.log");
        std::fs::read_to_string(log_path).unwrap_or_else(|_| "(no controller log)".to_string())
    }

    /// Ask the controller to exit and wait for it.
    pub fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        let mut cmd = self.mgmt().args(&["--shutdown"]).command();
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        let _ = cmd.status();
        let exited = wait_for(SPEC_WAIT_MAX_MS, || matches!(child.try_wait(), Ok(Some(_))));
        if !exited {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read the `value` attribute of a system property through the CLI.
pub fn read_property(controller: &Controller, name: &str) -> RunAssert {
    controller
        .mgmt()
        .args(&[
            "--command",
            &format!("/system-property={name}:read-attribute(name=value)"),
        ])
        .passes()
}
