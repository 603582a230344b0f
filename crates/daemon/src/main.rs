// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Management controller daemon (mgmtd)
//!
//! Owns the managed model and executes operations sent by `mgmt` over a
//! Unix socket. The model is snapshotted after every change and restored
//! on the next start.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod controller_log;
mod env;
mod lifecycle;
mod listener;

use std::fmt;
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

use crate::controller_log::ControllerLog;
use crate::lifecycle::{Config, LifecycleError, StartupResult};
use crate::listener::{ListenCtx, Listener};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Management controller - owns the managed model and executes operations

USAGE:
    mgmtd

Listens on <state dir>/controller.sock for requests from `mgmt`.
The state dir is $MGMT_STATE_DIR, $XDG_STATE_HOME/mgmt or
~/.local/state/mgmt. Log verbosity follows $MGMT_LOG (default: info).

OPTIONS:
    -h, --help       Print help information
    -v, --version    Print version information";

/// What the command line asks for. The daemon takes no options of its own.
#[derive(Debug, PartialEq)]
enum Invocation {
    Serve,
    Version,
    Help,
    Unexpected(String),
}

fn invocation(mut args: impl Iterator<Item = String>) -> Invocation {
    match args.nth(1).as_deref() {
        None => Invocation::Serve,
        Some("--version" | "-V" | "-v") => Invocation::Version,
        Some("--help" | "-h" | "help") => Invocation::Help,
        Some(other) => Invocation::Unexpected(other.to_string()),
    }
}

/// Why the main loop stopped serving.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StopReason {
    Requested,
    Terminate,
    Interrupt,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Requested => "shutdown requested by a client",
            StopReason::Terminate => "received SIGTERM",
            StopReason::Interrupt => "received SIGINT",
        })
    }
}

async fn wait_for_stop(requested: &Notify) -> std::io::Result<StopReason> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(tokio::select! {
        _ = requested.notified() => StopReason::Requested,
        _ = sigterm.recv() => StopReason::Terminate,
        _ = sigint.recv() => StopReason::Interrupt,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match invocation(std::env::args()) {
        Invocation::Serve => {}
        Invocation::Version => {
            println!("mgmtd {VERSION}");
            return Ok(());
        }
        Invocation::Help => {
            println!("mgmtd {VERSION}\n{USAGE}");
            return Ok(());
        }
        Invocation::Unexpected(arg) => {
            eprintln!("error: unexpected argument '{arg}'");
            eprintln!("Usage: mgmtd [--help | --version]");
            std::process::exit(1);
        }
    }

    let config = Config::load()?;
    let log = ControllerLog::new(&config);
    let rotated = log.rotate();
    log.mark_startup()?;
    let log_guard = log.install(&env::log_filter())?;
    info!(version = VERSION, log = %log.path().display(), rotated, "starting controller");

    let StartupResult {
        mut daemon,
        listener: socket,
    } = match lifecycle::startup(&config).await {
        Ok(started) => started,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path).unwrap_or_default();
            eprintln!("mgmtd is already running");
            if !pid.trim().is_empty() {
                eprintln!("  pid: {}", pid.trim());
            }
            std::process::exit(1);
        }
        Err(e) => {
            log.record_startup_failure(&e);
            error!(error = %e, "controller failed to start");
            drop(log_guard);
            return Err(e.into());
        }
    };

    let requested = Arc::new(Notify::new());
    let listener = Listener::new(
        socket,
        ListenCtx {
            model: Arc::clone(&daemon.model),
            checkpointer: Arc::clone(&daemon.checkpointer),
            shutdown: Arc::clone(&requested),
        },
    );
    tokio::spawn(listener.run());

    info!(socket = %config.socket_path.display(), "controller ready");
    // The parent waits for this line before talking to the socket
    println!("READY");

    let reason = wait_for_stop(&requested).await?;
    info!(%reason, "stopping controller");

    daemon.shutdown()?;
    info!(
        uptime_secs = daemon.start_time.elapsed().as_secs(),
        "controller stopped"
    );
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
