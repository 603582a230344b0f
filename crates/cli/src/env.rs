// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::client::ClientError;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

// --- State directory ---

/// Resolve state directory: MGMT_STATE_DIR > XDG_STATE_HOME/mgmt > ~/.local/state/mgmt
pub fn state_dir() -> Result<PathBuf, ClientError> {
    if let Ok(dir) = std::env::var("MGMT_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("mgmt"));
    }
    let home = std::env::var("HOME").map_err(|_| ClientError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/mgmt"))
}

// --- Controller ---

pub fn controller_socket() -> Option<PathBuf> {
    std::env::var("MGMT_CONTROLLER")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

pub fn timeout_ipc_ms() -> Option<Duration> {
    parse_duration_ms("MGMT_TIMEOUT_IPC_MS")
}

// --- Logging ---

pub fn log_filter() -> Option<String> {
    std::env::var("MGMT_LOG").ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
