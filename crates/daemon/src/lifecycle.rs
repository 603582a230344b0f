// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller lifecycle: exclusive ownership of a state directory, model
//! restore on start, final snapshot and file cleanup on stop.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use mgmt_storage::{Checkpointer, ManagedModel, Snapshot, SnapshotError};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::env::state_dir;

/// File layout of one controller instance.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    /// Locked while the controller runs; holds its PID
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
    pub snapshot_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::in_dir(state_dir()?))
    }

    pub fn in_dir(state_dir: PathBuf) -> Self {
        Self {
            socket_path: state_dir.join("controller.sock"),
            lock_path: state_dir.join("controller.pid"),
            log_path: state_dir.join("controller.log"),
            snapshot_path: state_dir.join("model.json"),
            state_dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: controller already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A running controller.
pub struct ControllerState {
    pub config: Config,
    /// The lock is held for as long as this handle lives
    _lock: File,
    pub model: Arc<Mutex<ManagedModel>>,
    pub checkpointer: Arc<Checkpointer>,
    pub start_time: Instant,
}

pub struct StartupResult {
    pub daemon: ControllerState,
    pub listener: UnixListener,
}

impl ControllerState {
    /// Persist the model one last time and release the state directory.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        let snapshot = Snapshot::capture(&self.model.lock());
        match self.checkpointer.checkpoint(&snapshot) {
            Ok(true) => info!(revision = snapshot.revision, "saved final snapshot"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "failed to save final snapshot"),
        }
        release_files(&self.config);
        Ok(())
    }
}

/// Claim the state directory, restore the model, then bind the socket.
///
/// Any failure after the lock was taken removes the socket and PID files
/// again. A lock failure leaves them alone: they belong to the controller
/// that already runs.
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    fs::create_dir_all(&config.state_dir)?;
    let lock = claim(&config.lock_path)?;

    let started = restore_model(&config.snapshot_path).and_then(|model| {
        let listener = bind(&config.socket_path)?;
        Ok((model, listener))
    });
    let (model, listener) = match started {
        Ok(parts) => parts,
        Err(e) => {
            release_files(config);
            return Err(e);
        }
    };

    let checkpointer = Checkpointer::new(config.snapshot_path.clone(), model.revision());
    Ok(StartupResult {
        daemon: ControllerState {
            config: config.clone(),
            _lock: lock,
            model: Arc::new(Mutex::new(model)),
            checkpointer: Arc::new(checkpointer),
            start_time: Instant::now(),
        },
        listener,
    })
}

/// Take the exclusive lock and record our PID in the lock file.
fn claim(lock_path: &Path) -> Result<File, LifecycleError> {
    // Truncating before the lock is held would wipe a running controller's PID
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

fn restore_model(snapshot_path: &Path) -> Result<ManagedModel, LifecycleError> {
    Ok(match Snapshot::load(snapshot_path)? {
        Some(snapshot) => {
            info!(
                revision = snapshot.revision,
                created_at = %snapshot.created_at,
                "restored model snapshot"
            );
            snapshot.model
        }
        None => {
            info!("no usable snapshot, starting with an empty model");
            ManagedModel::new()
        }
    })
}

fn bind(socket_path: &Path) -> Result<UnixListener, LifecycleError> {
    // A stale socket from a crashed run blocks bind
    if socket_path.exists() {
        fs::remove_file(socket_path)?;
    }
    UnixListener::bind(socket_path)
        .map_err(|e| LifecycleError::BindFailed(socket_path.to_path_buf(), e))
}

fn release_files(config: &Config) {
    for (path, what) in [(&config.socket_path, "socket"), (&config.lock_path, "PID")] {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, file = what, "failed to remove controller file"),
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
