// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The controller's log file: size-based rotation, the synchronous lines
//! written around startup, and the non-blocking `tracing` writer.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

use crate::lifecycle::{Config, LifecycleError};

/// Every controller run starts its log section with
/// `--- mgmtd: starting (pid: N) ---`.
pub const STARTUP_MARKER_PREFIX: &str = "--- mgmtd: starting (pid: ";

/// Rotate once the log grows past this many bytes.
pub const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;

/// Generations kept after rotation: `.1` newest through `.3` oldest.
const GENERATIONS: u32 = 3;

pub struct ControllerLog {
    path: PathBuf,
}

impl ControllerLog {
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.log_path.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn generation(&self, n: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Age an oversized log into `.1`. Returns whether a rotation happened.
    pub fn rotate(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > ROTATE_AT_BYTES => {}
            _ => return false,
        }
        let _ = fs::remove_file(self.generation(GENERATIONS));
        for n in (1..GENERATIONS).rev() {
            let from = self.generation(n);
            if from.exists() {
                let _ = fs::rename(&from, self.generation(n + 1));
            }
        }
        fs::rename(&self.path, self.generation(1)).is_ok()
    }

    fn append_line(&self, line: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }

    /// Written before the subscriber exists, so it precedes this run's lines.
    pub fn mark_startup(&self) -> Result<(), LifecycleError> {
        self.append_line(&format!(
            "{STARTUP_MARKER_PREFIX}{}) ---",
            std::process::id()
        ))?;
        Ok(())
    }

    /// The non-blocking writer may not flush before the process exits.
    pub fn record_startup_failure(&self, error: &LifecycleError) {
        let _ = self.append_line(&format!("ERROR Failed to start controller: {error}"));
    }

    /// Install the global subscriber writing into this file.
    pub fn install(&self, filter: &str) -> Result<WorkerGuard, LifecycleError> {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let dir = self.path.parent().ok_or(LifecycleError::NoStateDir)?;
        let file = self.path.file_name().ok_or(LifecycleError::NoStateDir)?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

        let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .init();
        Ok(guard)
    }
}

#[cfg(test)]
#[path = "controller_log_tests.rs"]
mod tests;
