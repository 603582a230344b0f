// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk copy of the managed model, kept across controller restarts.
//!
//! The file is JSON with a `format` tag. A file that cannot be decoded is
//! quarantined next to the original (`model.bak`, `model.bak.2`, ...) and
//! the controller starts empty. A file written by a newer format is refused
//! rather than quarantined so a downgrade cannot silently discard a model.

use crate::ManagedModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Format tag written into every snapshot.
pub const SNAPSHOT_FORMAT: u32 = 1;

/// Quarantined copies kept per snapshot path.
const KEPT_QUARANTINES: u32 = 3;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot {path} has format {found}, this controller reads up to {SNAPSHOT_FORMAT}")]
    UnsupportedFormat { path: PathBuf, found: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "first_format")]
    pub format: u32,
    /// Model revision at capture time
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub model: ManagedModel,
}

fn first_format() -> u32 {
    1
}

impl Snapshot {
    /// Copy the model as it stands now.
    pub fn capture(model: &ManagedModel) -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            revision: model.revision(),
            created_at: Utc::now(),
            model: model.clone(),
        }
    }

    /// Write through a sibling `.tmp` file so readers never see a partial model.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_vec(self)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let staging = path.with_extension("tmp");
        let mut file = fs::File::create(&staging)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, path)?;

        debug!(
            revision = self.revision,
            bytes = encoded.len(),
            path = %path.display(),
            "saved model snapshot"
        );
        Ok(())
    }

    /// Read the snapshot at `path`.
    ///
    /// `Ok(None)` when there is no file, or when the file was unreadable and
    /// has been quarantined.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let moved_to = quarantine(path)?;
                warn!(
                    error = %e,
                    path = %path.display(),
                    moved_to = %moved_to.display(),
                    "unreadable model snapshot, starting with an empty model"
                );
                return Ok(None);
            }
        };

        if snapshot.format > SNAPSHOT_FORMAT {
            return Err(SnapshotError::UnsupportedFormat {
                path: path.to_path_buf(),
                found: snapshot.format,
            });
        }
        Ok(Some(snapshot))
    }
}

/// `model.bak` for generation 1, `model.bak.N` after that.
fn quarantine_path(path: &Path, generation: u32) -> PathBuf {
    match generation {
        1 => path.with_extension("bak"),
        n => path.with_extension(format!("bak.{n}")),
    }
}

/// Move `path` into generation 1, ageing older copies and dropping the last.
fn quarantine(path: &Path) -> Result<PathBuf, SnapshotError> {
    match fs::remove_file(quarantine_path(path, KEPT_QUARANTINES)) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    for generation in (1..KEPT_QUARANTINES).rev() {
        let from = quarantine_path(path, generation);
        if from.exists() {
            fs::rename(&from, quarantine_path(path, generation + 1))?;
        }
    }

    let target = quarantine_path(path, 1);
    fs::rename(path, &target)?;
    Ok(target)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
