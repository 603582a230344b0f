// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serialized snapshot writes.
//!
//! Connections are served concurrently, so two mutating requests can finish
//! at nearly the same time and race to write the snapshot. The checkpointer
//! serializes writes and drops any snapshot older than the one already on
//! disk, so the file only ever moves forward in revision.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::{Snapshot, SnapshotError};

/// Writes model snapshots to one path, newest revision wins.
#[derive(Debug)]
pub struct Checkpointer {
    path: PathBuf,
    saved_revision: Mutex<u64>,
}

impl Checkpointer {
    /// `revision` is the revision already persisted at `path` (0 if none).
    pub fn new(path: PathBuf, revision: u64) -> Self {
        Self {
            path,
            saved_revision: Mutex::new(revision),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn saved_revision(&self) -> u64 {
        *self.saved_revision.lock()
    }

    /// Persist `snapshot` unless a newer or equal revision is already saved.
    ///
    /// Returns whether the file was written.
    pub fn checkpoint(&self, snapshot: &Snapshot) -> Result<bool, SnapshotError> {
        let mut saved = self.saved_revision.lock();
        if snapshot.revision <= *saved {
            debug!(
                revision = snapshot.revision,
                saved = *saved,
                "skipping stale snapshot"
            );
            return Ok(false);
        }
        snapshot.save(&self.path)?;
        *saved = snapshot.revision;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
