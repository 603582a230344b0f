// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Held-back batches, keyed by name.

use indexmap::IndexMap;

use crate::batch::{Batch, BatchError};

/// Batches parked with `holdback-batch`, in hold-back order.
///
/// Entries live as long as the owning command context.
#[derive(Debug, Default)]
pub struct NamedBatchStore {
    batches: IndexMap<String, Batch>,
}

impl NamedBatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.batches.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.batches.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Park `batch` under `name`. An existing name is never overwritten.
    pub fn hold_back(&mut self, name: &str, batch: Batch) -> Result<(), BatchError> {
        if self.batches.contains_key(name) {
            return Err(BatchError::DuplicateName(name.to_string()));
        }
        self.batches.insert(name.to_string(), batch);
        Ok(())
    }

    /// Remove and return the batch held back under `name`.
    pub fn activate(&mut self, name: &str) -> Result<Batch, BatchError> {
        self.batches
            .shift_remove(name)
            .ok_or_else(|| BatchError::NoSuchBatch(name.to_string()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
