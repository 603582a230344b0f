// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The active batch of a command session.

use mgmt_core::Operation;
use thiserror::Error;

/// Sequencing errors of the batch commands. None of them change state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("already in batch mode")]
    AlreadyActive,
    #[error("not in batch mode")]
    NotActive,
    #[error("no held back batch named '{0}'")]
    NoSuchBatch(String),
    #[error("a batch named '{0}' is already held back")]
    DuplicateName(String),
    #[error("batch line {line} does not exist, the batch has {len} line(s)")]
    LineOutOfRange { line: usize, len: usize },
    #[error("run-batch --file cannot be used in batch mode")]
    FileInBatchMode,
}

/// One captured command: the text as typed and the operation built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchedCommand {
    pub line: String,
    pub operation: Operation,
}

impl BatchedCommand {
    pub fn new(line: impl Into<String>, operation: Operation) -> Self {
        Self {
            line: line.into(),
            operation,
        }
    }
}

/// Ordered steps of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    commands: Vec<BatchedCommand>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[BatchedCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: BatchedCommand) {
        self.commands.push(command);
    }

    /// `#1 <line>` listing, 1-based.
    pub fn listing(&self) -> Vec<String> {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, c)| format!("#{} {}", i + 1, c.line))
            .collect()
    }

    fn index(&self, line: usize) -> Result<usize, BatchError> {
        if line == 0 || line > self.commands.len() {
            return Err(BatchError::LineOutOfRange {
                line,
                len: self.commands.len(),
            });
        }
        Ok(line - 1)
    }

    /// Remove the step at 1-based `line`.
    pub fn remove_line(&mut self, line: usize) -> Result<BatchedCommand, BatchError> {
        let index = self.index(line)?;
        Ok(self.commands.remove(index))
    }

    /// Move the step at 1-based `from` so that it ends up at position `to`.
    pub fn move_line(&mut self, from: usize, to: usize) -> Result<(), BatchError> {
        let from_index = self.index(from)?;
        let to_index = self.index(to)?;
        let command = self.commands.remove(from_index);
        self.commands.insert(to_index, command);
        Ok(())
    }

    /// Replace the step at 1-based `line`.
    pub fn replace_line(&mut self, line: usize, command: BatchedCommand) -> Result<(), BatchError> {
        let index = self.index(line)?;
        self.commands[index] = command;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl FromIterator<BatchedCommand> for Batch {
    fn from_iter<I: IntoIterator<Item = BatchedCommand>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// Batch mode state: `Some` while batching.
#[derive(Debug, Default)]
pub struct BatchSession {
    active: Option<Batch>,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Enter batch mode with an empty batch.
    pub fn enter(&mut self) -> Result<(), BatchError> {
        self.install(Batch::new())
    }

    /// Enter batch mode with existing steps.
    pub fn install(&mut self, batch: Batch) -> Result<(), BatchError> {
        if self.active.is_some() {
            return Err(BatchError::AlreadyActive);
        }
        self.active = Some(batch);
        Ok(())
    }

    pub fn add_step(&mut self, command: BatchedCommand) -> Result<(), BatchError> {
        self.current_mut()?.push(command);
        Ok(())
    }

    pub fn current(&self) -> Result<&Batch, BatchError> {
        self.active.as_ref().ok_or(BatchError::NotActive)
    }

    pub fn current_mut(&mut self) -> Result<&mut Batch, BatchError> {
        self.active.as_mut().ok_or(BatchError::NotActive)
    }

    pub fn current_steps(&self) -> &[BatchedCommand] {
        self.active.as_ref().map(Batch::commands).unwrap_or(&[])
    }

    /// Leave batch mode, handing back the steps.
    pub fn take(&mut self) -> Result<Batch, BatchError> {
        self.active.take().ok_or(BatchError::NotActive)
    }

    /// Drop the steps and leave batch mode.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
