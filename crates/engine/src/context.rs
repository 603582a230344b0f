// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command context: one command session's batch state plus dispatch.
//!
//! [`CommandContext::handle`] routes each line to the batch state machine
//! when it is a batch command, captures it into the active batch when in
//! batch mode, and executes it immediately otherwise.

use std::path::{Path, PathBuf};

use mgmt_core::ControllerResponse;
use mgmt_shell::{is_skippable, ParseError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::batch::{Batch, BatchError, BatchSession, BatchedCommand};
use crate::command::{BatchCommand, RunBatchArgs};
use crate::composite::build_composite;
use crate::controller::{Controller, ControllerError, LineParser, RequestBuilder};
use crate::outcome::{interpret, BatchFailure, BatchOutcome, BATCH_SUCCEEDED};
use crate::store::NamedBatchStore;

/// Errors from handling one line. All are recoverable: the session stays
/// usable and batch state is left as it was, except where noted.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error("{0}")]
    Usage(String),
    #[error("{source}")]
    Parse {
        line: String,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Controller(#[from] ControllerError),
    /// An immediately executed operation came back `failed`.
    #[error("{0}")]
    OperationFailed(String),
    #[error("{0}")]
    BatchFailed(BatchFailure),
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    /// Caret diagnostic for parse errors.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            CommandError::Parse { line, source } => source.context(line, 60),
            _ => None,
        }
    }
}

/// What a successfully handled line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Nothing to print (state change only, or a skipped line).
    Nothing,
    Message(String),
    Lines(Vec<String>),
    /// Controller response to an executed operation.
    Response(ControllerResponse),
}

/// One command session.
pub struct CommandContext<C, B = LineParser> {
    controller: C,
    builder: B,
    session: BatchSession,
    store: NamedBatchStore,
}

impl<C: Controller> CommandContext<C> {
    pub fn new(controller: C) -> Self {
        Self::with_builder(controller, LineParser)
    }
}

impl<C: Controller, B: RequestBuilder> CommandContext<C, B> {
    pub fn with_builder(controller: C, builder: B) -> Self {
        Self {
            controller,
            builder,
            session: BatchSession::new(),
            store: NamedBatchStore::new(),
        }
    }

    pub fn is_batch_mode(&self) -> bool {
        self.session.is_active()
    }

    pub fn session(&self) -> &BatchSession {
        &self.session
    }

    pub fn store(&self) -> &NamedBatchStore {
        &self.store
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Handle one command line.
    pub async fn handle(&mut self, line: &str) -> Result<CommandOutput, CommandError> {
        if is_skippable(line) {
            return Ok(CommandOutput::Nothing);
        }
        match BatchCommand::parse(line) {
            Some(command) => self.batch_command(command?).await,
            None => self.operation(line.trim()).await,
        }
    }

    async fn batch_command(&mut self, command: BatchCommand) -> Result<CommandOutput, CommandError> {
        match command {
            BatchCommand::Batch { name: None } => {
                self.session.enter()?;
                debug!("entered batch mode");
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::Batch { name: Some(name) } => {
                if self.session.is_active() {
                    return Err(BatchError::AlreadyActive.into());
                }
                let batch = self.store.activate(&name)?;
                debug!(name = %name, steps = batch.len(), "re-activated held back batch");
                self.session.install(batch)?;
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::ListHeldBack => Ok(CommandOutput::Lines(
                self.store.names().map(str::to_string).collect(),
            )),
            BatchCommand::RunBatch(args) => self.run_batch(args).await,
            BatchCommand::DiscardBatch => {
                let batch = self.session.take()?;
                debug!(steps = batch.len(), "discarded batch");
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::HoldbackBatch { name } => {
                if !self.session.is_active() {
                    return Err(BatchError::NotActive.into());
                }
                if self.store.contains(&name) {
                    return Err(BatchError::DuplicateName(name).into());
                }
                let batch = self.session.take()?;
                debug!(name = %name, steps = batch.len(), "held back batch");
                self.store.hold_back(&name, batch)?;
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::ListBatch => {
                let batch = self.session.current()?;
                if batch.is_empty() {
                    Ok(CommandOutput::Message("The batch is empty.".to_string()))
                } else {
                    Ok(CommandOutput::Lines(batch.listing()))
                }
            }
            BatchCommand::ClearBatch => {
                self.session.current_mut()?.clear();
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::RemoveLine { line } => {
                self.session.current_mut()?.remove_line(line)?;
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::MoveLine { from, to } => {
                self.session.current_mut()?.move_line(from, to)?;
                Ok(CommandOutput::Nothing)
            }
            BatchCommand::EditLine { line, text } => {
                self.session.current()?;
                let command = self.build(&text)?;
                self.session.current_mut()?.replace_line(line, command)?;
                Ok(CommandOutput::Nothing)
            }
        }
    }

    async fn run_batch(&mut self, args: RunBatchArgs) -> Result<CommandOutput, CommandError> {
        if let Some(path) = &args.file {
            if self.session.is_active() {
                return Err(BatchError::FileInBatchMode.into());
            }
            let batch = self.load_batch_file(path).await?;
            return match self.execute_batch(&batch, &args).await? {
                BatchOutcome::Succeeded(response) => Ok(success_output(response, args.verbose)),
                BatchOutcome::Failed(mut failure) => {
                    failure.session_retained = false;
                    Err(CommandError::BatchFailed(failure))
                }
            };
        }

        let batch = self.session.current()?;
        match self.execute_batch(batch, &args).await? {
            BatchOutcome::Succeeded(response) => {
                self.session.clear();
                Ok(success_output(response, args.verbose))
            }
            BatchOutcome::Failed(failure) => Err(CommandError::BatchFailed(failure)),
        }
    }

    async fn execute_batch(
        &self,
        batch: &Batch,
        args: &RunBatchArgs,
    ) -> Result<BatchOutcome, CommandError> {
        let composite = build_composite(batch.commands(), args.headers.as_ref());
        info!(steps = batch.len(), headers = composite.headers.len(), "running batch");
        let response = self.controller.execute(&composite).await.map_err(|e| {
            warn!(error = %e, "batch was not delivered");
            e
        })?;
        let outcome = interpret(response, batch.commands());
        if let BatchOutcome::Failed(failure) = &outcome {
            info!(code = ?failure.code, rolled_back = failure.rolled_back, "batch failed");
        }
        Ok(outcome)
    }

    async fn load_batch_file(&self, path: &Path) -> Result<Batch, CommandError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CommandError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        text.lines()
            .filter(|line| !is_skippable(line))
            .map(|line| self.build(line.trim()))
            .collect()
    }

    async fn operation(&mut self, line: &str) -> Result<CommandOutput, CommandError> {
        let command = self.build(line)?;
        if self.session.is_active() {
            self.session.add_step(command)?;
            return Ok(CommandOutput::Nothing);
        }
        let response = self.controller.execute(&command.operation).await?;
        if response.is_success() {
            Ok(CommandOutput::Response(response))
        } else {
            let message = response
                .failure_message()
                .unwrap_or_else(|| "operation failed".to_string());
            Err(CommandError::OperationFailed(message))
        }
    }

    fn build(&self, line: &str) -> Result<BatchedCommand, CommandError> {
        let operation = self
            .builder
            .build_request(line)
            .map_err(|source| CommandError::Parse {
                line: line.to_string(),
                source,
            })?;
        Ok(BatchedCommand::new(line, operation))
    }
}

fn success_output(response: ControllerResponse, verbose: bool) -> CommandOutput {
    if verbose {
        CommandOutput::Response(response)
    } else {
        CommandOutput::Message(BATCH_SUCCEEDED.to_string())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
