// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recognition of the batch control commands.

use std::path::PathBuf;

use indexmap::IndexMap;
use mgmt_core::ModelValue;
use mgmt_shell::{parse_headers, split_args, split_command};

use crate::context::CommandError;

/// Options of `run-batch`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunBatchArgs {
    pub headers: Option<IndexMap<String, ModelValue>>,
    pub verbose: bool,
    pub file: Option<PathBuf>,
}

/// A parsed batch control command.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCommand {
    /// `batch`, or `batch <name>` to re-activate a held-back batch.
    Batch { name: Option<String> },
    /// `batch -l`
    ListHeldBack,
    RunBatch(RunBatchArgs),
    DiscardBatch,
    HoldbackBatch { name: String },
    ListBatch,
    ClearBatch,
    RemoveLine { line: usize },
    MoveLine { from: usize, to: usize },
    EditLine { line: usize, text: String },
}

impl BatchCommand {
    /// `None` when `line` is not a batch command and should be treated as
    /// an operation request.
    pub fn parse(line: &str) -> Option<Result<Self, CommandError>> {
        let (word, rest) = split_command(line);
        let parsed = match word {
            "batch" => parse_batch(rest),
            "run-batch" => parse_run_batch(rest).map(BatchCommand::RunBatch),
            "discard-batch" => no_args(word, rest, BatchCommand::DiscardBatch),
            "holdback-batch" => single_name(word, rest).map(|name| BatchCommand::HoldbackBatch { name }),
            "list-batch" => no_args(word, rest, BatchCommand::ListBatch),
            "clear-batch" => no_args(word, rest, BatchCommand::ClearBatch),
            "remove-batch-line" => {
                line_number(word, rest).map(|line| BatchCommand::RemoveLine { line })
            }
            "move-batch-line" => parse_move(rest),
            "edit-batch-line" => parse_edit(rest),
            _ => return None,
        };
        Some(parsed)
    }
}

fn usage(message: impl Into<String>) -> CommandError {
    CommandError::Usage(message.into())
}

fn no_args(word: &str, rest: &str, command: BatchCommand) -> Result<BatchCommand, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(usage(format!("{word} takes no arguments")))
    }
}

/// `"name"` and `'name'` both mean `name`.
fn unquote(word: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = word
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    word
}

fn single_name(word: &str, rest: &str) -> Result<String, CommandError> {
    let args = split_args(rest);
    match args.as_slice() {
        [name] if !unquote(name).is_empty() => Ok(unquote(name).to_string()),
        [] | [_] => Err(usage(format!("{word} requires a batch name"))),
        _ => Err(usage(format!("{word} takes a single batch name"))),
    }
}

fn parse_batch(rest: &str) -> Result<BatchCommand, CommandError> {
    match rest {
        "" => Ok(BatchCommand::Batch { name: None }),
        "-l" => Ok(BatchCommand::ListHeldBack),
        _ => single_name("batch", rest).map(|name| BatchCommand::Batch { name: Some(name) }),
    }
}

fn parse_run_batch(rest: &str) -> Result<RunBatchArgs, CommandError> {
    let mut args = RunBatchArgs::default();
    for arg in split_args(rest) {
        if let Some(text) = arg.strip_prefix("--headers=") {
            let headers = parse_headers(text).map_err(|e| usage(format!("invalid --headers: {e}")))?;
            args.headers = Some(headers);
        } else if let Some(path) = arg.strip_prefix("--file=") {
            if path.is_empty() {
                return Err(usage("--file requires a path"));
            }
            args.file = Some(PathBuf::from(path));
        } else if arg == "--verbose" || arg == "-v" {
            args.verbose = true;
        } else {
            return Err(usage(format!("unrecognized argument '{arg}' for run-batch")));
        }
    }
    Ok(args)
}

fn line_number(word: &str, text: &str) -> Result<usize, CommandError> {
    if text.is_empty() {
        return Err(usage(format!("{word} requires a line number")));
    }
    text.parse::<usize>()
        .map_err(|_| usage(format!("'{text}' is not a valid batch line number")))
}

fn parse_move(rest: &str) -> Result<BatchCommand, CommandError> {
    let args = split_args(rest);
    match args.as_slice() {
        [from, to] => Ok(BatchCommand::MoveLine {
            from: line_number("move-batch-line", from)?,
            to: line_number("move-batch-line", to)?,
        }),
        _ => Err(usage("move-batch-line requires the current and the new line number")),
    }
}

fn parse_edit(rest: &str) -> Result<BatchCommand, CommandError> {
    let (number, text) = split_command(rest);
    let line = line_number("edit-batch-line", number)?;
    if text.is_empty() {
        return Err(usage("edit-batch-line requires the new command line"));
    }
    Ok(BatchCommand::EditLine {
        line,
        text: text.to_string(),
    })
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
