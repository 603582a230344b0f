// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feeds command lines through a [`CommandContext`] and prints the results.

use std::io::Write;

use mgmt_engine::{CommandContext, Controller};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::output::{render_error, render_output, OutputFormat};

/// What to do after a line fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    Stop,
    Continue,
}

/// Counts for one run of input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub handled: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

pub struct Session<C: Controller> {
    ctx: CommandContext<C>,
    format: OutputFormat,
}

impl<C: Controller> Session<C> {
    pub fn new(controller: C, format: OutputFormat) -> Self {
        Self {
            ctx: CommandContext::new(controller),
            format,
        }
    }

    pub fn is_batch_mode(&self) -> bool {
        self.ctx.is_batch_mode()
    }

    /// Handle one line, printing its output or error. Returns whether it succeeded.
    pub async fn run_line<O: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut O,
        err: &mut E,
    ) -> std::io::Result<bool> {
        match self.ctx.handle(line).await {
            Ok(output) => {
                if let Some(text) = render_output(&output, self.format) {
                    writeln!(out, "{}", text)?;
                }
                Ok(true)
            }
            Err(e) => {
                writeln!(err, "{}", render_error(&e))?;
                Ok(false)
            }
        }
    }

    /// Run a fixed list of lines.
    pub async fn run_lines<I, O, E>(
        &mut self,
        lines: I,
        on_error: OnError,
        out: &mut O,
        err: &mut E,
    ) -> std::io::Result<RunSummary>
    where
        I: IntoIterator<Item = String>,
        O: Write,
        E: Write,
    {
        let mut summary = RunSummary::default();
        for line in lines {
            if !self.step(&line, on_error, &mut summary, out, err).await? {
                break;
            }
        }
        self.finish(err)?;
        Ok(summary)
    }

    /// Run lines as they arrive from a reader (stdin).
    pub async fn run_reader<R, O, E>(
        &mut self,
        reader: R,
        on_error: OnError,
        out: &mut O,
        err: &mut E,
    ) -> std::io::Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        O: Write,
        E: Write,
    {
        let mut summary = RunSummary::default();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if !self.step(&line, on_error, &mut summary, out, err).await? {
                break;
            }
            out.flush()?;
        }
        self.finish(err)?;
        Ok(summary)
    }

    /// Returns false when input should stop.
    async fn step<O: Write, E: Write>(
        &mut self,
        line: &str,
        on_error: OnError,
        summary: &mut RunSummary,
        out: &mut O,
        err: &mut E,
    ) -> std::io::Result<bool> {
        summary.handled += 1;
        if self.run_line(line, out, err).await? {
            return Ok(true);
        }
        summary.failed += 1;
        Ok(on_error == OnError::Continue)
    }

    fn finish<E: Write>(&self, err: &mut E) -> std::io::Result<()> {
        if self.is_batch_mode() {
            let pending = self.ctx.session().current_steps().len();
            warn!(pending, "input ended in batch mode");
            writeln!(
                err,
                "Warning: input ended in batch mode; the batch ({} command(s)) was not run",
                pending
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
