// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Batch execution engine for the management CLI

mod batch;
mod command;
mod composite;
mod context;
mod controller;
mod outcome;
mod store;

#[cfg(test)]
mod test_helpers;

pub use batch::{Batch, BatchError, BatchSession, BatchedCommand};
pub use command::{BatchCommand, RunBatchArgs};
pub use composite::build_composite;
pub use context::{CommandContext, CommandError, CommandOutput};
pub use controller::{Controller, ControllerError, LineParser, RequestBuilder};
pub use outcome::{interpret, BatchFailure, BatchOutcome, FailedStep, BATCH_SUCCEEDED};
pub use store::NamedBatchStore;
