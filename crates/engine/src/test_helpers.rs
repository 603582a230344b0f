// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use mgmt_core::{Address, ControllerResponse, ModelValue, Operation};
use mgmt_shell::parse_operation;
use mgmt_storage::ManagedModel;
use parking_lot::Mutex;

use crate::{BatchedCommand, Controller, ControllerError};

/// Controller backed by an in-process managed model.
#[derive(Clone, Default)]
pub(crate) struct LocalController {
    model: Arc<Mutex<ManagedModel>>,
    executed: Arc<Mutex<Vec<Operation>>>,
}

impl LocalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a line directly against the model, bypassing any command context.
    pub fn run(&self, line: &str) -> ControllerResponse {
        self.model.lock().execute(&parse_operation(line).unwrap())
    }

    /// `value` attribute of `/system-property=<name>`.
    pub fn property(&self, name: &str) -> Option<ModelValue> {
        let model = self.model.lock();
        model
            .resource(&Address::root().child("system-property", name))
            .and_then(|r| r.attributes.get("value").cloned())
    }

    pub fn snapshot(&self) -> ManagedModel {
        self.model.lock().clone()
    }

    /// Operations received through the [`Controller`] trait.
    pub fn executed(&self) -> Vec<Operation> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl Controller for LocalController {
    async fn execute(&self, operation: &Operation) -> Result<ControllerResponse, ControllerError> {
        self.executed.lock().push(operation.clone());
        Ok(self.model.lock().execute(operation))
    }
}

struct FakeState {
    calls: Vec<Operation>,
    replies: VecDeque<Result<ControllerResponse, ControllerError>>,
}

/// Controller with scripted replies. Unscripted calls succeed with no result.
#[derive(Clone)]
pub(crate) struct FakeController {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeController {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                replies: VecDeque::new(),
            })),
        }
    }
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Result<ControllerResponse, ControllerError>) {
        self.inner.lock().replies.push_back(reply);
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl Controller for FakeController {
    async fn execute(&self, operation: &Operation) -> Result<ControllerResponse, ControllerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(operation.clone());
        inner
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(ControllerResponse::success(None)))
    }
}

/// Build a batched command from its line.
pub(crate) fn step(line: &str) -> BatchedCommand {
    BatchedCommand::new(line, parse_operation(line).unwrap())
}
