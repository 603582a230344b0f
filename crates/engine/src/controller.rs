// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seams to the request parser and the controller transport.

use async_trait::async_trait;
use mgmt_core::{ControllerResponse, Operation};
use mgmt_shell::{parse_operation, ParseError};
use thiserror::Error;

/// Transport-level failures. A failed operation is not one of these: it
/// arrives as a `failed` [`ControllerResponse`].
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("cannot connect to the controller: {0}")]
    Connect(String),
    #[error("timed out waiting for the controller")]
    Timeout,
    #[error("controller protocol error: {0}")]
    Protocol(String),
    #[error("controller rejected the request: {0}")]
    Rejected(String),
}

/// Something that executes operations.
#[async_trait]
pub trait Controller: Send + Sync {
    async fn execute(&self, operation: &Operation) -> Result<ControllerResponse, ControllerError>;
}

/// Turns one command line into an operation.
pub trait RequestBuilder: Send + Sync {
    fn build_request(&self, line: &str) -> Result<Operation, ParseError>;
}

/// The standard operation request syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl RequestBuilder for LineParser {
    fn build_request(&self, line: &str) -> Result<Operation, ParseError> {
        parse_operation(line)
    }
}
