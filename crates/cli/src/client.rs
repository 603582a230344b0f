// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller client for the CLI

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use mgmt_core::{ControllerResponse, Operation};
use mgmt_daemon::protocol::{self, ProtocolError};
use mgmt_daemon::{Request, Response, DEFAULT_TIMEOUT};
use mgmt_engine::{Controller, ControllerError};
use thiserror::Error;
use tokio::net::UnixStream;
use tracing::debug;

use crate::env;

/// Timeout for one request/response exchange
pub fn timeout_ipc() -> Duration {
    env::timeout_ipc_ms().unwrap_or(DEFAULT_TIMEOUT)
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Controller not running (no socket at {})", .0.display())]
    NotRunning(PathBuf),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response from controller")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,
}

/// Connection settings for the controller socket. Each request opens a
/// fresh connection.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl ControllerClient {
    pub fn new(socket_path: PathBuf, timeout: Duration) -> Self {
        Self {
            socket_path,
            timeout,
        }
    }

    /// Socket from `explicit`, then `MGMT_CONTROLLER`, then the state dir.
    pub fn resolve(explicit: Option<PathBuf>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let socket_path = match explicit.or_else(env::controller_socket) {
            Some(path) => path,
            None => env::state_dir()?.join("controller.sock"),
        };
        Ok(Self::new(socket_path, timeout.unwrap_or_else(timeout_ipc)))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = match UnixStream::connect(&self.socket_path).await {
            Ok(stream) => stream,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
                ) =>
            {
                debug!(socket = %self.socket_path.display(), error = %e, "controller unreachable");
                return Err(ClientError::NotRunning(self.socket_path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let (mut reader, mut writer) = stream.into_split();
        protocol::write_request(&mut writer, request, self.timeout).await?;
        let response = protocol::read_response(&mut reader, self.timeout).await?;
        Ok(response)
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn execute_operation(
        &self,
        operation: &Operation,
    ) -> Result<ControllerResponse, ClientError> {
        let request = Request::Execute {
            operation: operation.clone(),
        };
        match self.send(&request).await? {
            Response::Executed { response } => Ok(response),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

impl From<ClientError> for ControllerError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Protocol(ProtocolError::Timeout) => ControllerError::Timeout,
            ClientError::Protocol(e) => ControllerError::Protocol(e.to_string()),
            ClientError::Rejected(message) => ControllerError::Rejected(message),
            ClientError::UnexpectedResponse => {
                ControllerError::Protocol("unexpected response".to_string())
            }
            e @ (ClientError::NotRunning(_) | ClientError::Io(_) | ClientError::NoStateDir) => {
                ControllerError::Connect(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Controller for ControllerClient {
    async fn execute(&self, operation: &Operation) -> Result<ControllerResponse, ControllerError> {
        Ok(self.execute_operation(operation).await?)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
