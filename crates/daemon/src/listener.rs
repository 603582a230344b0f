// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Each accepted connection is served on its own task: one request, one
//! response. Operations run under the model lock, so a composite is applied
//! or rejected as a whole before any other request sees the model.

use std::sync::Arc;

use mgmt_core::Operation;
use mgmt_storage::{Checkpointer, ManagedModel, Snapshot};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use mgmt_daemon::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Everything a connection handler needs.
#[derive(Clone)]
pub struct ListenCtx {
    pub model: Arc<Mutex<ManagedModel>>,
    pub checkpointer: Arc<Checkpointer>,
    pub shutdown: Arc<Notify>,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    socket: UnixListener,
    ctx: ListenCtx,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl Listener {
    pub fn new(socket: UnixListener, ctx: ListenCtx) -> Self {
        Self { socket, ctx }
    }

    /// Accept connections forever, spawning a task for each.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let ctx = self.ctx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            match e {
                                ConnectionError::Protocol(
                                    protocol::ProtocolError::ConnectionClosed,
                                ) => debug!("Client disconnected"),
                                ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
                                    warn!("Connection timeout")
                                }
                                _ => error!("Connection error: {}", e),
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, ctx: &ListenCtx) -> Result<(), ConnectionError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(request) => request,
        Err(protocol::ProtocolError::Json(e)) => {
            warn!(error = %e, "malformed request");
            let response = Response::Error {
                message: format!("malformed request: {e}"),
            };
            protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if matches!(request, Request::Ping | Request::Hello { .. }) {
        debug!(request = ?request, "received request");
    } else {
        info!(request = ?request, "received request");
    }

    let response = handle_request(request, ctx);
    debug!("Sending response: {:?}", response);
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

/// Handle a single request and return a response.
pub(crate) fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version } => {
            if version != PROTOCOL_VERSION {
                warn!(client = %version, controller = PROTOCOL_VERSION, "version mismatch");
            }
            Response::Hello {
                version: PROTOCOL_VERSION.to_string(),
            }
        }

        Request::Execute { operation } => execute(&operation, ctx),

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

/// Run one operation and persist the model if it changed.
fn execute(operation: &Operation, ctx: &ListenCtx) -> Response {
    let (response, snapshot) = {
        let mut model = ctx.model.lock();
        let before = model.revision();
        let response = model.execute(operation);
        let snapshot = (model.revision() != before).then(|| Snapshot::capture(&model));
        (response, snapshot)
    };

    if response.is_success() {
        debug!(operation = %operation, "operation succeeded");
    } else {
        info!(
            operation = %operation,
            rolled_back = response.rolled_back,
            code = ?response.error_code(),
            "operation failed"
        );
    }

    if let Some(snapshot) = snapshot {
        if let Err(e) = ctx.checkpointer.checkpoint(&snapshot) {
            warn!(error = %e, revision = snapshot.revision, "failed to save model snapshot");
        }
    }
    Response::Executed { response }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
