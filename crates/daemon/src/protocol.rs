// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC Protocol for controller communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.
//! One request and one response per connection.

use mgmt_core::{ControllerResponse, Operation};
use serde::{Deserialize, Serialize};

#[path = "protocol_wire.rs"]
mod wire;
pub use wire::{
    decode, encode, read_message, read_request, read_response, write_message, write_request,
    write_response, ProtocolError, DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};

/// Request from CLI to controller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Execute one operation (composites included) against the model
    Execute { operation: Operation },

    /// Request controller shutdown
    Shutdown,
}

/// Response from controller to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Pong,

    Hello { version: String },

    /// Outcome of an `Execute` request, success or failure alike
    Executed { response: ControllerResponse },

    ShuttingDown,

    /// The request itself could not be handled
    Error { message: String },
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
