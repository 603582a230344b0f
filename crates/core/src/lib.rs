// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mgmt-core: model types shared by the management CLI and controller

pub mod address;
pub mod operation;
pub mod response;
pub mod value;

pub use address::{Address, Segment};
pub use operation::{Operation, OperationError, COMPOSITE, OPERATION_HEADERS, PARAMS, STEPS};
pub use response::{
    error_code, ControllerResponse, Outcome, COMPOSITE_FAILED, FAILED_STEP_PREFIX,
};
pub use value::{quote, ModelValue, EXPRESSION_KEY};
