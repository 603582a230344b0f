// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Command-line parsing for the management CLI.
//!
//! Turns operation request lines into [`mgmt_core::Operation`] values and
//! provides the word splitting used by batch commands and `--commands`.
//!
//! ```ignore
//! use mgmt_shell::parse_operation;
//!
//! let op = parse_operation("/system-property=prop1:add(value=prop1_a)")?;
//! assert_eq!(op.name, "add");
//! # Ok::<(), mgmt_shell::ParseError>(())
//! ```

mod parse_error;
mod parser;
pub mod span;

pub use parse_error::ParseError;
pub use parser::{
    is_skippable, parse_headers, parse_operation, parse_value, split_args, split_command,
    split_top_level,
};
pub use span::{context_snippet, Span};
