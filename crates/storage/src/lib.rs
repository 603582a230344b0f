// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Managed model storage for the management controller

mod checkpoint;
mod composite;
mod model;
mod resolve;
mod snapshot;

pub use model::{
    is_mutating, ManagedModel, ModelError, Resource, ADD, READ_ATTRIBUTE, READ_CHILDREN_NAMES,
    READ_CHILDREN_TYPES, READ_RESOURCE, REMOVE, UNDEFINE_ATTRIBUTE, WRITE_ATTRIBUTE,
};
pub use checkpoint::Checkpointer;
pub use resolve::resolve_expression;
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_FORMAT};
