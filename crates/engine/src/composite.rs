// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite request construction.

use indexmap::IndexMap;
use mgmt_core::{Address, ModelValue, Operation, COMPOSITE, STEPS};

use crate::batch::BatchedCommand;

/// Build the composite request for `steps`.
///
/// Steps keep their order and their values verbatim, so expressions reach
/// the controller unresolved. Headers apply to the composite as a whole.
/// Nothing is executed and the steps are not touched.
pub fn build_composite(
    steps: &[BatchedCommand],
    headers: Option<&IndexMap<String, ModelValue>>,
) -> Operation {
    let steps: Vec<ModelValue> = steps
        .iter()
        .map(|step| step.operation.to_model_value())
        .collect();
    let mut composite = Operation::new(Address::root(), COMPOSITE).with_param(STEPS, steps);
    if let Some(headers) = headers {
        composite.headers = headers.clone();
    }
    composite
}

#[cfg(test)]
#[path = "composite_tests.rs"]
mod tests;
