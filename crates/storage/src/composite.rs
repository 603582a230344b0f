// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic composite execution.

use indexmap::IndexMap;
use mgmt_core::{
    ControllerResponse, ModelValue, Operation, Outcome, COMPOSITE_FAILED, FAILED_STEP_PREFIX,
    STEPS,
};
use tracing::info;

use crate::model::{ManagedModel, ModelError};

impl ManagedModel {
    /// Run the `steps` of a composite in order against a working copy.
    ///
    /// The copy replaces the model only when every step succeeds. The
    /// result is keyed `step-1`, `step-2`, ...; on failure the description
    /// names the failing step and `rolled-back` is set.
    pub(crate) fn execute_composite(&mut self, op: &Operation) -> ControllerResponse {
        let Some(steps) = op.param(STEPS).and_then(ModelValue::as_list) else {
            return ControllerResponse::failed(ModelError::MissingParameter(STEPS.into()).to_string());
        };

        let mut working = self.clone();
        let mut results = IndexMap::new();
        for (index, step) in steps.iter().enumerate() {
            let key = format!("step-{}", index + 1);
            let outcome = Operation::from_model_value(step)
                .map_err(|e| ModelError::InvalidStep(e.to_string()))
                .and_then(|step_op| working.apply(&step_op));
            match outcome {
                Ok(result) => {
                    let mut entry = ModelValue::object();
                    entry.set("outcome", Outcome::Success.as_str());
                    if let Some(result) = result {
                        entry.set("result", result);
                    }
                    results.insert(key, entry);
                }
                Err(e) => {
                    info!(step = index + 1, error = %e, "composite step failed, rolling back");
                    let message = e.to_string();
                    let mut entry = ModelValue::object();
                    entry.set("outcome", Outcome::Failed.as_str());
                    entry.set("failure-description", message.as_str());
                    results.insert(key.clone(), entry);

                    let mut failed_steps = ModelValue::object();
                    failed_steps.set(format!("{FAILED_STEP_PREFIX}{}", index + 1), message);
                    let mut description = ModelValue::object();
                    description.set(COMPOSITE_FAILED, failed_steps);

                    return ControllerResponse {
                        outcome: Outcome::Failed,
                        result: Some(ModelValue::Object(results)),
                        failure_description: Some(description),
                        rolled_back: true,
                    };
                }
            }
        }

        *self = working;
        self.bump_revision();
        ControllerResponse::success(Some(ModelValue::Object(results)))
    }
}

#[cfg(test)]
#[path = "composite_tests.rs"]
mod tests;
