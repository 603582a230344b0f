// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interpretation of composite responses.
//!
//! A failed composite is described by an object whose single key is the
//! summary (`CTL0062: ... Steps that failed:`) and whose value maps
//! `Operation step-N` to that step's failure. Step numbers are mapped back
//! to the batch so the user sees the failing command itself.

use std::fmt;

use mgmt_core::{error_code, ControllerResponse, ModelValue, FAILED_STEP_PREFIX};

use crate::batch::BatchedCommand;

/// Printed after a successful `run-batch`.
pub const BATCH_SUCCEEDED: &str = "The batch executed successfully";

/// Result of running a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Succeeded(ControllerResponse),
    Failed(BatchFailure),
}

/// A step the controller reported as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedStep {
    /// 1-based position in the batch
    pub index: usize,
    /// Canonical text of the step's operation, when the index is in range
    pub operation: Option<String>,
    pub detail: String,
}

/// Why a batch did not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// Short code before the first colon of the failure, e.g. `CTL0062`
    pub code: Option<String>,
    pub summary: String,
    pub failed_steps: Vec<FailedStep>,
    pub rolled_back: bool,
    /// Whether the steps are still the active batch
    pub session_retained: bool,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.session_retained {
            write!(
                f,
                "The batch failed with the following error (you are remaining in the batch \
                 editing mode to have a chance to correct the error): {}",
                self.summary
            )?;
        } else {
            write!(f, "The batch failed with the following error: {}", self.summary)?;
        }
        for step in &self.failed_steps {
            write!(f, "\n    Step: step-{}", step.index)?;
            if let Some(operation) = &step.operation {
                write!(f, "\n    Operation: {}", operation)?;
            }
            write!(f, "\n    Failure: {}", step.detail)?;
        }
        Ok(())
    }
}

/// Decide between success and failure for a composite response.
pub fn interpret(response: ControllerResponse, steps: &[BatchedCommand]) -> BatchOutcome {
    if response.is_success() {
        return BatchOutcome::Succeeded(response);
    }

    let mut summary = String::new();
    let mut failed_steps = Vec::new();
    match &response.failure_description {
        Some(ModelValue::Object(map)) => {
            for (key, value) in map {
                match value {
                    ModelValue::Object(inner) => {
                        if summary.is_empty() {
                            summary = key.clone();
                        }
                        for (step_key, detail) in inner {
                            collect_step(step_key, detail, steps, &mut failed_steps);
                        }
                    }
                    other => {
                        if !collect_step(key, other, steps, &mut failed_steps) && summary.is_empty() {
                            summary = format!("{}: {}", key, flat(other));
                        }
                    }
                }
            }
        }
        Some(other) => summary = flat(other),
        None => {}
    }

    if failed_steps.is_empty() {
        failed_steps = failed_steps_from_result(response.result.as_ref(), steps);
    }
    if summary.is_empty() {
        summary = failed_steps
            .first()
            .map(|s| s.detail.clone())
            .unwrap_or_else(|| "the controller reported a failure without a description".into());
    }

    BatchOutcome::Failed(BatchFailure {
        code: error_code(&summary).map(str::to_string),
        summary,
        failed_steps,
        rolled_back: response.rolled_back,
        session_retained: true,
    })
}

/// Record `key => detail` if `key` names a step. Returns whether it did.
fn collect_step(
    key: &str,
    detail: &ModelValue,
    steps: &[BatchedCommand],
    out: &mut Vec<FailedStep>,
) -> bool {
    let Some(index) = key
        .strip_prefix(FAILED_STEP_PREFIX)
        .and_then(|n| n.trim().parse::<usize>().ok())
    else {
        return false;
    };
    out.push(failed_step(index, flat(detail), steps));
    true
}

/// Fallback: find `step-N` entries with a failed outcome in the result.
fn failed_steps_from_result(result: Option<&ModelValue>, steps: &[BatchedCommand]) -> Vec<FailedStep> {
    let Some(map) = result.and_then(ModelValue::as_object) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, entry)| {
            let index = key.strip_prefix("step-")?.parse::<usize>().ok()?;
            if entry.get("outcome").and_then(ModelValue::as_str) != Some("failed") {
                return None;
            }
            let detail = entry.get("failure-description").map(flat).unwrap_or_default();
            Some(failed_step(index, detail, steps))
        })
        .collect()
}

fn failed_step(index: usize, detail: String, steps: &[BatchedCommand]) -> FailedStep {
    let operation = index
        .checked_sub(1)
        .and_then(|i| steps.get(i))
        .map(|step| step.operation.to_string());
    FailedStep {
        index,
        operation,
        detail,
    }
}

fn flat(value: &ModelValue) -> String {
    match value {
        ModelValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
