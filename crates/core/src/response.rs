// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured controller responses.

use serde::{Deserialize, Serialize};

use crate::value::ModelValue;

/// Key of a composite failure description.
pub const COMPOSITE_FAILED: &str =
    "CTL0062: Composite operation failed and was rolled back. Steps that failed:";
/// Prefix of the per-step keys inside a composite failure description.
pub const FAILED_STEP_PREFIX: &str = "Operation step-";

/// Overall result of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failed => "failed",
        }
    }
}

/// Response to one executed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ControllerResponse {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ModelValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_description: Option<ModelValue>,
    #[serde(default)]
    pub rolled_back: bool,
}

impl ControllerResponse {
    pub fn success(result: Option<ModelValue>) -> Self {
        Self {
            outcome: Outcome::Success,
            result,
            failure_description: None,
            rolled_back: false,
        }
    }

    pub fn failed(description: impl Into<ModelValue>) -> Self {
        Self {
            outcome: Outcome::Failed,
            result: None,
            failure_description: Some(description.into()),
            rolled_back: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// Flatten the failure description into one message.
    ///
    /// Object descriptions (composite failures) render as their header
    /// followed by one `key: value` line per nested entry.
    pub fn failure_message(&self) -> Option<String> {
        self.failure_description.as_ref().map(describe_failure)
    }

    /// Short error code of the failure, e.g. `CTL0212`.
    pub fn error_code(&self) -> Option<String> {
        self.failure_message()
            .as_deref()
            .and_then(error_code)
            .map(str::to_string)
    }

    /// Full response as a model value, for display.
    pub fn to_model_value(&self) -> ModelValue {
        let mut value = ModelValue::object();
        value.set("outcome", self.outcome.as_str());
        if let Some(result) = &self.result {
            value.set("result", result.clone());
        }
        if let Some(failure) = &self.failure_description {
            value.set("failure-description", failure.clone());
        }
        if self.rolled_back {
            value.set("rolled-back", true);
        }
        value
    }
}

fn describe_failure(value: &ModelValue) -> String {
    match value {
        ModelValue::String(s) => s.clone(),
        ModelValue::Object(map) => {
            let mut lines = Vec::new();
            for (key, nested) in map {
                match nested {
                    ModelValue::Object(inner) => {
                        lines.push(key.clone());
                        for (k, v) in inner {
                            lines.push(format!("    {}: {}", k, describe_failure(v)));
                        }
                    }
                    ModelValue::Undefined => lines.push(key.clone()),
                    other => lines.push(format!("{}: {}", key, describe_failure(other))),
                }
            }
            lines.join("\n")
        }
        other => other.to_string(),
    }
}

/// Text before the first colon of a failure message, when it looks like a
/// code (non-empty, no whitespace).
pub fn error_code(message: &str) -> Option<&str> {
    let (code, _) = message.split_once(':')?;
    let code = code.trim();
    if code.is_empty() || code.chars().any(char::is_whitespace) {
        None
    } else {
        Some(code)
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
