// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use mgmt_engine::{CommandError, CommandOutput};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render what a handled line produced. `None` when there is nothing to print.
pub fn render_output(output: &CommandOutput, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Text => render_text(output),
        OutputFormat::Json => render_json(output),
    }
}

fn render_text(output: &CommandOutput) -> Option<String> {
    match output {
        CommandOutput::Nothing => None,
        CommandOutput::Message(message) => Some(message.clone()),
        CommandOutput::Lines(lines) if lines.is_empty() => None,
        CommandOutput::Lines(lines) => Some(lines.join("\n")),
        CommandOutput::Response(response) => Some(response.to_model_value().to_string()),
    }
}

fn render_json(output: &CommandOutput) -> Option<String> {
    let value = match output {
        CommandOutput::Nothing => return None,
        CommandOutput::Message(message) => serde_json::json!({ "message": message }),
        CommandOutput::Lines(lines) => serde_json::json!({ "lines": lines }),
        CommandOutput::Response(response) => response.to_model_value().to_json(),
    };
    Some(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
}

/// Render a failed line for stderr, with the caret diagnostic for parse errors.
pub fn render_error(err: &CommandError) -> String {
    let mut text = format!("Error: {}", err);
    if let Some(diagnostic) = err.diagnostic() {
        text.push('\n');
        text.push_str(&diagnostic);
    }
    text
}
