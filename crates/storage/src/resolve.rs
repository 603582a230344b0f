// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression resolution: `${name}` and `${name:default}`.
//!
//! A name resolves to the `value` attribute of `/system-property=<name>`.
//! Defaults may themselves hold expressions.

use mgmt_core::{Address, ModelValue};

use crate::model::{ManagedModel, ModelError};

const MAX_DEPTH: usize = 16;

pub fn resolve_expression(expr: &str, model: &ManagedModel) -> Result<String, ModelError> {
    resolve_at(expr, model, 0)
}

fn resolve_at(expr: &str, model: &ManagedModel, depth: usize) -> Result<String, ModelError> {
    let unresolved = || ModelError::UnresolvedExpression(expr.to_string());
    if depth > MAX_DEPTH {
        return Err(unresolved());
    }

    let mut out = String::new();
    let mut rest = expr;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let body_start = start + 2;
        let body_len = closing_brace(&rest[body_start..]).ok_or_else(unresolved)?;
        let body = &rest[body_start..body_start + body_len];
        out.push_str(&resolve_body(body, model, depth).ok_or_else(unresolved)??);
        rest = &rest[body_start + body_len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Resolve the inside of one `${...}`. `None` means neither the property
/// nor a default exists.
fn resolve_body(
    body: &str,
    model: &ManagedModel,
    depth: usize,
) -> Option<Result<String, ModelError>> {
    let (name, default) = split_default(body);
    let property = Address::root().child("system-property", name);
    let value = model
        .resource(&property)
        .and_then(|r| r.attributes.get("value"));
    match value {
        Some(ModelValue::Expression(inner)) => Some(resolve_at(inner, model, depth + 1)),
        Some(ModelValue::String(s)) => Some(Ok(s.clone())),
        Some(v @ (ModelValue::Long(_) | ModelValue::Boolean(_) | ModelValue::Double(_))) => {
            Some(Ok(v.to_cli_string()))
        }
        _ => default.map(|d| resolve_at(d, model, depth + 1)),
    }
}

/// Byte length up to the `}` closing an expression body.
fn closing_brace(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `name:default` at the first colon outside nested braces.
fn split_default(body: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return (&body[..i], Some(&body[i + 1..])),
            _ => {}
        }
    }
    (body, None)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
