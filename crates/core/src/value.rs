// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed management values.
//!
//! [`ModelValue`] is the closed set of value shapes that travel between the
//! CLI and the controller: operation parameters, attribute values, results
//! and failure descriptions. Expressions are carried verbatim and resolved
//! only by the controller.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON key used to mark an expression when rendering values as JSON.
pub const EXPRESSION_KEY: &str = "EXPRESSION_VALUE";

/// A management value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum ModelValue {
    #[default]
    Undefined,
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    /// Unresolved `${...}` expression, resolved server-side.
    Expression(String),
    List(Vec<ModelValue>),
    Object(IndexMap<String, ModelValue>),
}

impl ModelValue {
    /// Empty object value.
    pub fn object() -> Self {
        ModelValue::Object(IndexMap::new())
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, ModelValue::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::String(s) | ModelValue::Expression(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ModelValue::Boolean(b) => Some(*b),
            ModelValue::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ModelValue::Long(n) => Some(*n),
            ModelValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ModelValue]> {
        match self {
            ModelValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ModelValue>> {
        match self {
            ModelValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&ModelValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Insert a key into an object value, converting `Undefined` into an
    /// empty object first. Non-object values are left untouched.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ModelValue>) {
        if matches!(self, ModelValue::Undefined) {
            *self = ModelValue::object();
        }
        if let ModelValue::Object(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Render as plain JSON. Expressions become `{"EXPRESSION_VALUE": "..."}`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            ModelValue::Undefined => Value::Null,
            ModelValue::Boolean(b) => Value::Bool(*b),
            ModelValue::Long(n) => Value::from(*n),
            ModelValue::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ModelValue::String(s) => Value::String(s.clone()),
            ModelValue::Expression(e) => {
                let mut map = serde_json::Map::new();
                map.insert(EXPRESSION_KEY.to_string(), Value::String(e.clone()));
                Value::Object(map)
            }
            ModelValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ModelValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Render a value the way it is written on a command line.
    ///
    /// Strings that would otherwise be read back as another type, or that
    /// contain syntax characters, are quoted.
    pub fn to_cli_string(&self) -> String {
        match self {
            ModelValue::Undefined => "undefined".to_string(),
            ModelValue::Boolean(b) => b.to_string(),
            ModelValue::Long(n) => n.to_string(),
            ModelValue::Double(d) => d.to_string(),
            ModelValue::String(s) => {
                if is_plain_literal(s) && !looks_typed(s) {
                    s.clone()
                } else {
                    quote(s)
                }
            }
            ModelValue::Expression(e) => {
                if is_plain_literal(e) {
                    e.clone()
                } else {
                    quote(e)
                }
            }
            ModelValue::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::to_cli_string).collect();
                format!("[{}]", inner.join(","))
            }
            ModelValue::Object(map) => {
                let inner: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v.to_cli_string()))
                    .collect();
                format!("{{{}}}", inner.join(","))
            }
        }
    }

    fn write_dmr(&self, out: &mut String, indent: usize) -> fmt::Result {
        match self {
            ModelValue::Undefined => out.write_str("undefined"),
            ModelValue::Boolean(b) => write!(out, "{}", b),
            ModelValue::Long(n) => write!(out, "{}", n),
            ModelValue::Double(d) => write!(out, "{:?}", d),
            ModelValue::String(s) => out.write_str(&quote(s)),
            ModelValue::Expression(e) => write!(out, "expression {}", quote(e)),
            ModelValue::List(items) if items.is_empty() => out.write_str("[]"),
            ModelValue::List(items) => {
                out.write_str("[\n")?;
                for (i, item) in items.iter().enumerate() {
                    pad(out, indent + 1);
                    item.write_dmr(out, indent + 1)?;
                    if i + 1 < items.len() {
                        out.write_char(',')?;
                    }
                    out.write_char('\n')?;
                }
                pad(out, indent);
                out.write_char(']')
            }
            ModelValue::Object(map) if map.is_empty() => out.write_str("{}"),
            ModelValue::Object(map) => {
                out.write_str("{\n")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    pad(out, indent + 1);
                    write!(out, "{} => ", quote(key))?;
                    value.write_dmr(out, indent + 1)?;
                    if i + 1 < map.len() {
                        out.write_char(',')?;
                    }
                    out.write_char('\n')?;
                }
                pad(out, indent);
                out.write_char('}')
            }
        }
    }
}

/// Controller text form: `{"outcome" => "success"}`.
impl fmt::Display for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_dmr(&mut out, 0)?;
        f.write_str(&out)
    }
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("    ");
    }
}

/// Double-quote a string, escaping `"` and `\`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Characters that end an unquoted literal on a command line.
pub const SYNTAX_CHARS: &[char] = &[
    ',', '(', ')', '[', ']', '{', '}', '=', '"', '\\', ';', ':', '/',
];

fn is_plain_literal(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || SYNTAX_CHARS.contains(&c))
        || is_plain_expression(s)
}

fn is_plain_expression(s: &str) -> bool {
    s.starts_with("${")
        && s.ends_with('}')
        && !s.chars().any(|c| c.is_whitespace() || matches!(c, ',' | '"' | '\\'))
}

fn looks_typed(s: &str) -> bool {
    s == "true" || s == "false" || s.parse::<i64>().is_ok() || s.contains("${")
}

impl From<bool> for ModelValue {
    fn from(b: bool) -> Self {
        ModelValue::Boolean(b)
    }
}

impl From<i64> for ModelValue {
    fn from(n: i64) -> Self {
        ModelValue::Long(n)
    }
}

impl From<f64> for ModelValue {
    fn from(d: f64) -> Self {
        ModelValue::Double(d)
    }
}

impl From<&str> for ModelValue {
    fn from(s: &str) -> Self {
        ModelValue::String(s.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(s: String) -> Self {
        ModelValue::String(s)
    }
}

impl From<Vec<ModelValue>> for ModelValue {
    fn from(items: Vec<ModelValue>) -> Self {
        ModelValue::List(items)
    }
}

impl From<IndexMap<String, ModelValue>> for ModelValue {
    fn from(map: IndexMap<String, ModelValue>) -> Self {
        ModelValue::Object(map)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
