// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource addresses: ordered `(type, name)` path segments.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{quote, ModelValue, SYNTAX_CHARS};

/// One `type=name` element of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl Segment {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", path_word(&self.kind), path_word(&self.name))
    }
}

fn path_word(s: &str) -> String {
    if !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || SYNTAX_CHARS.contains(&c)) {
        s.to_string()
    } else {
        quote(s)
    }
}

/// Address of a managed resource. The empty address is the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<Segment>);

impl Address {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Address of a child resource.
    pub fn child(&self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::new(kind, name));
        Self(segments)
    }

    /// Address of the parent resource, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Controller form used in failure messages: `[("system-property" => "prop1")]`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|s| format!("({} => {})", quote(&s.kind), quote(&s.name)))
            .collect();
        format!("[{}]", parts.join(","))
    }

    /// List of single-entry objects, one per segment.
    pub fn to_model_value(&self) -> ModelValue {
        ModelValue::List(
            self.0
                .iter()
                .map(|s| {
                    let mut map = IndexMap::new();
                    map.insert(s.kind.clone(), ModelValue::String(s.name.clone()));
                    ModelValue::Object(map)
                })
                .collect(),
        )
    }

    /// Inverse of [`Address::to_model_value`]. Undefined is the root.
    pub fn from_model_value(value: &ModelValue) -> Option<Self> {
        match value {
            ModelValue::Undefined => Some(Self::root()),
            ModelValue::List(items) => {
                let mut segments = Vec::with_capacity(items.len());
                for item in items {
                    let map = item.as_object()?;
                    if map.len() != 1 {
                        return None;
                    }
                    let (kind, name) = map.first()?;
                    segments.push(Segment::new(kind.clone(), name.as_str()?));
                }
                Some(Self(segments))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromIterator<Segment> for Address {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
