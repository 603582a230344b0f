// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The managed resource tree and its operation handlers.
//!
//! Every resource holds an ordered attribute map and ordered children
//! grouped by child type. Operations are dispatched by name; failures are
//! reported as [`ModelError`]s whose text starts with a `CTLnnnn:` code.

use indexmap::IndexMap;
use mgmt_core::{Address, ControllerResponse, ModelValue, Operation, COMPOSITE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::resolve::resolve_expression;

pub const ADD: &str = "add";
pub const REMOVE: &str = "remove";
pub const READ_RESOURCE: &str = "read-resource";
pub const READ_ATTRIBUTE: &str = "read-attribute";
pub const WRITE_ATTRIBUTE: &str = "write-attribute";
pub const UNDEFINE_ATTRIBUTE: &str = "undefine-attribute";
pub const READ_CHILDREN_NAMES: &str = "read-children-names";
pub const READ_CHILDREN_TYPES: &str = "read-children-types";

/// Failures of a single (non-composite) operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("CTL0031: No operation named '{name}' exists at address {address}")]
    NoSuchOperation { name: String, address: String },
    #[error("CTL0155: '{0}' may not be null")]
    MissingParameter(String),
    #[error("CTL0155: invalid composite step: {0}")]
    InvalidStep(String),
    #[error("CTL0155: invalid composite step: composite operations cannot be nested")]
    NestedComposite,
    #[error("CTL0201: Unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("CTL0211: Cannot resolve expression '{0}'")]
    UnresolvedExpression(String),
    #[error("CTL0212: Duplicate resource {0}")]
    DuplicateResource(String),
    #[error("CTL0216: Management resource '{0}' not found")]
    ResourceNotFound(String),
}

/// One node of the resource tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub attributes: IndexMap<String, ModelValue>,
    #[serde(default)]
    pub children: IndexMap<String, IndexMap<String, Resource>>,
}

impl Resource {
    pub fn child(&self, kind: &str, name: &str) -> Option<&Resource> {
        self.children.get(kind).and_then(|named| named.get(name))
    }

    fn to_model_value(&self, recursive: bool) -> ModelValue {
        let mut map = self.attributes.clone();
        for (kind, named) in &self.children {
            let children = named
                .iter()
                .map(|(name, child)| {
                    let value = if recursive {
                        child.to_model_value(true)
                    } else {
                        ModelValue::Undefined
                    };
                    (name.clone(), value)
                })
                .collect::<IndexMap<_, _>>();
            map.insert(kind.clone(), ModelValue::Object(children));
        }
        ModelValue::Object(map)
    }
}

/// The full managed model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagedModel {
    #[serde(default)]
    root: Resource,
    /// Count of successful mutations applied.
    #[serde(default)]
    revision: u64,
}

impl ManagedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn root(&self) -> &Resource {
        &self.root
    }

    pub fn resource(&self, address: &Address) -> Option<&Resource> {
        let mut node = &self.root;
        for segment in address.segments() {
            node = node.child(&segment.kind, &segment.name)?;
        }
        Some(node)
    }

    fn resource_mut(&mut self, address: &Address) -> Option<&mut Resource> {
        let mut node = &mut self.root;
        for segment in address.segments() {
            node = node
                .children
                .get_mut(&segment.kind)
                .and_then(|named| named.get_mut(&segment.name))?;
        }
        Some(node)
    }

    /// Execute one operation and describe the outcome.
    ///
    /// Composite operations run all-or-nothing: on any step failure the
    /// model is left exactly as it was.
    pub fn execute(&mut self, op: &Operation) -> ControllerResponse {
        debug!(address = %op.address, operation = %op.name, "executing");
        if op.is_composite() {
            return self.execute_composite(op);
        }
        match self.apply(op) {
            Ok(result) => {
                if is_mutating(op) {
                    self.revision += 1;
                }
                ControllerResponse::success(result)
            }
            Err(e) => {
                debug!(error = %e, "operation failed");
                ControllerResponse::failed(e.to_string())
            }
        }
    }

    /// Run a single non-composite operation.
    pub(crate) fn apply(&mut self, op: &Operation) -> Result<Option<ModelValue>, ModelError> {
        let address = &op.address;
        if op.name == ADD {
            return self.add(op).map(|()| None);
        }
        let resource = self
            .resource(address)
            .ok_or_else(|| ModelError::ResourceNotFound(address.describe()))?;

        match op.name.as_str() {
            REMOVE if !address.is_root() => {
                self.remove(address);
                Ok(None)
            }
            READ_RESOURCE => {
                let recursive = bool_param(op, "recursive");
                Ok(Some(resource.to_model_value(recursive)))
            }
            READ_ATTRIBUTE => {
                let name = required_str(op, "name")?;
                let value = resource
                    .attributes
                    .get(name)
                    .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))?;
                match value {
                    ModelValue::Expression(expr) if bool_param(op, "resolve-expressions") => {
                        resolve_expression(expr, self).map(|v| Some(ModelValue::String(v)))
                    }
                    other => Ok(Some(other.clone())),
                }
            }
            WRITE_ATTRIBUTE => {
                let name = required_str(op, "name")?.to_string();
                let value = op.param("value").cloned().unwrap_or_default();
                if let Some(resource) = self.resource_mut(address) {
                    resource.attributes.insert(name, value);
                }
                Ok(None)
            }
            UNDEFINE_ATTRIBUTE => {
                let name = required_str(op, "name")?.to_string();
                if !resource.attributes.contains_key(&name) {
                    return Err(ModelError::UnknownAttribute(name));
                }
                if let Some(resource) = self.resource_mut(address) {
                    resource.attributes.shift_remove(&name);
                }
                Ok(None)
            }
            READ_CHILDREN_NAMES => {
                let kind = required_str(op, "child-type")?;
                let names = resource
                    .children
                    .get(kind)
                    .map(|named| named.keys().map(|n| ModelValue::from(n.as_str())).collect())
                    .unwrap_or_default();
                Ok(Some(ModelValue::List(names)))
            }
            READ_CHILDREN_TYPES => Ok(Some(ModelValue::List(
                resource
                    .children
                    .keys()
                    .map(|k| ModelValue::from(k.as_str()))
                    .collect(),
            ))),
            // Only reached for a composite inside a composite; `execute`
            // runs top-level ones
            COMPOSITE if address.is_root() => Err(ModelError::NestedComposite),
            _ => Err(ModelError::NoSuchOperation {
                name: op.name.clone(),
                address: address.describe(),
            }),
        }
    }

    fn add(&mut self, op: &Operation) -> Result<(), ModelError> {
        let address = &op.address;
        let (Some(parent_address), Some(last)) = (address.parent(), address.last()) else {
            return Err(ModelError::DuplicateResource(address.describe()));
        };
        if self.resource(address).is_some() {
            return Err(ModelError::DuplicateResource(address.describe()));
        }
        let parent = self
            .resource_mut(&parent_address)
            .ok_or_else(|| ModelError::ResourceNotFound(parent_address.describe()))?;
        let resource = Resource {
            attributes: op.params.clone(),
            children: IndexMap::new(),
        };
        parent
            .children
            .entry(last.kind.clone())
            .or_default()
            .insert(last.name.clone(), resource);
        Ok(())
    }

    fn remove(&mut self, address: &Address) {
        let (Some(parent_address), Some(last)) = (address.parent(), address.last()) else {
            return;
        };
        if let Some(parent) = self.resource_mut(&parent_address) {
            if let Some(named) = parent.children.get_mut(&last.kind) {
                named.shift_remove(&last.name);
                if named.is_empty() {
                    parent.children.shift_remove(&last.kind);
                }
            }
        }
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }
}

/// Whether a successful run of `op` changes the model.
pub fn is_mutating(op: &Operation) -> bool {
    matches!(
        op.name.as_str(),
        ADD | REMOVE | WRITE_ATTRIBUTE | UNDEFINE_ATTRIBUTE | COMPOSITE
    )
}

fn bool_param(op: &Operation, key: &str) -> bool {
    op.param(key).and_then(ModelValue::as_bool).unwrap_or(false)
}

fn required_str<'a>(op: &'a Operation, key: &str) -> Result<&'a str, ModelError> {
    op.param(key)
        .and_then(ModelValue::as_str)
        .ok_or_else(|| ModelError::MissingParameter(key.to_string()))
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
