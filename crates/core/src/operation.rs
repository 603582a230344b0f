// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation descriptions: address + operation name + parameters.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::value::ModelValue;

/// Name of the composite operation.
pub const COMPOSITE: &str = "composite";
/// Parameter holding the steps of a composite.
pub const STEPS: &str = "steps";
/// Key carrying an operation's headers in its model form.
pub const OPERATION_HEADERS: &str = "operation-headers";
/// Key carrying the address in an operation's model form.
pub const ADDRESS: &str = "address";
/// Key carrying the operation name in an operation's model form.
pub const OPERATION: &str = "operation";
/// Key carrying the parameters in an operation's model form.
pub const PARAMS: &str = "params";

/// Errors decoding an operation from its model form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("operation description must be an object")]
    NotAnObject,
    #[error("operation description has no operation name")]
    MissingName,
    #[error("invalid address in operation description")]
    InvalidAddress,
    #[error("operation headers must be an object")]
    InvalidHeaders,
    #[error("operation parameters must be an object")]
    InvalidParams,
}

/// One management action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub address: Address,
    pub name: String,
    #[serde(default)]
    pub params: IndexMap<String, ModelValue>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, ModelValue>,
}

impl Operation {
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            params: IndexMap::new(),
            headers: IndexMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ModelValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<ModelValue>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&ModelValue> {
        self.params.get(key)
    }

    pub fn is_composite(&self) -> bool {
        self.name == COMPOSITE && self.address.is_root()
    }

    /// Object form used for composite steps.
    ///
    /// Parameters sit under their own key, so a parameter may be named
    /// `address` or `operation` without clobbering the step.
    pub fn to_model_value(&self) -> ModelValue {
        let mut map = IndexMap::new();
        map.insert(ADDRESS.to_string(), self.address.to_model_value());
        map.insert(OPERATION.to_string(), ModelValue::String(self.name.clone()));
        if !self.params.is_empty() {
            map.insert(PARAMS.to_string(), ModelValue::Object(self.params.clone()));
        }
        if !self.headers.is_empty() {
            map.insert(
                OPERATION_HEADERS.to_string(),
                ModelValue::Object(self.headers.clone()),
            );
        }
        ModelValue::Object(map)
    }

    /// Decode the object form produced by [`Operation::to_model_value`].
    pub fn from_model_value(value: &ModelValue) -> Result<Self, OperationError> {
        let map = value.as_object().ok_or(OperationError::NotAnObject)?;
        let name = map
            .get(OPERATION)
            .and_then(ModelValue::as_str)
            .ok_or(OperationError::MissingName)?;
        let address = match map.get(ADDRESS) {
            Some(addr) => Address::from_model_value(addr).ok_or(OperationError::InvalidAddress)?,
            None => Address::root(),
        };
        let headers = match map.get(OPERATION_HEADERS) {
            Some(ModelValue::Object(h)) => h.clone(),
            Some(ModelValue::Undefined) | None => IndexMap::new(),
            Some(_) => return Err(OperationError::InvalidHeaders),
        };
        let params = match map.get(PARAMS) {
            Some(ModelValue::Object(p)) => p.clone(),
            Some(ModelValue::Undefined) | None => IndexMap::new(),
            Some(_) => return Err(OperationError::InvalidParams),
        };
        Ok(Self {
            address,
            name: name.to_string(),
            params,
            headers,
        })
    }
}

/// Command-line form: `/system-property=prop1:add(value=prop1_b)`.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.address.is_root() {
            write!(f, "{}", self.address)?;
        }
        write!(f, ":{}", self.name)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v.to_cli_string()))
                .collect();
            write!(f, "({})", params.join(","))?;
        }
        if !self.headers.is_empty() {
            let headers: Vec<String> = self
                .headers
                .iter()
                .map(|(k, v)| format!("{}={}", k, v.to_cli_string()))
                .collect();
            write!(f, "{{{}}}", headers.join(";"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
