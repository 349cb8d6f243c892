//! Parameter resolution for input items.
//!
//! The host hands over loosely-typed, named parameter lookups per item.
//! [`ParameterSource`] is that collaborator; everything downstream validates
//! what it gets from here.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Parameter naming the resource group of an item.
pub const RESOURCE_PARAM: &str = "resource";
/// Parameter naming the operation of an item.
pub const OPERATION_PARAM: &str = "operation";
/// Nested object holding optional fields ("Additional Options" in the host UI).
pub const ADDITIONAL_OPTIONS_PARAM: &str = "additionalOptions";

/// Named parameter lookup for one input item.
pub trait ParameterSource: Send + Sync {
    /// Value of `name`, or `None` when the item does not set it.
    fn parameter(&self, name: &str) -> Option<Value>;

    /// String parameter, or `None` when unset, null or not a string.
    fn string_parameter(&self, name: &str) -> Option<String> {
        match self.parameter(name)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// An input item backed by a JSON object.
///
/// Lookups try the top level first, then the `additionalOptions` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonItem {
    fields: Map<String, Value>,
}

impl JsonItem {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(Error::invalid_parameter(
                "item",
                format!("expected a JSON object, got {}", type_name(&other)),
            )),
        }
    }

    /// Parse a JSON array of objects into items.
    pub fn many_from_value(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Array(values) => values.into_iter().map(Self::from_value).collect(),
            Value::Object(fields) => Ok(vec![Self { fields }]),
            other => Err(Error::invalid_parameter(
                "items",
                format!("expected an array of objects, got {}", type_name(&other)),
            )),
        }
    }

    /// Set a top-level field.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl ParameterSource for JsonItem {
    fn parameter(&self, name: &str) -> Option<Value> {
        let top = self.fields.get(name);
        if let Some(value) = top.filter(|v| !is_blank(v)) {
            return Some(value.clone());
        }
        self.fields
            .get(ADDITIONAL_OPTIONS_PARAM)
            .and_then(Value::as_object)
            .and_then(|options| options.get(name))
            .or(top)
            .cloned()
    }
}

/// Null or the empty string: set, but carrying no value.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
