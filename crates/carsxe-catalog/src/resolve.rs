//! Validation of item parameters against an operation's bindings.
//!
//! This is the single entry point between loosely-typed host parameters and
//! request building: required fields must be present and non-empty, values
//! must match the binding's kind, and optional fields that are empty, false
//! or unset are dropped so the upstream API's own defaults apply.

use crate::types::{OperationSpec, ParameterBinding, ResolvedField, ValueKind};
use carsxe_core::{Error, ParameterSource, Result};
use serde_json::Value;
use tracing::debug;

impl OperationSpec {
    /// Validate `params` and return the fields to send, in binding order.
    pub fn resolve(&self, params: &dyn ParameterSource) -> Result<Vec<ResolvedField>> {
        let mut fields = Vec::with_capacity(self.bindings.len());

        for binding in &self.bindings {
            let value = coerce(binding, params.parameter(&binding.source))?;

            match value.or_else(|| binding.default.clone()) {
                Some(value) => fields.push(ResolvedField {
                    name: binding.target.clone(),
                    location: binding.location,
                    value,
                }),
                None if binding.required => {
                    return Err(Error::MissingParameter(binding.source.clone()));
                }
                None => debug!("Omitting empty optional field '{}'", binding.source),
            }
        }

        Ok(fields)
    }
}

/// Normalize one raw value. `Ok(None)` means "treat as unset".
fn coerce(binding: &ParameterBinding, raw: Option<Value>) -> Result<Option<String>> {
    let name = &binding.source;
    let Some(raw) = raw else {
        return Ok(None);
    };

    match (binding.kind, raw) {
        (_, Value::Null) => Ok(None),

        (ValueKind::Text, Value::String(s)) => Ok(non_empty(s)),
        (ValueKind::Text, Value::Number(n)) => Ok(Some(n.to_string())),

        (ValueKind::Boolean, Value::Bool(b)) => Ok(b.then(|| "true".to_string())),
        (ValueKind::Boolean, Value::String(s)) => match s.trim() {
            "" | "false" => Ok(None),
            "true" => Ok(Some("true".to_string())),
            other => Err(Error::invalid_parameter(
                name,
                format!("expected a boolean, got '{}'", other),
            )),
        },

        (ValueKind::Choice(options), Value::String(s)) => {
            if s.is_empty() {
                Ok(None)
            } else if options.contains(&s.as_str()) {
                Ok(Some(s))
            } else {
                Err(Error::invalid_parameter(
                    name,
                    format!("expected one of [{}], got '{}'", options.join(", "), s),
                ))
            }
        }

        (kind, other) => Err(Error::invalid_parameter(
            name,
            format!("expected {}, got {}", kind_label(kind), other),
        )),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn kind_label(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "a string",
        ValueKind::Boolean => "a boolean",
        ValueKind::Choice(_) => "one of the listed options",
    }
}
