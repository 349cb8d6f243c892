//! Data structures describing catalog operations.

use crate::operations::{Operation, Resource};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location where a field appears in the outbound request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// URL query parameter (e.g., ?vin=value)
    Query,
    /// Field of the JSON request body
    Body,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Body => write!(f, "body"),
        }
    }
}

/// Accepted shape of an input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text; numbers are accepted and rendered as text.
    Text,
    /// `true`/`false`, or the strings "true"/"false".
    Boolean,
    /// One of a fixed set of strings. The empty string means "unset".
    Choice(&'static [&'static str]),
}

impl ValueKind {
    fn schema(&self) -> Value {
        match self {
            ValueKind::Text => json!({ "type": "string" }),
            ValueKind::Boolean => json!({ "type": "boolean" }),
            ValueKind::Choice(options) => json!({ "type": "string", "enum": options }),
        }
    }
}

/// How one input field maps onto the outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    /// Field name looked up on the input item
    pub source: String,
    /// Query parameter or body field name on the wire
    pub target: String,
    /// Where the field is sent
    pub location: ParameterLocation,
    /// Accepted value shape
    pub kind: ValueKind,
    /// Whether the item must supply a non-empty value
    pub required: bool,
    /// Value sent when the item leaves the field empty
    pub default: Option<String>,
    /// Human-readable description
    pub description: String,
}

impl ParameterBinding {
    /// Required query parameter sent under its own name.
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            source: name.to_string(),
            target: name.to_string(),
            location: ParameterLocation::Query,
            kind: ValueKind::Text,
            required: true,
            default: None,
            description: description.to_string(),
        }
    }

    /// Optional query parameter, omitted when empty.
    pub fn optional(name: &str, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, description)
        }
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn in_body(mut self, target: impl Into<String>) -> Self {
        self.location = ParameterLocation::Body;
        self.target = target.into();
        self
    }
}

/// Everything needed to build the request for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    pub operation: Operation,
    pub method: HttpMethod,
    /// Fixed path (e.g., "/v2/platedecoder")
    pub path: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Input bindings in the order they are sent
    pub bindings: Vec<ParameterBinding>,
}

impl OperationSpec {
    pub fn new(operation: Operation, path: &'static str, description: &'static str) -> Self {
        Self {
            operation,
            method: HttpMethod::Get,
            path,
            description,
            bindings: Vec::new(),
        }
    }

    pub fn post(mut self) -> Self {
        self.method = HttpMethod::Post;
        self
    }

    pub fn bind(mut self, binding: ParameterBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Canonical operation key.
    pub fn key(&self) -> &'static str {
        self.operation.key()
    }

    pub fn resource(&self) -> Resource {
        self.operation.resource()
    }

    pub fn binding(&self, source: &str) -> Option<&ParameterBinding> {
        self.bindings.iter().find(|b| b.source == source)
    }

    /// JSON schema describing the operation's inputs.
    pub fn schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for binding in &self.bindings {
            let mut schema = binding.kind.schema();
            schema["description"] = json!(binding.description);
            if let Some(default) = &binding.default {
                schema["default"] = json!(default);
            }
            properties.insert(binding.source.clone(), schema);

            if binding.required {
                required.push(binding.source.clone());
            }
        }

        let mut schema = json!({
            "type": "object",
            "description": self.description,
            "properties": properties,
        });

        if !required.is_empty() {
            schema["required"] = json!(required);
        }

        schema
    }
}

/// A validated field ready to be placed on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub location: ParameterLocation,
    pub value: String,
}
