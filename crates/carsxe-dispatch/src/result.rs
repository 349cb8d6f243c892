//! Normalized per-item results.

use carsxe_core::{Error, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Self-reported error fields extracted from an upstream body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub description: String,
}

/// Classified outcome of one item.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Upstream body, verbatim.
    Success(Value),
    /// Status < 400 with `success: false` in the body.
    ApplicationError { payload: Value, error: ErrorDetail },
    /// Status >= 400.
    HttpError {
        status: u16,
        payload: Value,
        error: ErrorDetail,
    },
    /// The transport failed; status only when the failure exposed one.
    TransportError {
        message: String,
        status: Option<u16>,
    },
    /// No catalog entry, or the item's parameters were rejected.
    ConfigurationError { message: String },
}

impl Outcome {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::ApplicationError { .. } => Some(ErrorKind::Application),
            Outcome::HttpError { .. } => Some(ErrorKind::Http),
            Outcome::TransportError { .. } => Some(ErrorKind::Transport),
            Outcome::ConfigurationError { .. } => Some(ErrorKind::Configuration),
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().map_or("Success", |k| k.as_str())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Outcome::HttpError { status, .. } => Some(*status),
            Outcome::TransportError { status, .. } => *status,
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            Outcome::Success(_) => String::new(),
            Outcome::ApplicationError { error, .. } | Outcome::HttpError { error, .. } => {
                error.message.clone()
            }
            Outcome::TransportError { message, .. } | Outcome::ConfigurationError { message } => {
                message.clone()
            }
        }
    }

    fn description(&self) -> String {
        match self {
            Outcome::ApplicationError { error, .. } | Outcome::HttpError { error, .. } => {
                error.description.clone()
            }
            _ => String::new(),
        }
    }

    fn payload(&self) -> Option<&Value> {
        match self {
            Outcome::Success(payload)
            | Outcome::ApplicationError { payload, .. }
            | Outcome::HttpError { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// One output record per input item.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    /// 0-based position of the originating item
    pub index: usize,
    pub resource: Option<String>,
    pub operation: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
}

/// A status code, or the literal "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusField {
    Code(u16),
    Unknown(&'static str),
}

impl From<Option<u16>> for StatusField {
    fn from(status: Option<u16>) -> Self {
        status.map_or(StatusField::Unknown("unknown"), StatusField::Code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub resource: Option<String>,
    pub operation: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub item_index: usize,
}

/// Output shape for a failed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub success: bool,
    /// Failure flag, always true
    pub error: bool,
    pub error_type: ErrorKind,
    pub error_message: String,
    pub error_description: String,
    pub status_code: StatusField,
    /// Upstream body when one was received
    pub response_data: Value,
    #[serde(rename = "_metadata")]
    pub metadata: ResultMetadata,
}

impl NormalizedResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.outcome.kind()
    }

    /// Error record for a failed item, `None` on success.
    pub fn error_record(&self) -> Option<ErrorRecord> {
        let error_type = self.kind()?;
        Some(ErrorRecord {
            success: false,
            error: true,
            error_type,
            error_message: self.outcome.message(),
            error_description: self.outcome.description(),
            status_code: self.outcome.status_code().into(),
            response_data: self.outcome.payload().cloned().unwrap_or(Value::Null),
            metadata: ResultMetadata {
                resource: self.resource.clone(),
                operation: self.operation.clone(),
                timestamp: self.timestamp,
                item_index: self.index,
            },
        })
    }

    /// Record handed back to the host: the raw body on success, an
    /// [`ErrorRecord`] otherwise.
    pub fn to_output(&self) -> Value {
        match (&self.outcome, self.error_record()) {
            (Outcome::Success(payload), _) => payload.clone(),
            (_, Some(record)) => serde_json::to_value(record).unwrap_or(Value::Null),
            (_, None) => Value::Null,
        }
    }

    /// Human-readable failure message used when a strict run aborts.
    pub fn failure_message(&self) -> String {
        let with_detail = |message: &str, detail: &str| {
            if detail.is_empty() {
                message.to_string()
            } else {
                format!("{} - {}", message, detail)
            }
        };

        match &self.outcome {
            Outcome::Success(_) => String::new(),
            Outcome::HttpError { status, error, .. } => format!(
                "CarsXE API Error ({}): {}",
                status,
                with_detail(&error.message, &error.description)
            ),
            Outcome::ApplicationError { error, .. } => format!(
                "CarsXE API Error: {}",
                with_detail(&error.message, &error.description)
            ),
            Outcome::TransportError { message, .. } => {
                format!("CarsXE request failed: {}", message)
            }
            Outcome::ConfigurationError { message } => message.clone(),
        }
    }

    /// Convert a failed result into the error that aborts a strict run.
    pub fn into_error(self) -> Error {
        let message = self.failure_message();
        let kind = self.kind().unwrap_or(ErrorKind::Configuration);
        let status_code = self.outcome.status_code();
        let response = self.outcome.payload().cloned();

        Error::ItemFailed {
            index: self.index,
            kind,
            resource: self.resource,
            operation: self.operation,
            status_code,
            message,
            response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(outcome: Outcome) -> NormalizedResult {
        NormalizedResult {
            index: 1,
            resource: Some("vin".to_string()),
            operation: Some("specs".to_string()),
            timestamp: Utc::now(),
            outcome,
        }
    }

    fn http_404() -> Outcome {
        Outcome::HttpError {
            status: 404,
            payload: json!({ "error": "not found" }),
            error: ErrorDetail {
                message: "not found".to_string(),
                description: String::new(),
            },
        }
    }

    #[test]
    fn test_success_output_is_verbatim() {
        let r = result(Outcome::Success(json!({ "make": "BMW" })));
        assert!(r.is_success());
        assert_eq!(r.to_output(), json!({ "make": "BMW" }));
        assert!(r.error_record().is_none());
    }

    #[test]
    fn test_http_error_record() {
        let output = result(http_404()).to_output();

        assert_eq!(output["success"], json!(false));
        assert_eq!(output["error"], json!(true));
        assert_eq!(output["errorType"], json!("HttpError"));
        assert_eq!(output["errorMessage"], json!("not found"));
        assert_eq!(output["statusCode"], json!(404));
        assert_eq!(output["responseData"], json!({ "error": "not found" }));
        assert_eq!(output["_metadata"]["itemIndex"], json!(1));
        assert_eq!(output["_metadata"]["operation"], json!("specs"));
        assert!(output["_metadata"]["timestamp"].is_string());
    }

    #[test]
    fn test_transport_status_defaults_to_unknown() {
        let output = result(Outcome::TransportError {
            message: "connection refused".to_string(),
            status: None,
        })
        .to_output();

        assert_eq!(output["statusCode"], json!("unknown"));
        assert_eq!(output["errorType"], json!("TransportError"));
        assert_eq!(output["responseData"], Value::Null);
    }

    #[test]
    fn test_into_error_carries_context() {
        let err = result(http_404()).into_error();
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("not found"));

        match err {
            Error::ItemFailed {
                index,
                kind,
                response,
                ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(kind, ErrorKind::Http);
                assert_eq!(response, Some(json!({ "error": "not found" })));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_failure_message_appends_detail() {
        let r = result(Outcome::ApplicationError {
            payload: json!({}),
            error: ErrorDetail {
                message: "invalid vin".to_string(),
                description: "VIN must be 17 characters".to_string(),
            },
        });
        assert_eq!(
            r.failure_message(),
            "CarsXE API Error: invalid vin - VIN must be 17 characters"
        );
    }
}
