//! Response classification.

use crate::result::{ErrorDetail, Outcome};
use crate::transport::{HttpResponse, TransportFailure};
use serde_json::Value;

/// Classify a transport result into an [`Outcome`].
///
/// Order matters: transport failure, then status >= 400, then an explicit
/// `success: false` in the body, then success.
pub fn classify(result: Result<HttpResponse, TransportFailure>) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(failure) => {
            return Outcome::TransportError {
                message: failure.message,
                status: failure.status,
            };
        }
    };

    let body = response.body;

    if response.status >= 400 {
        let error = ErrorDetail {
            message: first_text(&body, &["error", "message"])
                .unwrap_or_else(|| format!("HTTP {} Error", response.status)),
            description: first_text(&body, &["error_description", "details", "message"])
                .unwrap_or_default(),
        };
        return Outcome::HttpError {
            status: response.status,
            payload: body,
            error,
        };
    }

    if body.get("success") == Some(&Value::Bool(false)) {
        let error = ErrorDetail {
            message: first_text(&body, &["error", "message"])
                .unwrap_or_else(|| "API request failed".to_string()),
            description: first_text(&body, &["error_description", "details"]).unwrap_or_default(),
        };
        return Outcome::ApplicationError {
            payload: body,
            error,
        };
    }

    Outcome::Success(body)
}

/// First of `keys` holding a non-empty value, rendered as text.
fn first_text(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match body.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}
