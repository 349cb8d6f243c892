use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No catalog entry, or the item's parameters could not be validated.
    #[serde(rename = "ConfigurationError")]
    Configuration,
    /// The network call itself failed.
    #[serde(rename = "TransportError")]
    Transport,
    /// Upstream answered with status >= 400.
    #[serde(rename = "HttpError")]
    Http,
    /// Upstream answered with status < 400 but `success: false` in the body.
    #[serde(rename = "ApplicationError")]
    Application,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Transport => "TransportError",
            ErrorKind::Http => "HttpError",
            ErrorKind::Application => "ApplicationError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown operation: {operation} for resource: {resource}")]
    UnknownOperation { resource: String, operation: String },

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A strict-mode run stopped at this item.
    #[error("{message}")]
    ItemFailed {
        index: usize,
        kind: ErrorKind,
        resource: Option<String>,
        operation: Option<String>,
        status_code: Option<u16>,
        message: String,
        response: Option<Value>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Helper for creating configuration errors
    ///
    /// # Example
    /// ```
    /// use carsxe_core::Error;
    /// let err = Error::config_error("missing api key");
    /// ```
    pub fn config_error(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// The taxonomy bucket this error falls into when it is reported for an item.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ItemFailed { kind, .. } => *kind,
            _ => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_configuration_errors() {
        assert_eq!(
            Error::MissingParameter("vin".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::UnknownOperation {
                resource: "vin".into(),
                operation: "teleport".into(),
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::invalid_parameter("deepdata", "expected a boolean").kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_item_failed_display_is_message() {
        let err = Error::ItemFailed {
            index: 2,
            kind: ErrorKind::Http,
            resource: Some("vin".into()),
            operation: Some("specs".into()),
            status_code: Some(404),
            message: "CarsXE API Error (404): not found".into(),
            response: None,
        };
        assert_eq!(err.to_string(), "CarsXE API Error (404): not found");
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    #[test]
    fn test_error_kind_serializes_as_type_name() {
        let json = serde_json::to_string(&ErrorKind::Application).unwrap();
        assert_eq!(json, "\"ApplicationError\"");
        assert_eq!(ErrorKind::Transport.to_string(), "TransportError");
    }
}
