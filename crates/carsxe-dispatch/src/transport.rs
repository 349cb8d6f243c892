//! HTTP transport seam.
//!
//! The dispatcher only ever sees [`HttpTransport`]; [`ReqwestTransport`] is
//! the production implementation. Deadlines are the transport's concern.

use crate::request::OutboundRequest;
use async_trait::async_trait;
use carsxe_catalog::HttpMethod;
use carsxe_core::{ApiConfig, Error, Result};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Full response: status, headers and parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }
}

/// The network call itself failed; no usable response was received.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
    /// Status code salvaged from the failure, if any
    pub status: Option<u16>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue the request and return the full response whatever its status.
    async fn send(&self, request: &OutboundRequest) -> std::result::Result<HttpResponse, TransportFailure>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config_error(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        match config.timeout_secs {
            Some(secs) => Self::with_timeout(Duration::from_secs(secs)),
            None => Ok(Self::new()),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> std::result::Result<HttpResponse, TransportFailure> {
        let url = request
            .url()
            .map_err(|e| TransportFailure::new(e.to_string()))?;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        debug!("Request: {}", request.redacted());

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();

        debug!("Response status: {}", status);

        // The status is already known here; keep it if the body read fails
        let bytes = response.bytes().await.map_err(|e| TransportFailure {
            message: e.to_string(),
            status: Some(status),
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body: parse_body(&bytes),
        })
    }
}

/// JSON when possible, `{ "text": ... }` otherwise, null when empty.
pub(crate) fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(json) => json,
        Err(_) => json!({ "text": String::from_utf8_lossy(bytes) }),
    }
}
