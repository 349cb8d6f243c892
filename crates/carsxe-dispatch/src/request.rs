//! Outbound request description.

use carsxe_catalog::{HttpMethod, OperationSpec, ParameterLocation, ResolvedField};
use carsxe_core::{API_KEY_PARAM, ApiKey, Error, Result};
use serde_json::{Map, Value};
use url::Url;

/// Query parameter carrying the integration's source tag.
pub const SOURCE_PARAM: &str = "source";

/// A fully built HTTP request, consumed once by the transport.
///
/// The API key and source tag are always the first two query parameters, for
/// GET and POST alike; POST bodies carry only their payload fields.
#[derive(Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    /// Origin, e.g. "https://api.carsxe.com"
    pub base_url: String,
    /// Fixed operation path, e.g. "/v1/recalls"
    pub path: String,
    /// Query parameters in send order; names are unique
    pub query: Vec<(String, String)>,
    /// JSON body, POST only
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    /// Assemble the request for `spec` from already-validated fields.
    pub fn build(
        spec: &OperationSpec,
        fields: Vec<ResolvedField>,
        api_key: &ApiKey,
        source: &str,
        base_url: &str,
    ) -> Self {
        let mut query = vec![
            (API_KEY_PARAM.to_string(), api_key.expose().to_string()),
            (SOURCE_PARAM.to_string(), source.to_string()),
        ];
        let mut body = Map::new();

        for field in fields {
            match field.location {
                ParameterLocation::Query => query.push((field.name, field.value)),
                ParameterLocation::Body => {
                    body.insert(field.name, Value::String(field.value));
                }
            }
        }

        let (body, headers) = match spec.method {
            HttpMethod::Get => (None, Vec::new()),
            HttpMethod::Post => (
                Some(Value::Object(body)),
                vec![("Content-Type".to_string(), "application/json".to_string())],
            ),
        };

        Self {
            method: spec.method,
            base_url: base_url.trim_end_matches('/').to_string(),
            path: spec.path.to_string(),
            query,
            body,
            headers,
        }
    }

    /// Value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL including the encoded query string.
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, self.path))
            .map_err(|e| Error::config_error(format!("invalid request URL: {}", e)))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    /// Method, path and query with the API key masked, for logs.
    pub fn redacted(&self) -> String {
        let query = self
            .query
            .iter()
            .map(|(k, v)| {
                if k == API_KEY_PARAM {
                    format!("{}=***", k)
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{} {}?{}", self.method, self.path, query)
    }
}

impl std::fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("request", &self.redacted())
            .field("base_url", &self.base_url)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .finish()
    }
}
