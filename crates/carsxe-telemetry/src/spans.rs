//! Span helpers for upstream API calls

use crate::attributes::*;

/// Attributes for tracing one CarsXE API call
#[derive(Debug, Clone)]
pub struct ApiCallSpanAttributes {
    pub run_id: String,
    pub item_index: usize,
    pub operation: String,
    pub resource: String,
    pub method: String,
    pub path: String,
    /// HTTP status, when a response was received
    pub status_code: Option<u16>,
    /// Classified outcome ("Success", "HttpError", ...)
    pub outcome: String,
}

/// Record an OpenTelemetry span for a completed API call.
///
/// The span carries the operation identity, the HTTP method and path (never
/// the query string, which holds the API key) and the classified outcome.
pub fn trace_api_call(attrs: ApiCallSpanAttributes) {
    let span = tracing::info_span!(
        "carsxe_api_call",
        { CARSXE_RUN_ID } = %attrs.run_id,
        { CARSXE_ITEM_INDEX } = attrs.item_index,
        { CARSXE_OPERATION } = %attrs.operation,
        { CARSXE_RESOURCE } = %attrs.resource,
        { HTTP_REQUEST_METHOD } = %attrs.method,
        { URL_PATH } = %attrs.path,
        { CARSXE_OUTCOME } = %attrs.outcome,
        { HTTP_RESPONSE_STATUS_CODE } = tracing::field::Empty,
    );

    if let Some(status) = attrs.status_code {
        span.record(HTTP_RESPONSE_STATUS_CODE, status);
    }

    // Enter and immediately exit the span (it's recorded)
    let _guard = span.enter();
}

/// Helper to safely serialize to JSON string
pub fn safe_serialize<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<not serializable>".to_string())
}
