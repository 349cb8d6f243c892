//! # CarsXE Telemetry
//!
//! Structured logging and OpenTelemetry tracing for CarsXE API calls.
//!
//! Every upstream call is recorded as one span carrying the operation,
//! resource, HTTP method, path, status code and the classified outcome.

mod spans;
mod tracer;

pub use spans::{ApiCallSpanAttributes, safe_serialize, trace_api_call};
pub use tracer::{init_telemetry, register_span_processor, tracer_provider};

/// OpenTelemetry span attribute names.
pub mod attributes {
    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
    pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
    pub const URL_PATH: &str = "url.path";

    pub const CARSXE_OPERATION: &str = "carsxe.operation";
    pub const CARSXE_RESOURCE: &str = "carsxe.resource";
    pub const CARSXE_ITEM_INDEX: &str = "carsxe.item_index";
    pub const CARSXE_OUTCOME: &str = "carsxe.outcome";
    pub const CARSXE_RUN_ID: &str = "carsxe.run_id";

    pub const SYSTEM_NAME: &str = "carsxe";
}
