//! Tracer setup and management

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{SimpleSpanProcessor, TracerProvider};
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Global tracer provider holder
static TRACER_PROVIDER: OnceLock<Arc<TracerProvider>> = OnceLock::new();

/// Span processor builders registered before initialization
type ProcessorBuilder = Box<dyn FnOnce() -> SimpleSpanProcessor + Send>;
static SPAN_PROCESSOR_BUILDERS: Mutex<Option<Vec<ProcessorBuilder>>> = Mutex::new(Some(Vec::new()));

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Register a span processor builder to be used when telemetry is initialized.
///
/// Must be called BEFORE `init_telemetry()`; later registrations are dropped
/// with a warning.
///
/// # Example
///
/// ```ignore
/// use carsxe_telemetry::{register_span_processor, init_telemetry};
/// use opentelemetry_sdk::trace::SimpleSpanProcessor;
///
/// register_span_processor(Box::new(|| {
///     SimpleSpanProcessor::new(Box::new(/* your exporter */))
/// }));
/// init_telemetry("carsxe", false);
/// ```
pub fn register_span_processor(builder: ProcessorBuilder) {
    let Ok(mut builders) = SPAN_PROCESSOR_BUILDERS.lock() else {
        tracing::warn!("Span processor registry is poisoned, dropping processor");
        return;
    };

    if let Some(ref mut vec) = *builders {
        vec.push(builder);
    } else {
        tracing::warn!("Attempted to register span processor after telemetry initialization");
    }
}

/// Initialize logging and OpenTelemetry tracing.
///
/// Log lines go to stderr (stdout is reserved for command output), as JSON
/// when `json` is set. The level filter comes from `RUST_LOG`, defaulting to
/// `warn`. Returns `false` if a global subscriber was already installed.
///
/// # Example
///
/// ```rust,no_run
/// use carsxe_telemetry::init_telemetry;
///
/// init_telemetry("carsxe", false);
/// ```
pub fn init_telemetry(service_name: &str, json: bool) -> bool {
    // Take the span processor builders (can only initialize once)
    let builders = SPAN_PROCESSOR_BUILDERS
        .lock()
        .ok()
        .and_then(|mut builders| builders.take())
        .unwrap_or_default();

    let mut provider_builder = TracerProvider::builder();
    for builder in builders {
        provider_builder = provider_builder.with_span_processor(builder());
    }
    let tracer_provider = provider_builder.build();

    let tracer = tracer_provider.tracer(service_name.to_string());
    let _ = TRACER_PROVIDER.set(Arc::new(tracer_provider));

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let (pretty_layer, json_layer) = if json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true);
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_line_number(true);
        (Some(layer), None)
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(pretty_layer)
        .with(json_layer)
        .with(filter)
        .try_init()
        .is_ok()
}

/// Get the global tracer provider if initialized
pub fn tracer_provider() -> Option<Arc<TracerProvider>> {
    TRACER_PROVIDER.get().cloned()
}
