//! # CarsXE Request Dispatcher
//!
//! Turns input items into CarsXE API calls and normalizes every outcome.
//!
//! ## Features
//!
//! - One request per item, processed strictly in order
//! - GET operations carry all fields as query parameters; POST operations
//!   send a JSON body with the image URL and keep the key in the query
//! - Every response classified as success, application error, HTTP error or
//!   transport error; unknown operations and invalid input as configuration
//!   errors
//! - Strict (abort on first failure) and continue-on-fail policies
//! - Pluggable [`HttpTransport`]; [`ReqwestTransport`] for production use
//!
//! ## Example
//!
//! ```no_run
//! use carsxe_core::{CarsxeConfig, JsonItem};
//! use carsxe_dispatch::{Dispatcher, ReqwestTransport};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> carsxe_core::Result<()> {
//! let config = CarsxeConfig::load()?;
//! let transport = Arc::new(ReqwestTransport::from_config(&config.api)?);
//! let dispatcher = Dispatcher::from_config(&config, transport)?;
//!
//! let items = JsonItem::many_from_value(json!([
//!     { "resource": "vin", "operation": "specs", "vin": "WBAFR7C57CC811956" }
//! ]))?;
//! for output in dispatcher.run_outputs(&items).await? {
//!     println!("{}", output);
//! }
//! # Ok(())
//! # }
//! ```

mod classify;
mod dispatcher;
mod request;
mod result;
pub mod testing;
mod transport;

pub use classify::classify;
pub use dispatcher::{Dispatcher, FailurePolicy, SAMPLE_VIN};
pub use request::{OutboundRequest, SOURCE_PARAM};
pub use result::{ErrorDetail, ErrorRecord, NormalizedResult, Outcome, ResultMetadata, StatusField};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportFailure};
