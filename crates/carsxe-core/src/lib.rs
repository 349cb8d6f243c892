//! Core types for the CarsXE vehicle-data integration
//!
//! This crate provides the error taxonomy, configuration loading, API key
//! handling and the parameter-resolution contract shared by the catalog and
//! the dispatcher.

pub mod auth;
pub mod config;
pub mod error;
pub mod params;

// Re-exports
pub use auth::{API_KEY_PARAM, ApiKey, AuthConfig};
pub use config::{ApiConfig, CarsxeConfig, CatalogProfile, DispatchConfig, ObservabilityConfig};
pub use error::{Error, ErrorKind, Result};
pub use params::{
    ADDITIONAL_OPTIONS_PARAM, JsonItem, OPERATION_PARAM, ParameterSource, RESOURCE_PARAM,
};
