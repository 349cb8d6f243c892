//! # CarsXE Operation Catalog
//!
//! Static table mapping each CarsXE operation to its HTTP method, path and
//! parameter bindings.
//!
//! ## Features
//!
//! - Lookup by operation alone or by resource + operation
//! - Canonical kebab-case keys plus the camelCase identifiers of the host UI
//! - Two catalog variants for plate decoding and image URL field naming
//! - Sparse field resolution: optional fields are only sent when set
//! - JSON schema per operation
//!
//! ## Example
//!
//! ```
//! use carsxe_catalog::{OperationCatalog, CatalogVariant};
//! use carsxe_core::JsonItem;
//! use serde_json::json;
//!
//! let catalog = OperationCatalog::new(CatalogVariant::grouped());
//! let spec = catalog.lookup(Some("vin"), "specs")?;
//!
//! let item = JsonItem::from_value(json!({ "vin": "WBAFR7C57CC811956" }))?;
//! let fields = spec.resolve(&item)?;
//! assert_eq!(fields.len(), 1);
//! # Ok::<(), carsxe_core::Error>(())
//! ```

mod catalog;
mod operations;
mod query;
mod resolve;
mod types;

pub use catalog::{CatalogVariant, ImageUrlField, OperationCatalog, PlateCountry};
pub use operations::{Operation, Resource};
pub use query::{
    ImageAngle, ImageFormat, ImageLicense, ImageOptions, ImageSize, PhotoType, VehicleQuery,
};
pub use types::{
    HttpMethod, OperationSpec, ParameterBinding, ParameterLocation, ResolvedField, ValueKind,
};
