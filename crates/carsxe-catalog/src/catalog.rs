//! The static operation catalog.

use crate::operations::{Operation, Resource};
use crate::types::{OperationSpec, ParameterBinding, ValueKind};
use carsxe_core::{CatalogProfile, Error, Result};
use tracing::debug;

const IMAGE_ANGLES: &[&str] = &["front", "side", "back"];
const IMAGE_PHOTO_TYPES: &[&str] = &["exterior", "interior", "engine"];
const IMAGE_SIZES: &[&str] = &["All", "Large", "Medium", "Small", "Wallpaper"];
const IMAGE_LICENSES: &[&str] = &[
    "Modify",
    "ModifyCommercially",
    "Public",
    "Share",
    "ShareCommercially",
];
const IMAGE_FORMATS: &[&str] = &["json", "xml"];

/// How plate decoding treats the `country` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlateCountry {
    /// Optional; this value is sent when the item leaves it empty.
    DefaultsTo(String),
    /// Must be supplied by the item.
    Required,
}

/// Body field carrying the image URL for image-based operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUrlField {
    UploadUrl,
    ImageUrl,
}

impl ImageUrlField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageUrlField::UploadUrl => "upload_url",
            ImageUrlField::ImageUrl => "image_url",
        }
    }
}

/// Catalog-level settings on which the two host layouts disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogVariant {
    pub plate_country: PlateCountry,
    pub plate_state_required: bool,
    pub image_url_field: ImageUrlField,
}

impl CatalogVariant {
    /// Resource-grouped layout: state required, country defaults to US, `upload_url`.
    pub fn grouped() -> Self {
        Self {
            plate_country: PlateCountry::DefaultsTo("US".to_string()),
            plate_state_required: true,
            image_url_field: ImageUrlField::UploadUrl,
        }
    }

    /// Flat layout: country required, state optional, `image_url`.
    pub fn flat() -> Self {
        Self {
            plate_country: PlateCountry::Required,
            plate_state_required: false,
            image_url_field: ImageUrlField::ImageUrl,
        }
    }
}

impl Default for CatalogVariant {
    fn default() -> Self {
        Self::grouped()
    }
}

impl From<CatalogProfile> for CatalogVariant {
    fn from(profile: CatalogProfile) -> Self {
        match profile {
            CatalogProfile::Grouped => Self::grouped(),
            CatalogProfile::Flat => Self::flat(),
        }
    }
}

/// Lookup table from operation (and optionally resource) to [`OperationSpec`].
///
/// # Example
///
/// ```
/// use carsxe_catalog::{HttpMethod, OperationCatalog};
///
/// let catalog = OperationCatalog::default();
/// let spec = catalog.lookup(Some("plate"), "plateImageRecognition").unwrap();
/// assert_eq!(spec.method, HttpMethod::Post);
/// assert_eq!(spec.path, "/platerecognition");
/// assert!(catalog.lookup(Some("vin"), "plateImageRecognition").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    variant: CatalogVariant,
    specs: Vec<OperationSpec>,
}

impl OperationCatalog {
    pub fn new(variant: CatalogVariant) -> Self {
        let specs = Operation::ALL
            .into_iter()
            .map(|op| build_spec(op, &variant))
            .collect();
        Self { variant, specs }
    }

    pub fn variant(&self) -> &CatalogVariant {
        &self.variant
    }

    /// Find the spec for `operation`, scoped to `resource` when one is given.
    ///
    /// An empty resource string is treated as no resource.
    pub fn lookup(&self, resource: Option<&str>, operation: &str) -> Result<&OperationSpec> {
        let unknown = || Error::UnknownOperation {
            resource: resource.unwrap_or("none").to_string(),
            operation: operation.to_string(),
        };

        let op = Operation::from_key(operation).ok_or_else(unknown)?;

        if let Some(resource) = resource.filter(|r| !r.is_empty()) {
            let resource = Resource::from_key(resource).ok_or_else(unknown)?;
            if op.resource() != resource {
                debug!("Operation '{}' is not part of resource '{}'", op, resource);
                return Err(unknown());
            }
        }

        Ok(self.get(op))
    }

    /// Spec for a known operation.
    pub fn get(&self, operation: Operation) -> &OperationSpec {
        // specs is built from Operation::ALL in declaration order
        &self.specs[operation as usize]
    }

    pub fn specs(&self) -> &[OperationSpec] {
        &self.specs
    }

    /// Specs belonging to one resource group.
    pub fn by_resource(&self, resource: Resource) -> impl Iterator<Item = &OperationSpec> {
        self.specs.iter().filter(move |s| s.resource() == resource)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for OperationCatalog {
    fn default() -> Self {
        Self::new(CatalogVariant::default())
    }
}

fn vin_binding() -> ParameterBinding {
    ParameterBinding::required("vin", "Vehicle Identification Number (17 characters)")
}

fn image_url_binding(variant: &CatalogVariant, description: &str) -> ParameterBinding {
    ParameterBinding::required("uploadUrl", description).in_body(variant.image_url_field.as_str())
}

fn build_spec(operation: Operation, variant: &CatalogVariant) -> OperationSpec {
    match operation {
        Operation::Specs => OperationSpec::new(
            operation,
            "/specs",
            "Decode VIN and get full vehicle specifications",
        )
        .bind(vin_binding())
        .bind(
            ParameterBinding::optional("deepdata", "Whether to include detailed specifications")
                .with_kind(ValueKind::Boolean),
        )
        .bind(
            ParameterBinding::optional(
                "disableIntVINDecoding",
                "Whether to disable international VIN decoding",
            )
            .with_kind(ValueKind::Boolean),
        ),

        Operation::InternationalVinDecode => OperationSpec::new(
            operation,
            "/v1/international-vin-decoder",
            "Decode VIN with worldwide support",
        )
        .bind(vin_binding()),

        Operation::PlateDecode => {
            let state = ParameterBinding::optional(
                "state",
                "State/Province code (required for US, AU, CA)",
            );
            let state = ParameterBinding {
                required: variant.plate_state_required,
                ..state
            };
            let country = match &variant.plate_country {
                PlateCountry::DefaultsTo(code) => {
                    ParameterBinding::optional("country", "Country code (US, CA, AU, UK, PK)")
                        .with_default(code.clone())
                }
                PlateCountry::Required => {
                    ParameterBinding::required("country", "Country code (US, CA, AU, UK, PK)")
                }
            };

            OperationSpec::new(operation, "/v2/platedecoder", "Decode license plate info")
                .bind(ParameterBinding::required("plate", "License plate number"))
                .bind(state)
                .bind(country)
                .bind(ParameterBinding::optional(
                    "district",
                    "District (required for Pakistan)",
                ))
        }

        Operation::MarketValue => OperationSpec::new(
            operation,
            "/v2/marketvalue",
            "Estimate vehicle market value based on VIN",
        )
        .bind(vin_binding())
        .bind(ParameterBinding::optional(
            "state",
            "State code for more accurate market valuation",
        )),

        Operation::History => {
            OperationSpec::new(operation, "/history", "Retrieve vehicle history")
                .bind(vin_binding())
        }

        Operation::VehicleImages => OperationSpec::new(
            operation,
            "/images",
            "Fetch images by make, model, year, trim",
        )
        .bind(ParameterBinding::required("make", "Vehicle make"))
        .bind(ParameterBinding::required("model", "Vehicle model"))
        .bind(ParameterBinding::optional("year", "The vehicle year"))
        .bind(ParameterBinding::optional("color", "The vehicle color"))
        .bind(ParameterBinding::optional("trim", "The vehicle trim level"))
        .bind(
            ParameterBinding::optional(
                "transparent",
                "Whether to prioritize images with transparent background",
            )
            .with_kind(ValueKind::Boolean),
        )
        .bind(
            ParameterBinding::optional("angle", "The angle to show the car in")
                .with_kind(ValueKind::Choice(IMAGE_ANGLES)),
        )
        .bind(
            ParameterBinding::optional("photoType", "Interior, exterior or engine images")
                .with_kind(ValueKind::Choice(IMAGE_PHOTO_TYPES)),
        )
        .bind(
            ParameterBinding::optional("size", "The image size")
                .with_kind(ValueKind::Choice(IMAGE_SIZES)),
        )
        .bind(
            ParameterBinding::optional("license", "Filter images by license type")
                .with_kind(ValueKind::Choice(IMAGE_LICENSES)),
        )
        .bind(
            ParameterBinding::optional("format", "The format of the response")
                .with_kind(ValueKind::Choice(IMAGE_FORMATS)),
        ),

        Operation::Recalls => {
            OperationSpec::new(operation, "/v1/recalls", "Get safety recall data for a VIN")
                .bind(vin_binding())
        }

        Operation::PlateImageRecognition => OperationSpec::new(
            operation,
            "/platerecognition",
            "Read and decode plates from images",
        )
        .post()
        .bind(image_url_binding(
            variant,
            "URL of the license plate image to analyze",
        )),

        Operation::VinOcr => {
            OperationSpec::new(operation, "/v1/vinocr", "Extract VINs from images using OCR")
                .post()
                .bind(image_url_binding(
                    variant,
                    "URL of the VIN image to extract text from",
                ))
        }

        Operation::YearMakeModel => OperationSpec::new(
            operation,
            "/v1/ymm",
            "Query vehicle by year, make, model and trim",
        )
        .bind(ParameterBinding::required("year", "Vehicle year"))
        .bind(ParameterBinding::required("make", "Vehicle make"))
        .bind(ParameterBinding::required("model", "Vehicle model"))
        .bind(ParameterBinding::optional("trim", "Vehicle trim level")),

        Operation::ObdDecode => OperationSpec::new(
            operation,
            "/obdcodesdecoder",
            "Decode OBD error/diagnostic codes",
        )
        .bind(ParameterBinding::required("code", "OBD error/diagnostic code")),
    }
}
