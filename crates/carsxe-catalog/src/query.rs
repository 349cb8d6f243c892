//! Strongly-typed inputs, one variant per operation.
//!
//! `VehicleQuery` is a [`ParameterSource`], so typed callers go through the
//! same validation and request building as host-supplied items.

use crate::operations::Operation;
use carsxe_core::{ParameterSource, RESOURCE_PARAM};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAngle {
    Front,
    Side,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    Exterior,
    Interior,
    Engine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    All,
    Large,
    Medium,
    Small,
    Wallpaper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageLicense {
    Modify,
    ModifyCommercially,
    Public,
    Share,
    ShareCommercially,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Json,
    Xml,
}

/// Optional filters for [`VehicleQuery::VehicleImages`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<ImageAngle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_type: Option<PhotoType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<ImageLicense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
}

/// A typed request for one operation.
///
/// # Example
///
/// ```
/// use carsxe_catalog::{Operation, VehicleQuery};
/// use carsxe_core::ParameterSource;
///
/// let query = VehicleQuery::specs("WBAFR7C57CC811956");
/// assert_eq!(query.operation(), Operation::Specs);
/// assert_eq!(query.string_parameter("vin").as_deref(), Some("WBAFR7C57CC811956"));
/// assert_eq!(query.string_parameter("resource").as_deref(), Some("vin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum VehicleQuery {
    #[serde(rename_all = "camelCase")]
    Specs {
        vin: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deepdata: Option<bool>,
        #[serde(
            default,
            rename = "disableIntVINDecoding",
            skip_serializing_if = "Option::is_none"
        )]
        disable_int_vin_decoding: Option<bool>,
    },
    InternationalVinDecode {
        vin: String,
    },
    PlateDecode {
        plate: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        district: Option<String>,
    },
    MarketValue {
        vin: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
    },
    History {
        vin: String,
    },
    VehicleImages {
        make: String,
        model: String,
        #[serde(flatten)]
        options: ImageOptions,
    },
    Recalls {
        vin: String,
    },
    #[serde(rename_all = "camelCase")]
    PlateImageRecognition {
        upload_url: String,
    },
    #[serde(rename_all = "camelCase")]
    VinOcr {
        upload_url: String,
    },
    YearMakeModel {
        year: String,
        make: String,
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trim: Option<String>,
    },
    ObdDecode {
        code: String,
    },
}

impl VehicleQuery {
    pub fn specs(vin: impl Into<String>) -> Self {
        VehicleQuery::Specs {
            vin: vin.into(),
            deepdata: None,
            disable_int_vin_decoding: None,
        }
    }

    pub fn recalls(vin: impl Into<String>) -> Self {
        VehicleQuery::Recalls { vin: vin.into() }
    }

    pub fn plate(plate: impl Into<String>, state: impl Into<String>) -> Self {
        VehicleQuery::PlateDecode {
            plate: plate.into(),
            state: Some(state.into()),
            country: None,
            district: None,
        }
    }

    pub fn obd(code: impl Into<String>) -> Self {
        VehicleQuery::ObdDecode { code: code.into() }
    }

    pub fn operation(&self) -> Operation {
        match self {
            VehicleQuery::Specs { .. } => Operation::Specs,
            VehicleQuery::InternationalVinDecode { .. } => Operation::InternationalVinDecode,
            VehicleQuery::PlateDecode { .. } => Operation::PlateDecode,
            VehicleQuery::MarketValue { .. } => Operation::MarketValue,
            VehicleQuery::History { .. } => Operation::History,
            VehicleQuery::VehicleImages { .. } => Operation::VehicleImages,
            VehicleQuery::Recalls { .. } => Operation::Recalls,
            VehicleQuery::PlateImageRecognition { .. } => Operation::PlateImageRecognition,
            VehicleQuery::VinOcr { .. } => Operation::VinOcr,
            VehicleQuery::YearMakeModel { .. } => Operation::YearMakeModel,
            VehicleQuery::ObdDecode { .. } => Operation::ObdDecode,
        }
    }
}

impl ParameterSource for VehicleQuery {
    fn parameter(&self, name: &str) -> Option<Value> {
        if name == RESOURCE_PARAM {
            return Some(Value::String(self.operation().resource().key().to_string()));
        }
        match serde_json::to_value(self).ok()? {
            Value::Object(mut fields) => fields.remove(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OperationCatalog;
    use serde_json::json;

    #[test]
    fn test_serializes_with_wire_names() {
        let query = VehicleQuery::Specs {
            vin: "WBAFR7C57CC811956".into(),
            deepdata: Some(true),
            disable_int_vin_decoding: Some(true),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "operation": "specs",
                "vin": "WBAFR7C57CC811956",
                "deepdata": true,
                "disableIntVINDecoding": true
            })
        );
    }

    #[test]
    fn test_image_options_flatten() {
        let query = VehicleQuery::VehicleImages {
            make: "BMW".into(),
            model: "X5".into(),
            options: ImageOptions {
                photo_type: Some(PhotoType::Interior),
                size: Some(ImageSize::Large),
                ..Default::default()
            },
        };
        assert_eq!(query.parameter("photoType"), Some(json!("interior")));
        assert_eq!(query.parameter("size"), Some(json!("Large")));
        assert_eq!(query.parameter("operation"), Some(json!("vehicle-images")));
        assert!(query.parameter("year").is_none());
    }

    #[test]
    fn test_typed_query_resolves_through_catalog() {
        let catalog = OperationCatalog::default();
        let query = VehicleQuery::VinOcr {
            upload_url: "https://example.com/vin.jpg".into(),
        };
        let spec = catalog
            .lookup(
                query.string_parameter("resource").as_deref(),
                &query.string_parameter("operation").unwrap(),
            )
            .unwrap();

        let fields = spec.resolve(&query).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "upload_url");
        assert_eq!(fields[0].value, "https://example.com/vin.jpg");
    }

    #[test]
    fn test_deserializes_from_item_json() {
        let query: VehicleQuery = serde_json::from_value(json!({
            "operation": "year-make-model",
            "year": "2012",
            "make": "BMW",
            "model": "X5"
        }))
        .unwrap();
        assert_eq!(query.operation(), Operation::YearMakeModel);
    }
}
