//! Operation and resource identifiers.

use serde::{Deserialize, Serialize};

/// Grouping label used by the grouped catalog layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Vin,
    Plate,
    Vehicle,
    Diagnostic,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Vin,
        Resource::Plate,
        Resource::Vehicle,
        Resource::Diagnostic,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Resource::Vin => "vin",
            Resource::Plate => "plate",
            Resource::Vehicle => "vehicle",
            Resource::Diagnostic => "diagnostic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Vin => "VIN",
            Resource::Plate => "License Plate",
            Resource::Vehicle => "Vehicle Data",
            Resource::Diagnostic => "Diagnostic",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One callable capability of the CarsXE API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Specs,
    InternationalVinDecode,
    PlateDecode,
    MarketValue,
    History,
    VehicleImages,
    Recalls,
    PlateImageRecognition,
    VinOcr,
    YearMakeModel,
    ObdDecode,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::Specs,
        Operation::InternationalVinDecode,
        Operation::PlateDecode,
        Operation::MarketValue,
        Operation::History,
        Operation::VehicleImages,
        Operation::Recalls,
        Operation::PlateImageRecognition,
        Operation::VinOcr,
        Operation::YearMakeModel,
        Operation::ObdDecode,
    ];

    /// Canonical kebab-case key.
    pub fn key(&self) -> &'static str {
        match self {
            Operation::Specs => "specs",
            Operation::InternationalVinDecode => "international-vin-decode",
            Operation::PlateDecode => "plate-decode",
            Operation::MarketValue => "market-value",
            Operation::History => "history",
            Operation::VehicleImages => "vehicle-images",
            Operation::Recalls => "recalls",
            Operation::PlateImageRecognition => "plate-image-recognition",
            Operation::VinOcr => "vin-ocr",
            Operation::YearMakeModel => "year-make-model",
            Operation::ObdDecode => "obd-decode",
        }
    }

    /// Identifier used by the grouped host UI.
    pub fn alias(&self) -> &'static str {
        match self {
            Operation::Specs => "specs",
            Operation::InternationalVinDecode => "intVinDecoder",
            Operation::PlateDecode => "plateDecoder",
            Operation::MarketValue => "marketValue",
            Operation::History => "history",
            Operation::VehicleImages => "images",
            Operation::Recalls => "recalls",
            Operation::PlateImageRecognition => "plateImageRecognition",
            Operation::VinOcr => "vinOcr",
            Operation::YearMakeModel => "yearMakeModel",
            Operation::ObdDecode => "obdCodesDecoder",
        }
    }

    /// Accepts either the canonical key or the UI alias.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.key() == key || op.alias() == key)
    }

    pub fn resource(&self) -> Resource {
        match self {
            Operation::Specs
            | Operation::InternationalVinDecode
            | Operation::MarketValue
            | Operation::History
            | Operation::Recalls => Resource::Vin,
            Operation::PlateDecode | Operation::PlateImageRecognition => Resource::Plate,
            Operation::VehicleImages | Operation::YearMakeModel => Resource::Vehicle,
            Operation::VinOcr | Operation::ObdDecode => Resource::Diagnostic,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
