//! Vehicle records as stored in the record store.

use serde::{Deserialize, Serialize};

/// Listing status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[default]
    Active,
    Sold,
    Pending,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "Active",
            VehicleStatus::Sold => "Sold",
            VehicleStatus::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute fields of a vehicle row.
///
/// Every field is optional: the record store omits empty cells, and the same
/// shape doubles as a partial update. Absent fields are not serialized, so a
/// patch only touches what it names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleAttributes {
    #[serde(rename = "Vehicle ID", skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(rename = "Year", skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(rename = "Make", skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(rename = "Model", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "Trim", skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(rename = "VIN", skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(rename = "Mileage", skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
    #[serde(rename = "Zip Code", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(rename = "Exterior Color", skip_serializing_if = "Option::is_none")]
    pub exterior_color: Option<String>,
    #[serde(rename = "Interior Color", skip_serializing_if = "Option::is_none")]
    pub interior_color: Option<String>,
    #[serde(rename = "Vehicle Condition", skip_serializing_if = "Option::is_none")]
    pub vehicle_condition: Option<String>,
    #[serde(rename = "Tire Condition", skip_serializing_if = "Option::is_none")]
    pub tire_condition: Option<String>,
    #[serde(rename = "Add-ons", skip_serializing_if = "Option::is_none")]
    pub add_ons: Option<String>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
    #[serde(rename = "Created", skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(rename = "Updated", skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl VehicleAttributes {
    /// "2023 Mercedes Benz S580", skipping whatever is missing.
    pub fn title(&self) -> String {
        let year = self.year.map(|year| year.to_string());
        [year.as_deref(), self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A row as returned by the record store: its opaque record id plus fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: String,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    pub fields: F,
}

pub type VehicleRecord = Record<VehicleAttributes>;
