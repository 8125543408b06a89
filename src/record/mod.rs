//! Record store access.
//!
//! The [`RecordStore`] trait is the seam between the HTTP routes and the
//! hosted spreadsheet. [`AirtableClient`] is the production implementation.

mod airtable;
mod error;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;

use crate::model::{VehicleAttributes, VehicleImageRecord, VehicleRecord, VehicleStatus};

pub use airtable::AirtableClient;
pub use error::RecordError;

/// Vehicle and photo rows in a remote store.
///
/// Lookups by vehicle id match the `VIN` column. `Ok(None)` from a lookup or a
/// write means the store answered but produced no record, which is distinct
/// from a failed request.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// First vehicle row for this id.
    async fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<VehicleRecord>, RecordError>;

    /// Photo rows for this id, ascending by `Order`.
    async fn get_vehicle_images(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<VehicleImageRecord>, RecordError>;

    /// All vehicles with a status, newest first.
    async fn list_vehicles(&self, status: VehicleStatus) -> Result<Vec<VehicleRecord>, RecordError>;

    /// Create a vehicle. The store forces `Status = Active` and stamps
    /// `Created`/`Updated`.
    async fn create_vehicle(
        &self,
        fields: VehicleAttributes,
    ) -> Result<Option<VehicleRecord>, RecordError>;

    /// Patch the fields a vehicle row names, stamping `Updated`.
    async fn update_vehicle(
        &self,
        record_id: &str,
        fields: VehicleAttributes,
    ) -> Result<Option<VehicleRecord>, RecordError>;

    async fn add_vehicle_image(
        &self,
        fields: VehicleImageRecord,
    ) -> Result<Option<VehicleImageRecord>, RecordError>;
}

/// Timestamp format used for `Created`/`Updated`.
pub(crate) fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Airtable formula matching one column against a literal.
pub(crate) fn equals_formula(field: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{{{}}} = '{}'", field, escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_formula() {
        assert_eq!(equals_formula("VIN", "W1K6G7GB1PA123456"), "{VIN} = 'W1K6G7GB1PA123456'");
        assert_eq!(equals_formula("Status", "Active"), "{Status} = 'Active'");
    }

    #[test]
    fn test_equals_formula_escapes_quotes() {
        assert_eq!(equals_formula("VIN", "a' OR '1'='1"), r"{VIN} = 'a\' OR \'1\'=\'1'");
        assert_eq!(equals_formula("VIN", r"a\b"), r"{VIN} = 'a\\b'");
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp_now();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
