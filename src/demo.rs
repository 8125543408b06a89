//! Demo vehicle shown when no real record is available.

use crate::model::{VehicleAttributes, VehicleStatus};

/// The fallback listing: a 2023 Mercedes Benz S580 4MATIC.
pub fn demo_vehicle() -> VehicleAttributes {
    VehicleAttributes {
        vehicle_id: Some("MERC2023001".into()),
        year: Some(2023),
        make: Some("Mercedes Benz".into()),
        model: Some("S580".into()),
        trim: Some("4MATIC".into()),
        vin: Some("W1K6G7GB1PA123456".into()),
        mileage: Some(10420),
        zip_code: Some("90210".into()),
        exterior_color: Some("Obsidian Black".into()),
        interior_color: Some("Macchiato Beige".into()),
        vehicle_condition: Some("Excellent".into()),
        tire_condition: Some("Medium Wear".into()),
        add_ons: Some(r#"AMG Line Package, Ceramic Coating, 22" AMG Wheels"#.into()),
        status: Some(VehicleStatus::Active),
        created: None,
        updated: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_vehicle() {
        let demo = demo_vehicle();
        assert_eq!(demo.title(), "2023 Mercedes Benz S580");
        assert_eq!(demo.vin.as_deref(), Some("W1K6G7GB1PA123456"));
    }
}
