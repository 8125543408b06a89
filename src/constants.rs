//! Global constants for the TRADELUX server and page model

// ============================================================================
// Record store
// ============================================================================

/// Default Airtable REST endpoint
pub const AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

/// Table holding one row per vehicle
pub const VEHICLES_TABLE: &str = "Vehicles";

/// Table holding one row per vehicle photo
pub const VEHICLE_IMAGES_TABLE: &str = "Vehicle Images";

/// Most list pages fetched for one query (Airtable pages hold 100 records)
pub const MAX_PAGES: usize = 50;

/// Field names as they appear in the record store.
pub mod field {
    pub const VEHICLE_ID: &str = "Vehicle ID";
    pub const VIN: &str = "VIN";
    pub const STATUS: &str = "Status";
    pub const CREATED: &str = "Created";
    pub const ORDER: &str = "Order";
}

// ============================================================================
// Photos
// ============================================================================

/// Photo categories in display order.
pub const CANONICAL_CATEGORIES: [&str; 9] = [
    "Front",
    "Rear",
    "Driver Side",
    "Passenger Side",
    "Interior",
    "Dashboard",
    "Tires",
    "Window Sticker",
    "Add-Ons Damage",
];

/// Hosts that photo URLs may point at. Site-relative paths are always allowed.
pub const ALLOWED_IMAGE_HOSTS: [&str; 3] = ["blob.v0.dev", "dl.airtable.com", "airtable.com"];

// ============================================================================
// Server
// ============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

// ============================================================================
// Page text
// ============================================================================

pub const BRAND: &str = "TRADELUX";

/// Address offers are mailed to
pub const OFFER_EMAIL: &str = "Pricing@tradelux.us";

/// Banner shown when the vehicle could not be fetched
pub const DEMO_BANNER: &str = "Using demo data - Airtable connection unavailable";

/// Shown in place of a missing attribute value
pub const MISSING_VALUE: &str = "—";

/// Photo section text when there is nothing to show
pub const NO_PHOTOS: &str = "No photos available for this vehicle";
