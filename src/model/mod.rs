//! Data models for vehicles and their photos.

mod images;
mod vehicle;

pub use images::{group_images, placeholder_path, ImageGroups, ImageHostPolicy, VehicleImageRecord};
pub use vehicle::{Record, VehicleAttributes, VehicleRecord, VehicleStatus};
