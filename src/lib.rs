//! TRADELUX - vehicle listings with a zoomable photo gallery
//!
//! The crate holds the server side of the vehicle page: record store access,
//! the HTTP routes, the data loader, and the headless page model built on the
//! interaction core in `tradelux_viewer`.

pub mod app;
pub mod config;
pub mod constants;
pub mod demo;
pub mod handlers;
pub mod loader;
pub mod message;
pub mod model;
pub mod record;
pub mod server;
pub mod view;

pub use app::VehicleViewer;
pub use config::AppConfig;
pub use loader::{ApiClient, LoadError, StoreSource, VehicleLoader, VehiclePayload, VehicleSource};
pub use record::{AirtableClient, RecordError, RecordStore};
pub use view::PageView;
