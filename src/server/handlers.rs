//! Route handlers.
//!
//! Store failures are logged and answered with a generic 500; the detail
//! stays in the log.

use serde::Deserialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Rejection;

use super::response::{error_reply, json_reply, VehicleBody};
use super::ServerState;
use crate::app::VehicleViewer;
use crate::loader::{vehicle_payload, StoreSource};
use crate::model::{VehicleAttributes, VehicleImageRecord, VehicleStatus};

const INTERNAL_ERROR: &str = "Internal server error";

/// `?status=` on the vehicle list. Defaults to active listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: VehicleStatus,
}

/// GET /vehicles/{id}
pub async fn get_vehicle(vehicle_id: String, state: ServerState) -> Result<Response, Rejection> {
    if vehicle_id.trim().is_empty() {
        return Ok(error_reply("Vehicle ID is required", StatusCode::BAD_REQUEST));
    }
    log::info!("Fetching vehicle {}", vehicle_id);

    match vehicle_payload(state.store.as_ref(), &state.policy, &vehicle_id).await {
        Ok(Some(payload)) => Ok(json_reply(&payload, StatusCode::OK)),
        Ok(None) => {
            log::info!("Vehicle {} not found", vehicle_id);
            Ok(error_reply("Vehicle not found", StatusCode::NOT_FOUND))
        }
        Err(e) => {
            log::error!("Failed to fetch vehicle {}: {}", vehicle_id, e);
            Ok(error_reply(INTERNAL_ERROR, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// GET /vehicles
pub async fn list_vehicles(query: ListQuery, state: ServerState) -> Result<Response, Rejection> {
    match state.store.list_vehicles(query.status).await {
        Ok(records) => {
            let vehicles: Vec<VehicleBody<'_>> = records.iter().map(VehicleBody::from).collect();
            Ok(json_reply(
                &serde_json::json!({ "vehicles": vehicles }),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            log::error!("Failed to list {} vehicles: {}", query.status, e);
            Ok(error_reply(INTERNAL_ERROR, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// POST /vehicles
pub async fn create_vehicle(
    fields: VehicleAttributes,
    state: ServerState,
) -> Result<Response, Rejection> {
    match state.store.create_vehicle(fields).await {
        Ok(Some(record)) => {
            log::info!("Created vehicle record {}", record.id);
            Ok(json_reply(
                &serde_json::json!({ "vehicle": VehicleBody::from(&record) }),
                StatusCode::CREATED,
            ))
        }
        Ok(None) => Ok(error_reply(
            "Failed to create vehicle",
            StatusCode::INTERNAL_SERVER_ERROR,
        )),
        Err(e) => {
            log::error!("Failed to create vehicle: {}", e);
            Ok(error_reply(INTERNAL_ERROR, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// PATCH /vehicles/{record_id}
pub async fn update_vehicle(
    record_id: String,
    fields: VehicleAttributes,
    state: ServerState,
) -> Result<Response, Rejection> {
    match state.store.update_vehicle(&record_id, fields).await {
        Ok(Some(record)) => {
            log::info!("Updated vehicle record {}", record.id);
            Ok(json_reply(
                &serde_json::json!({ "vehicle": VehicleBody::from(&record) }),
                StatusCode::OK,
            ))
        }
        Ok(None) => Ok(error_reply("Vehicle not found", StatusCode::NOT_FOUND)),
        Err(e) => {
            log::error!("Failed to update vehicle record {}: {}", record_id, e);
            Ok(error_reply(INTERNAL_ERROR, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// POST /vehicles/{id}/images
///
/// The path id is written to the row's VIN, the column photos are looked
/// up by. A blank "Vehicle ID" in the body falls back to it as well.
pub async fn add_vehicle_image(
    vehicle_id: String,
    mut image: VehicleImageRecord,
    state: ServerState,
) -> Result<Response, Rejection> {
    if vehicle_id.trim().is_empty() {
        return Ok(error_reply("Vehicle ID is required", StatusCode::BAD_REQUEST));
    }
    if image.vehicle_id.trim().is_empty() {
        image.vehicle_id = vehicle_id.clone();
    }
    image.vin = Some(vehicle_id);
    match state.store.add_vehicle_image(image).await {
        Ok(Some(image)) => {
            log::info!(
                "Added {} image for vehicle {}",
                image.image_type,
                image.vehicle_id
            );
            Ok(json_reply(
                &serde_json::json!({ "image": image }),
                StatusCode::CREATED,
            ))
        }
        Ok(None) => Ok(error_reply(
            "Failed to add vehicle image",
            StatusCode::INTERNAL_SERVER_ERROR,
        )),
        Err(e) => {
            log::error!("Failed to add vehicle image: {}", e);
            Ok(error_reply(INTERNAL_ERROR, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// GET /pages/vehicles/{id}
///
/// The rendered page model. Always 200: a missing or unreachable vehicle
/// renders the demo page with a notice.
pub async fn vehicle_page(vehicle_id: String, state: ServerState) -> Result<Response, Rejection> {
    let source = StoreSource::new(state.store.clone(), state.policy.clone());
    let mut viewer = VehicleViewer::new(source, vehicle_id, state.viewer.clone());
    viewer.refresh().await;
    Ok(json_reply(&viewer.view(), StatusCode::OK))
}
