//! JSON response bodies.

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use crate::model::{VehicleAttributes, VehicleRecord};

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// A vehicle row as returned by the routes: its record id next to the fields,
/// so a client can PATCH it later.
#[derive(Debug, Serialize)]
pub struct VehicleBody<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub fields: &'a VehicleAttributes,
}

impl<'a> From<&'a VehicleRecord> for VehicleBody<'a> {
    fn from(record: &'a VehicleRecord) -> Self {
        Self {
            id: &record.id,
            fields: &record.fields,
        }
    }
}

pub fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

/// `{ "error": message }` with the given status.
pub fn error_reply(message: &str, status: StatusCode) -> Response {
    json_reply(&ErrorBody { error: message }, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_vehicle_body_flattens_fields() {
        let record = Record {
            id: "rec1".to_string(),
            created_time: None,
            fields: VehicleAttributes {
                make: Some("Porsche".into()),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(VehicleBody::from(&record)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "rec1", "Make": "Porsche" }));
    }

    #[test]
    fn test_error_reply_status() {
        let response = error_reply("Vehicle not found", StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
