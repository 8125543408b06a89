//! HTTP routes over a record store.
//!
//! ```text
//! GET   /vehicles[?status=Active|Sold|Pending]
//! POST  /vehicles
//! GET   /vehicles/{id}
//! PATCH /vehicles/{record_id}
//! POST  /vehicles/{id}/images
//! GET   /pages/vehicles/{id}
//! ```

mod handlers;
mod response;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use tradelux_viewer::ViewerConfig;

use crate::model::ImageHostPolicy;
use crate::record::RecordStore;

pub use handlers::ListQuery;
pub use response::{error_reply, json_reply, VehicleBody};

/// Largest accepted JSON body.
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn RecordStore>,
    pub policy: ImageHostPolicy,
    pub viewer: ViewerConfig,
}

impl ServerState {
    pub fn new(store: Arc<dyn RecordStore>, policy: ImageHostPolicy, viewer: ViewerConfig) -> Self {
        Self {
            store,
            policy,
            viewer,
        }
    }
}

fn with_state(
    state: ServerState,
) -> impl Filter<Extract = (ServerState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// A path segment that does not decode to UTF-8.
#[derive(Debug)]
struct InvalidPathSegment;

impl warp::reject::Reject for InvalidPathSegment {}

/// warp hands `String` path params over still percent-encoded.
async fn decode_segment(raw: String) -> Result<String, Rejection> {
    percent_decode_str(&raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| warp::reject::custom(InvalidPathSegment))
}

/// All routes, with rejections turned into JSON errors.
pub fn routes(state: ServerState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let list = warp::path!("vehicles")
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::list_vehicles);

    let create = warp::path!("vehicles")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::create_vehicle);

    let get = warp::path!("vehicles" / String)
        .and_then(decode_segment)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::get_vehicle);

    let update = warp::path!("vehicles" / String)
        .and_then(decode_segment)
        .and(warp::patch())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::update_vehicle);

    let add_image = warp::path!("vehicles" / String / "images")
        .and_then(decode_segment)
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::add_vehicle_image);

    let page = warp::path!("pages" / "vehicles" / String)
        .and_then(decode_segment)
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::vehicle_page);

    list.or(create)
        .or(get)
        .or(update)
        .or(add_image)
        .or(page)
        .recover(handle_rejection)
        .with(warp::log("tradelux::server"))
}

/// Map rejections to `{ "error": ... }` replies.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (message, status) = if err.is_not_found() {
        ("Not found", StatusCode::NOT_FOUND)
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        ("Invalid request body", StatusCode::BAD_REQUEST)
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        ("Invalid query", StatusCode::BAD_REQUEST)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        ("Request body too large", StatusCode::PAYLOAD_TOO_LARGE)
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        ("Expected a JSON body", StatusCode::UNSUPPORTED_MEDIA_TYPE)
    } else if err.find::<InvalidPathSegment>().is_some() {
        ("Invalid path segment", StatusCode::BAD_REQUEST)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ("Method not allowed", StatusCode::METHOD_NOT_ALLOWED)
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        ("Internal server error", StatusCode::INTERNAL_SERVER_ERROR)
    };
    Ok(error_reply(message, status))
}

/// Serve until Ctrl-C.
pub async fn serve(state: ServerState, addr: SocketAddr) -> Result<(), warp::Error> {
    let (bound, server) = warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
        }
    })?;
    log::info!("Listening on http://{}", bound);
    server.await;
    log::info!("Server stopped");
    Ok(())
}
