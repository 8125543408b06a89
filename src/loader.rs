//! Vehicle data loading.
//!
//! A [`VehicleSource`] produces the vehicle payload for an id: either over
//! HTTP from the vehicle routes ([`ApiClient`]) or straight from a record store
//! ([`StoreSource`]). [`VehicleLoader`] turns those results into loading and
//! error state. Failures never escape the loader; they become state, and the
//! previous payload is kept.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::demo::demo_vehicle;
use crate::model::{group_images, ImageGroups, ImageHostPolicy, VehicleAttributes};
use crate::record::{RecordError, RecordStore};

/// Why a load did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// No vehicle id to load
    #[error("Vehicle ID is required")]
    MissingId,

    /// The store has no vehicle with this id
    #[error("Vehicle {0} not found")]
    NotFound(String),

    /// The request failed or the store is unreachable
    #[error("Vehicle data unavailable: {0}")]
    BackendUnavailable(String),
}

/// A vehicle and its grouped photos, as served by `GET /vehicles/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePayload {
    pub vehicle: VehicleAttributes,
    #[serde(default)]
    pub images: ImageGroups,
}

/// Fetch a vehicle and group its photos. `Ok(None)` if there is no such vehicle.
pub async fn vehicle_payload(
    store: &dyn RecordStore,
    policy: &ImageHostPolicy,
    vehicle_id: &str,
) -> Result<Option<VehiclePayload>, RecordError> {
    let Some(record) = store.get_vehicle(vehicle_id).await? else {
        return Ok(None);
    };
    let images = store.get_vehicle_images(vehicle_id).await?;
    Ok(Some(VehiclePayload {
        vehicle: record.fields,
        images: group_images(&images, policy),
    }))
}

/// Something that can produce a vehicle payload.
#[async_trait]
pub trait VehicleSource: Send + Sync {
    async fn fetch_vehicle(&self, vehicle_id: &str) -> Result<VehiclePayload, LoadError>;
}

/// Loads from the vehicle routes over HTTP.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, RecordError> {
        let base_url = Url::parse(base_url).map_err(|_| RecordError::invalid_url(base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(RecordError::invalid_url(base_url.as_str()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    fn vehicle_url(&self, vehicle_id: &str) -> Result<Url, LoadError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LoadError::BackendUnavailable(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .push("vehicles")
            .push(vehicle_id);
        Ok(url)
    }
}

#[async_trait]
impl VehicleSource for ApiClient {
    async fn fetch_vehicle(&self, vehicle_id: &str) -> Result<VehiclePayload, LoadError> {
        let url = self.vehicle_url(vehicle_id)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::BackendUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<VehiclePayload>()
                .await
                .map_err(|e| LoadError::BackendUnavailable(e.to_string())),
            StatusCode::NOT_FOUND => Err(LoadError::NotFound(vehicle_id.to_string())),
            StatusCode::BAD_REQUEST => Err(LoadError::MissingId),
            status => Err(LoadError::BackendUnavailable(format!(
                "HTTP error! status: {}",
                status.as_u16()
            ))),
        }
    }
}

/// Loads directly from a record store.
#[derive(Clone)]
pub struct StoreSource {
    store: Arc<dyn RecordStore>,
    policy: ImageHostPolicy,
}

impl StoreSource {
    pub fn new(store: Arc<dyn RecordStore>, policy: ImageHostPolicy) -> Self {
        Self { store, policy }
    }
}

#[async_trait]
impl VehicleSource for StoreSource {
    async fn fetch_vehicle(&self, vehicle_id: &str) -> Result<VehiclePayload, LoadError> {
        match vehicle_payload(self.store.as_ref(), &self.policy, vehicle_id).await {
            Ok(Some(payload)) => Ok(payload),
            Ok(None) => Err(LoadError::NotFound(vehicle_id.to_string())),
            Err(e) => Err(LoadError::BackendUnavailable(e.to_string())),
        }
    }
}

/// Loading/error state around a [`VehicleSource`].
///
/// Every successful fetch replaces the payload wholesale. A failed fetch sets
/// the error and keeps whatever payload was there. Fetches resolve in the
/// order they complete, and the last one to resolve wins.
pub struct VehicleLoader<S> {
    source: S,
    vehicle_id: String,
    payload: Option<VehiclePayload>,
    loading: bool,
    error: Option<LoadError>,
}

impl<S: VehicleSource> VehicleLoader<S> {
    /// A loader that has not fetched yet. It reports loading until the first
    /// fetch resolves.
    pub fn new(source: S, vehicle_id: impl Into<String>) -> Self {
        Self {
            source,
            vehicle_id: vehicle_id.into(),
            payload: None,
            loading: true,
            error: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Switch to another vehicle. Drops the payload of the previous one.
    pub fn set_vehicle_id(&mut self, vehicle_id: impl Into<String>) {
        let vehicle_id = vehicle_id.into();
        if vehicle_id != self.vehicle_id {
            self.vehicle_id = vehicle_id;
            self.payload = None;
            self.error = None;
            self.loading = true;
        }
    }

    pub fn payload(&self) -> Option<&VehiclePayload> {
        self.payload.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// True when there is no real vehicle to show and the demo is used instead.
    pub fn is_fallback(&self) -> bool {
        self.payload.is_none()
    }

    /// The fetched vehicle, or the demo vehicle if nothing was fetched.
    pub fn displayed_vehicle(&self) -> Cow<'_, VehicleAttributes> {
        match &self.payload {
            Some(payload) => Cow::Borrowed(&payload.vehicle),
            None => Cow::Owned(demo_vehicle()),
        }
    }

    /// Mark a fetch as in flight.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a fetch result. Returns true if the payload was replaced.
    pub fn resolve(&mut self, result: Result<VehiclePayload, LoadError>) -> bool {
        self.loading = false;
        match result {
            Ok(payload) => {
                log::info!(
                    "Loaded vehicle {} with {} photos",
                    self.vehicle_id,
                    payload.images.image_count()
                );
                self.payload = Some(payload);
                self.error = None;
                true
            }
            Err(e) => {
                log::warn!("Failed to load vehicle {:?}: {}", self.vehicle_id, e);
                self.error = Some(e);
                false
            }
        }
    }

    /// Fetch the current vehicle. Returns true if the payload was replaced.
    pub async fn fetch(&mut self) -> bool {
        if self.vehicle_id.trim().is_empty() {
            return self.resolve(Err(LoadError::MissingId));
        }
        self.begin();
        let started = Instant::now();
        let result = self.source.fetch_vehicle(&self.vehicle_id).await;
        log::debug!("Fetch for {} took {:?}", self.vehicle_id, started.elapsed());
        self.resolve(result)
    }

    /// Fetch again with the same id.
    pub async fn refetch(&mut self) -> bool {
        self.fetch().await
    }
}
