//! In-memory record store for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{timestamp_now, RecordError, RecordStore};
use crate::model::{Record, VehicleAttributes, VehicleImageRecord, VehicleRecord, VehicleStatus};

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    vehicles: Mutex<Vec<VehicleRecord>>,
    images: Mutex<Vec<VehicleImageRecord>>,
    failing: AtomicBool,
    next_id: AtomicUsize,
    /// Writes answer `Ok(None)` when set
    silent_writes: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_vehicle(self, record_id: &str, fields: VehicleAttributes) -> Self {
        self.vehicles.lock().unwrap().push(Record {
            id: record_id.to_string(),
            created_time: None,
            fields,
        });
        self
    }

    pub(crate) fn with_image(self, image: VehicleImageRecord) -> Self {
        self.images.lock().unwrap().push(image);
        self
    }

    /// Make every call fail as if the store were unreachable.
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn set_silent_writes(&self, silent: bool) {
        self.silent_writes.store(silent, Ordering::SeqCst);
    }

    pub(crate) fn image_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), RecordError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RecordError::status(503, "store offline"))
        } else {
            Ok(())
        }
    }

    fn silent(&self) -> bool {
        self.silent_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<VehicleRecord>, RecordError> {
        self.check()?;
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.fields.vin.as_deref() == Some(vehicle_id))
            .cloned())
    }

    async fn get_vehicle_images(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<VehicleImageRecord>, RecordError> {
        self.check()?;
        let mut images: Vec<VehicleImageRecord> = self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|image| image.vin.as_deref() == Some(vehicle_id))
            .cloned()
            .collect();
        images.sort_by_key(|image| image.order.unwrap_or(i64::MAX));
        Ok(images)
    }

    async fn list_vehicles(&self, status: VehicleStatus) -> Result<Vec<VehicleRecord>, RecordError> {
        self.check()?;
        let mut vehicles: Vec<VehicleRecord> = self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.fields.status == Some(status))
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| b.fields.created.cmp(&a.fields.created));
        Ok(vehicles)
    }

    async fn create_vehicle(
        &self,
        mut fields: VehicleAttributes,
    ) -> Result<Option<VehicleRecord>, RecordError> {
        self.check()?;
        if self.silent() {
            return Ok(None);
        }
        let now = timestamp_now();
        fields.status = Some(VehicleStatus::Active);
        fields.created = Some(now.clone());
        fields.updated = Some(now);
        let record = Record {
            id: format!("rec{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            created_time: None,
            fields,
        };
        self.vehicles.lock().unwrap().push(record.clone());
        Ok(Some(record))
    }

    async fn update_vehicle(
        &self,
        record_id: &str,
        fields: VehicleAttributes,
    ) -> Result<Option<VehicleRecord>, RecordError> {
        self.check()?;
        if self.silent() {
            return Ok(None);
        }
        let mut vehicles = self.vehicles.lock().unwrap();
        let Some(record) = vehicles.iter_mut().find(|record| record.id == record_id) else {
            return Ok(None);
        };
        let current = &mut record.fields;
        macro_rules! merge {
            ($($name:ident),*) => {
                $(if fields.$name.is_some() { current.$name = fields.$name.clone(); })*
            };
        }
        merge!(
            vehicle_id, year, make, model, trim, vin, mileage, zip_code, exterior_color,
            interior_color, vehicle_condition, tire_condition, add_ons, status, created
        );
        current.updated = Some(timestamp_now());
        Ok(Some(record.clone()))
    }

    async fn add_vehicle_image(
        &self,
        fields: VehicleImageRecord,
    ) -> Result<Option<VehicleImageRecord>, RecordError> {
        self.check()?;
        if self.silent() {
            return Ok(None);
        }
        self.images.lock().unwrap().push(fields.clone());
        Ok(Some(fields))
    }
}
