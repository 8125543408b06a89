//! Vehicle photos: image rows, the category grouping, and host filtering.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tradelux_viewer::{category_id, PhotoCategory};

use crate::constants::{ALLOWED_IMAGE_HOSTS, CANONICAL_CATEGORIES};

/// One row of the photo table.
///
/// Rows are joined to their vehicle through `vin`; `vehicle_id` is the
/// listing's own label and is informational.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleImageRecord {
    #[serde(rename = "VIN", skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(rename = "Vehicle ID")]
    pub vehicle_id: String,
    /// Category label, e.g. "Driver Side"
    #[serde(rename = "Image Type")]
    pub image_type: String,
    #[serde(rename = "Image URL")]
    pub image_url: String,
    #[serde(rename = "Alt Text", skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(rename = "Order", skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Photo URLs grouped by category label, in display order.
///
/// The canonical categories are always present, in their fixed order, even
/// when empty. Any other label follows in first-appearance order. Serializes
/// as a JSON object whose key order matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl Default for ImageGroups {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ImageGroups {
    /// Every canonical category, all empty.
    pub fn canonical() -> Self {
        Self {
            groups: CANONICAL_CATEGORIES
                .iter()
                .map(|label| (label.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Append a URL to a category, creating the category if it is new.
    pub fn push(&mut self, label: &str, url: String) {
        self.extend(label, std::iter::once(url));
    }

    fn extend(&mut self, label: &str, urls: impl IntoIterator<Item = String>) {
        match self.groups.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, list)) => list.extend(urls),
            None => self.groups.push((label.to_string(), urls.into_iter().collect())),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, urls)| urls.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(label, urls)| (label.as_str(), urls.as_slice()))
    }

    /// Number of categories, including empty ones.
    pub fn category_count(&self) -> usize {
        self.groups.len()
    }

    pub fn image_count(&self) -> usize {
        self.groups.iter().map(|(_, urls)| urls.len()).sum()
    }

    /// True if no category holds an image.
    pub fn is_empty(&self) -> bool {
        self.image_count() == 0
    }

    /// Category data for the gallery.
    pub fn to_categories(&self) -> Vec<PhotoCategory> {
        self.groups
            .iter()
            .map(|(label, urls)| PhotoCategory::new(label.clone(), urls.clone()))
            .collect()
    }
}

impl Serialize for ImageGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (label, urls) in &self.groups {
            map.serialize_entry(label, urls)?;
        }
        map.end()
    }
}

struct ImageGroupsVisitor;

impl<'de> Visitor<'de> for ImageGroupsVisitor {
    type Value = ImageGroups;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category label to image URLs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups = ImageGroups::canonical();
        while let Some((label, urls)) = access.next_entry::<String, Vec<String>>()? {
            groups.extend(&label, urls);
        }
        Ok(groups)
    }
}

impl<'de> Deserialize<'de> for ImageGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ImageGroupsVisitor)
    }
}

/// Which hosts photo URLs may be served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostPolicy {
    hosts: Vec<String>,
}

impl Default for ImageHostPolicy {
    fn default() -> Self {
        Self::new(ALLOWED_IMAGE_HOSTS)
    }
}

impl ImageHostPolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Site-relative paths are always allowed; absolute URLs must be https on
    /// an allowed host.
    pub fn allows(&self, url: &str) -> bool {
        if url.starts_with('/') && !url.starts_with("//") {
            return true;
        }
        match reqwest::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "https" => parsed
                .host_str()
                .is_some_and(|host| self.hosts.iter().any(|allowed| allowed.eq_ignore_ascii_case(host))),
            _ => false,
        }
    }
}

/// Group image rows by category, ordered by their `Order` field.
///
/// Rows without a URL or category, and URLs on hosts the policy rejects, are
/// dropped. Rows without an order sort after ordered ones, keeping their
/// relative position.
pub fn group_images(records: &[VehicleImageRecord], policy: &ImageHostPolicy) -> ImageGroups {
    let mut sorted: Vec<&VehicleImageRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.order.unwrap_or(i64::MAX));

    let mut groups = ImageGroups::canonical();
    for record in sorted {
        let url = record.image_url.trim();
        let label = record.image_type.trim();
        if url.is_empty() || label.is_empty() {
            log::warn!("Skipping incomplete image row for vehicle {}", record.vehicle_id);
            continue;
        }
        if !policy.allows(url) {
            log::warn!("Skipping image on disallowed host: {}", url);
            continue;
        }
        groups.push(label, url.to_string());
    }
    groups
}

/// Placeholder image path for a category.
pub fn placeholder_path(dir: &str, label: &str) -> String {
    let stem = match label {
        "Add-Ons Damage" => "damage".to_string(),
        other => category_id(other),
    };
    format!("{}/{}-placeholder.png", dir.trim_end_matches('/'), stem)
}
