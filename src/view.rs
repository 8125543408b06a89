//! Headless page model.
//!
//! Everything the vehicle page shows, computed from viewer state. A shell
//! (server-side template, client renderer) turns this into markup; tests
//! assert on it directly.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tradelux_viewer::{CategorySection, Cursor, LayoutMode, SectionContent};

use crate::app::VehicleViewer;
use crate::constants::{BRAND, DEMO_BANNER, MISSING_VALUE, NO_PHOTOS, OFFER_EMAIL};
use crate::loader::{LoadError, VehicleSource};
use crate::model::{placeholder_path, VehicleAttributes};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub title: String,
    pub description: String,
    /// True until the first fetch resolves
    pub loading: bool,
    /// Banner above the page, only when showing demo data
    pub notice: Option<String>,
    pub heading: String,
    pub specs: Vec<SpecRow>,
    pub layout: LayoutMode,
    pub photos: PhotoSection,
    pub modal: Option<ModalView>,
    pub offer: OfferLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecRow {
    pub label: &'static str,
    pub value: String,
}

/// One image tile. `url` is absent for non-navigable placeholder tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub src: String,
    pub url: Option<String>,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSection {
    pub id: String,
    pub label: String,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PhotoSection {
    Empty { message: String },
    Grid { sections: Vec<GridSection> },
    Carousel { slides: Vec<Tile>, index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalView {
    pub src: String,
    pub alt: String,
    pub label: String,
    /// "3 / 12"
    pub position: String,
    pub zoom_percent: u32,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub cursor: Cursor,
    pub transform: String,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferLink {
    pub email: &'static str,
    pub href: String,
}

pub fn render_page<S: VehicleSource>(viewer: &VehicleViewer<S>) -> PageView {
    let loader = viewer.loader();
    let vehicle_id = loader.vehicle_id();
    let vehicle = loader.displayed_vehicle();
    let title = vehicle.title();

    let notice = if loader.is_fallback() {
        loader.error().map(notice_for)
    } else {
        None
    };

    PageView {
        title: format!("{} - Vehicle {}", BRAND, vehicle_id),
        description: format!(
            "View detailed information and photos for vehicle {} on {} private network.",
            vehicle_id, BRAND
        ),
        loading: loader.is_loading() && loader.payload().is_none(),
        notice,
        heading: title.clone(),
        specs: spec_rows(&vehicle),
        layout: viewer.layout(),
        photos: photo_section(viewer, &title),
        modal: modal_view(viewer, &title),
        offer: offer_link(&vehicle),
    }
}

fn notice_for(error: &LoadError) -> String {
    match error {
        LoadError::NotFound(id) => format!("Vehicle {} not found - showing demo data", id),
        LoadError::MissingId => "No vehicle selected - showing demo data".to_string(),
        LoadError::BackendUnavailable(_) => DEMO_BANNER.to_string(),
    }
}

fn text(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => MISSING_VALUE.to_string(),
    }
}

/// The specifications grid, always in the same order.
pub fn spec_rows(vehicle: &VehicleAttributes) -> Vec<SpecRow> {
    let row = |label, value| SpecRow { label, value };
    vec![
        row("Year", vehicle.year.map_or_else(|| MISSING_VALUE.to_string(), |y| y.to_string())),
        row("Make", text(vehicle.make.as_deref())),
        row("Model", text(vehicle.model.as_deref())),
        row("VIN", text(vehicle.vin.as_deref())),
        row(
            "Mileage",
            vehicle
                .mileage
                .map_or_else(|| MISSING_VALUE.to_string(), format_thousands),
        ),
        row("Zip Code", text(vehicle.zip_code.as_deref())),
        row("Exterior Color", text(vehicle.exterior_color.as_deref())),
        row("Interior Color", text(vehicle.interior_color.as_deref())),
        row("Vehicle Condition", text(vehicle.vehicle_condition.as_deref())),
        row("Tire Condition", text(vehicle.tire_condition.as_deref())),
        row("Add-ons", text(vehicle.add_ons.as_deref())),
    ]
}

/// `10420` -> `"10,420"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn image_src<S: VehicleSource>(viewer: &VehicleViewer<S>, url: &str, label: &str) -> String {
    if viewer.is_image_failed(url) {
        placeholder_path(&viewer.config().placeholder_dir, label)
    } else {
        url.to_string()
    }
}

fn image_tile<S: VehicleSource>(
    viewer: &VehicleViewer<S>,
    url: &str,
    label: &str,
    title: &str,
) -> Tile {
    Tile {
        src: image_src(viewer, url, label),
        url: Some(url.to_string()),
        alt: format!("{} - {}", title, label),
    }
}

fn grid_section<S: VehicleSource>(
    viewer: &VehicleViewer<S>,
    section: CategorySection,
    title: &str,
) -> GridSection {
    let tiles = match &section.content {
        SectionContent::Images(urls) => urls
            .iter()
            .map(|url| image_tile(viewer, url, &section.label, title))
            .collect(),
        SectionContent::Placeholder => vec![Tile {
            src: placeholder_path(&viewer.config().placeholder_dir, &section.label),
            url: None,
            alt: format!("{} - {}", title, section.label),
        }],
    };
    GridSection {
        id: section.id,
        label: section.label,
        tiles,
    }
}

fn photo_section<S: VehicleSource>(viewer: &VehicleViewer<S>, title: &str) -> PhotoSection {
    let gallery = viewer.gallery();
    if gallery.is_empty() {
        return PhotoSection::Empty {
            message: NO_PHOTOS.to_string(),
        };
    }
    match viewer.layout() {
        LayoutMode::Grid => PhotoSection::Grid {
            sections: gallery
                .sections(viewer.config().empty_category_policy())
                .into_iter()
                .map(|section| grid_section(viewer, section, title))
                .collect(),
        },
        LayoutMode::Carousel => PhotoSection::Carousel {
            slides: gallery
                .sequence()
                .iter()
                .map(|image| image_tile(viewer, &image.url, &image.category_label, title))
                .collect(),
            index: viewer.carousel().index(),
        },
    }
}

fn modal_view<S: VehicleSource>(viewer: &VehicleViewer<S>, title: &str) -> Option<ModalView> {
    let lightbox = viewer.lightbox();
    let sequence = viewer.gallery().sequence();
    let index = lightbox.selection()?;
    let image = lightbox.current(sequence)?;
    let viewport = lightbox.viewport();
    Some(ModalView {
        src: image_src(viewer, &image.url, &image.category_label),
        alt: format!("{} - {}", title, image.category_label),
        label: image.category_label.clone(),
        position: format!("{} / {}", index + 1, sequence.len()),
        zoom_percent: viewport.zoom_percent(),
        can_zoom_in: viewport.can_zoom_in(),
        can_zoom_out: viewport.can_zoom_out(),
        cursor: viewport.cursor(),
        transform: viewport.css_transform(),
        has_previous: index > 0,
        has_next: index + 1 < sequence.len(),
    })
}

/// Prefilled offer e-mail for the displayed vehicle.
pub fn offer_link(vehicle: &VehicleAttributes) -> OfferLink {
    let title = vehicle.title();
    let subject = format!("Vehicle Offer - {}", title);
    let body = format!(
        "Hello {brand},\r\n\r\n\
         I am interested in submitting an offer for the {title} (VIN: {vin}).\r\n\r\n\
         My offer details:\r\n\
         - Offer Amount: $\r\n\
         - Financing: \r\n\
         - Additional Comments: \r\n\r\n\
         Please let me know if you need any additional information.\r\n\r\n\
         Thank you,\r\n\
         [Your Name]",
        brand = BRAND,
        title = title,
        vin = text(vehicle.vin.as_deref()),
    );
    OfferLink {
        email: OFFER_EMAIL,
        href: format!(
            "mailto:{}?subject={}&body={}",
            OFFER_EMAIL,
            escape_component(&subject),
            escape_component(&body)
        ),
    }
}

/// Everything but RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn escape_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
