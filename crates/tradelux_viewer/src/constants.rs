//! Centralized constants for tradelux_viewer
//!
//! Zoom steps, gesture thresholds and layout defaults live here so the
//! viewport, gesture and gallery modules agree on the same numbers.

// =============================================================================
// Zoom
// =============================================================================

/// Smallest allowed zoom level
pub const ZOOM_MIN: f32 = 0.5;

/// Largest allowed zoom level
pub const ZOOM_MAX: f32 = 3.0;

/// Increment applied by one zoom-in / zoom-out step
pub const ZOOM_STEP: f32 = 0.5;

/// Zoom level after a reset (image fits its box)
pub const ZOOM_DEFAULT: f32 = 1.0;

// =============================================================================
// Content box
// =============================================================================

/// Reference width of the modal image box, used for pan bounds
pub const CONTENT_WIDTH: f32 = 800.0;

/// Reference height of the modal image box, used for pan bounds
pub const CONTENT_HEIGHT: f32 = 600.0;

// =============================================================================
// Gestures & layout
// =============================================================================

/// Minimum horizontal travel (device-independent pixels) for a swipe
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Viewport widths below this use the swipe carousel instead of the grid
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Directory holding the per-category placeholder images
pub const PLACEHOLDER_DIR: &str = "/images/placeholders";
