//! Zoom and pan state machine for the modal image viewer.
//!
//! Every transition is a synchronous reaction to one input event. Zoom moves in
//! fixed steps between [`ZOOM_MIN`] and [`ZOOM_MAX`]; the pan offset is clamped
//! per axis to a bound that grows with the zoom level, so a magnified image can
//! never be dragged far enough to show empty space past its edges.

use serde::Serialize;

use crate::constants::{CONTENT_HEIGHT, CONTENT_WIDTH, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::geometry::{Point, Size};

/// Pan drag interaction state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging; `anchor` is the pointer position minus the pan at drag start
    Dragging { anchor: Point },
}

impl DragState {
    /// Check if currently dragging
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Get the drag anchor if dragging
    pub fn anchor(&self) -> Option<Point> {
        match self {
            DragState::Dragging { anchor } => Some(*anchor),
            DragState::Idle => None,
        }
    }
}

/// Zoom, pan and drag state of the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Zoom level (1.0 = image fits its box)
    pub zoom: f32,
    /// Pan offset in pixels, relative to the centered position
    pub pan: Point,
    /// Drag interaction state for panning
    pub drag: DragState,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: ZOOM_DEFAULT,
            pan: Point::ZERO,
            drag: DragState::Idle,
        }
    }
}

/// Whether an input event was consumed by the viewport.
///
/// `Captured` tells the shell to suppress the platform default (page scroll
/// for wheel events, text selection for drags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Captured,
    Ignored,
}

impl EventStatus {
    pub fn is_captured(self) -> bool {
        self == EventStatus::Captured
    }
}

/// Pointer cursor to show over the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

/// Largest pan offset along one axis for a box dimension at a zoom level.
///
/// `max(0, (dim * zoom - dim) / 2)`: the overflow of the magnified image split
/// evenly between both sides.
pub fn max_drag(dim: f32, zoom: f32) -> f32 {
    ((dim * zoom - dim) / 2.0).max(0.0)
}

/// Zoom/pan controller owning a [`ViewportState`].
#[derive(Debug, Clone)]
pub struct Viewport {
    state: ViewportState,
    content: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(CONTENT_WIDTH, CONTENT_HEIGHT))
    }
}

impl Viewport {
    /// Create a viewport for a reference content box.
    pub fn new(content: Size) -> Self {
        Self {
            state: ViewportState::default(),
            content,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    pub fn pan(&self) -> Point {
        self.state.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.state.drag.is_dragging()
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Change the reference box (e.g. after a resize) and re-clamp the pan.
    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
        self.state.pan = self.clamp_to_bounds(self.state.pan);
    }

    /// Step the zoom up. Returns true if the zoom changed.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.state.zoom + ZOOM_STEP)
    }

    /// Step the zoom down. Returns true if the zoom changed.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.state.zoom - ZOOM_STEP)
    }

    fn set_zoom(&mut self, zoom: f32) -> bool {
        let zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if zoom == self.state.zoom {
            return false;
        }
        self.state.zoom = zoom;
        // Panning is only meaningful while magnified.
        if zoom <= ZOOM_DEFAULT {
            self.state.drag = DragState::Idle;
        }
        self.state.pan = self.clamp_to_bounds(self.state.pan);
        log::debug!("Zoom: {:.1}x, pan ({:.1}, {:.1})", zoom, self.state.pan.x, self.state.pan.y);
        true
    }

    /// Back to zoom 1, centered, not dragging.
    pub fn reset(&mut self) {
        if self.state != ViewportState::default() {
            log::debug!("View reset");
        }
        self.state = ViewportState::default();
    }

    /// Mouse wheel: scrolling up (negative delta) zooms in, down zooms out.
    ///
    /// Always captured so the page underneath does not scroll.
    pub fn wheel(&mut self, delta_y: f32) -> EventStatus {
        if delta_y < 0.0 {
            self.zoom_in();
        } else if delta_y > 0.0 {
            self.zoom_out();
        }
        EventStatus::Captured
    }

    /// Pointer pressed on the image. Only starts a drag while magnified.
    pub fn drag_start(&mut self, pointer: Point) -> EventStatus {
        if self.state.zoom <= ZOOM_DEFAULT {
            return EventStatus::Ignored;
        }
        let anchor = pointer - self.state.pan;
        self.state.drag = DragState::Dragging { anchor };
        log::debug!("Pan drag started at ({:.1}, {:.1})", pointer.x, pointer.y);
        EventStatus::Captured
    }

    /// Pointer moved. Pans to `pointer - anchor`, clamped to the current bounds.
    pub fn drag_move(&mut self, pointer: Point) -> EventStatus {
        let Some(anchor) = self.state.drag.anchor() else {
            return EventStatus::Ignored;
        };
        // Bounds are recomputed on every move since zoom may have changed mid-drag.
        self.state.pan = self.clamp_to_bounds(pointer - anchor);
        EventStatus::Captured
    }

    /// Pointer released or left the surface. The pan stays where it is.
    pub fn drag_end(&mut self) -> EventStatus {
        if !self.state.drag.is_dragging() {
            return EventStatus::Ignored;
        }
        self.state.drag = DragState::Idle;
        log::debug!("Pan drag ended");
        EventStatus::Captured
    }

    /// Maximum absolute pan per axis at the current zoom.
    pub fn pan_bounds(&self) -> Point {
        Point::new(
            max_drag(self.content.width, self.state.zoom),
            max_drag(self.content.height, self.state.zoom),
        )
    }

    fn clamp_to_bounds(&self, pan: Point) -> Point {
        let bounds = self.pan_bounds();
        Point::new(
            pan.x.clamp(-bounds.x, bounds.x),
            pan.y.clamp(-bounds.y, bounds.y),
        )
    }

    pub fn can_zoom_in(&self) -> bool {
        self.state.zoom < ZOOM_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.state.zoom > ZOOM_MIN
    }

    /// Zoom level as a whole percentage for the zoom indicator.
    pub fn zoom_percent(&self) -> u32 {
        (self.state.zoom * 100.0).round() as u32
    }

    pub fn cursor(&self) -> Cursor {
        if self.state.zoom <= ZOOM_DEFAULT {
            Cursor::Default
        } else if self.is_dragging() {
            Cursor::Grabbing
        } else {
            Cursor::Grab
        }
    }

    /// CSS transform for the image element.
    ///
    /// The translate is applied after the scale, so the pan is divided by the
    /// zoom to move by screen pixels.
    pub fn css_transform(&self) -> String {
        let zoom = self.state.zoom;
        format!(
            "scale({}) translate({}px, {}px)",
            zoom,
            self.state.pan.x / zoom,
            self.state.pan.y / zoom
        )
    }
}
