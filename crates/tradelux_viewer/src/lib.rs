//! tradelux_viewer - photo gallery and zoom/pan state machine
//!
//! This crate holds the interactive core of the TRADELUX vehicle photo viewer:
//! the flattened image sequence, the lightbox selection, the zoom/pan viewport,
//! and the translation of keyboard, pointer and touch input into transitions.
//! It performs no I/O; every transition is a synchronous `&mut self` call.

pub mod config;
pub mod constants;
mod event;
pub mod gallery;
mod geometry;
pub mod gesture;
pub mod keybindings;
pub mod layout;
pub mod lightbox;
pub mod listener;
pub mod viewport;

pub use config::ViewerConfig;
pub use event::{Key, PointerEvent, TouchEvent};
pub use gallery::{
    build_sequence, category_id, display_sections, navigate, select_by_url, CategorySection,
    EmptyCategoryPolicy, FlatImage, Gallery, PhotoCategory, SectionContent,
};
pub use geometry::{Point, Size};
pub use gesture::{classify_swipe, Gesture, SwipeDirection, SwipeTracker};
pub use keybindings::{KeyBindings, ModalAction};
pub use layout::{Carousel, LayoutMode};
pub use lightbox::{Lightbox, Reconcile};
pub use listener::{ListenerRegistry, ModalScope};
pub use viewport::{Cursor, DragState, EventStatus, Viewport, ViewportState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::event::{Key, PointerEvent, TouchEvent};
    pub use crate::gallery::{FlatImage, Gallery, PhotoCategory};
    pub use crate::geometry::{Point, Size};
    pub use crate::lightbox::Lightbox;
    pub use crate::viewport::Viewport;
}
