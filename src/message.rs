//! Viewer message types.
//!
//! Every page event is a message in the Elm architecture style. Nested enums
//! group messages by the part of the page they come from.

use tradelux_viewer::{Key, PointerEvent, TouchEvent};

use crate::loader::{LoadError, VehiclePayload};

/// Messages that can be sent to update viewer state.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Photo grid and carousel events
    Gallery(GalleryMessage),
    /// Lightbox controls and keyboard
    Modal(ModalMessage),
    /// Mouse over the lightbox image
    Pointer(PointerEvent),
    /// Touch on the carousel or the lightbox
    Touch(TouchSurface, TouchEvent),
    /// Browser window events
    Window(WindowMessage),
    /// Data loading results
    Data(DataMessage),
}

/// Photo grid and carousel messages.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryMessage {
    /// A grid thumbnail was clicked
    ThumbnailClicked(String),
    /// A carousel dot was clicked
    CarouselDot(usize),
    /// An image failed to load
    ImageFailed(String),
}

/// Lightbox messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalMessage {
    /// Key pressed while the page has focus
    Key(Key),
    /// Close button or backdrop clicked
    Close,
    /// Previous arrow clicked
    Previous,
    /// Next arrow clicked
    Next,
    /// Zoom in button
    ZoomIn,
    /// Zoom out button
    ZoomOut,
    /// Reset zoom button
    ResetZoom,
}

/// Where a touch sequence happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSurface {
    /// The mobile carousel
    Carousel,
    /// The lightbox image
    Modal,
}

/// Window messages.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMessage {
    /// Viewport width changed
    Resized { width: f32 },
}

/// Data loading messages.
#[derive(Debug, Clone, PartialEq)]
pub enum DataMessage {
    /// A fetch resolved
    Loaded(Result<VehiclePayload, LoadError>),
}
