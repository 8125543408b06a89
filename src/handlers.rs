//! Message handlers for the vehicle viewer.
//!
//! Each handler processes one category of messages, keeping
//! `VehicleViewer::update` a plain dispatch.

use std::collections::HashSet;

use tradelux_viewer::{
    Carousel, EventStatus, Gallery, Gesture, KeyBindings, LayoutMode, Lightbox, ModalAction,
    PointerEvent, SwipeTracker, TouchEvent,
};

use crate::message::{GalleryMessage, ModalMessage, TouchSurface, WindowMessage};

/// Handle photo grid and carousel messages.
pub fn handle_gallery(
    msg: GalleryMessage,
    gallery: &Gallery,
    lightbox: &mut Lightbox,
    carousel: &mut Carousel,
    failed_images: &mut HashSet<String>,
) -> EventStatus {
    match msg {
        GalleryMessage::ThumbnailClicked(url) => {
            if lightbox.open_url(gallery.sequence(), &url) {
                EventStatus::Captured
            } else {
                EventStatus::Ignored
            }
        }
        GalleryMessage::CarouselDot(index) => {
            let target = isize::try_from(index).unwrap_or(isize::MAX);
            if carousel.go_to(gallery.sequence(), target) {
                log::debug!("Carousel dot {}", index);
            }
            EventStatus::Captured
        }
        GalleryMessage::ImageFailed(url) => {
            if failed_images.insert(url.clone()) {
                log::warn!("Image failed to load, using placeholder: {}", url);
            }
            EventStatus::Captured
        }
    }
}

/// Handle lightbox buttons and keyboard input.
///
/// Keys are ignored while the lightbox is closed.
pub fn handle_modal(
    msg: ModalMessage,
    gallery: &Gallery,
    lightbox: &mut Lightbox,
    bindings: &KeyBindings,
) -> EventStatus {
    if !lightbox.is_open() {
        return EventStatus::Ignored;
    }
    let sequence = gallery.sequence();
    match msg {
        ModalMessage::Key(key) => match lightbox.handle_key(key, bindings, sequence) {
            Some(action) => {
                log::debug!("Key {:?} -> {}", key, action.name());
                EventStatus::Captured
            }
            None => EventStatus::Ignored,
        },
        ModalMessage::Close => {
            lightbox.apply(ModalAction::Close, sequence);
            EventStatus::Captured
        }
        ModalMessage::Previous => {
            lightbox.apply(ModalAction::Previous, sequence);
            EventStatus::Captured
        }
        ModalMessage::Next => {
            lightbox.apply(ModalAction::Next, sequence);
            EventStatus::Captured
        }
        ModalMessage::ZoomIn => {
            lightbox.apply(ModalAction::ZoomIn, sequence);
            EventStatus::Captured
        }
        ModalMessage::ZoomOut => {
            lightbox.apply(ModalAction::ZoomOut, sequence);
            EventStatus::Captured
        }
        ModalMessage::ResetZoom => {
            lightbox.apply(ModalAction::ResetZoom, sequence);
            EventStatus::Captured
        }
    }
}

/// Handle mouse input over the lightbox image (wheel zoom, drag pan).
pub fn handle_pointer(event: PointerEvent, lightbox: &mut Lightbox) -> EventStatus {
    if !lightbox.is_open() {
        return EventStatus::Ignored;
    }
    let viewport = lightbox.viewport_mut();
    match event {
        PointerEvent::Down(position) => viewport.drag_start(position),
        PointerEvent::Move(position) => viewport.drag_move(position),
        PointerEvent::Up | PointerEvent::Leave => viewport.drag_end(),
        PointerEvent::Wheel { delta_y } => viewport.wheel(delta_y),
    }
}

/// Handle touch sequences.
///
/// On the lightbox a swipe navigates (resetting the viewport). On the
/// carousel a swipe moves the carousel and a tap opens the lightbox on the
/// current carousel image.
pub fn handle_touch(
    surface: TouchSurface,
    event: TouchEvent,
    tracker: &mut SwipeTracker,
    gallery: &Gallery,
    lightbox: &mut Lightbox,
    carousel: &mut Carousel,
) -> EventStatus {
    if surface == TouchSurface::Carousel && lightbox.is_open() {
        return EventStatus::Ignored;
    }
    let gesture = match event {
        TouchEvent::Start(position) => {
            tracker.touch_start(position);
            return EventStatus::Ignored;
        }
        TouchEvent::Move(position) => {
            tracker.touch_move(position);
            return EventStatus::Ignored;
        }
        TouchEvent::Cancel => {
            tracker.cancel();
            return EventStatus::Ignored;
        }
        TouchEvent::End => tracker.touch_end(),
    };

    let sequence = gallery.sequence();
    match (surface, gesture) {
        (TouchSurface::Modal, gesture) => {
            if lightbox.handle_gesture(gesture, sequence) {
                EventStatus::Captured
            } else {
                EventStatus::Ignored
            }
        }
        (TouchSurface::Carousel, Gesture::Tap) => {
            if lightbox.open_at(sequence, carousel.index()) {
                EventStatus::Captured
            } else {
                EventStatus::Ignored
            }
        }
        (TouchSurface::Carousel, gesture) => {
            if carousel.handle_gesture(gesture, sequence) {
                EventStatus::Captured
            } else {
                EventStatus::Ignored
            }
        }
    }
}

/// Handle window messages.
pub fn handle_window(msg: WindowMessage, layout: &mut LayoutMode, breakpoint: f32) {
    match msg {
        WindowMessage::Resized { width } => {
            let next = LayoutMode::for_width(width, breakpoint);
            if next != *layout {
                log::debug!("Layout {:?} -> {:?} at width {:.0}", layout, next, width);
                *layout = next;
            }
        }
    }
}
