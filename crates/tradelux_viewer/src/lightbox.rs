//! The modal lightbox: which image is open, and its zoom/pan viewport.
//!
//! Selection and viewport live in one type so that every index change goes
//! through [`Lightbox::go_to`], which resets the viewport. Opening acquires a
//! [`ModalScope`]; closing or dropping the lightbox releases it.

use crate::event::Key;
use crate::gallery::{navigate, select_by_url, FlatImage};
use crate::gesture::{Gesture, SwipeDirection};
use crate::keybindings::{KeyBindings, ModalAction};
use crate::listener::{ListenerRegistry, ModalScope};
use crate::viewport::Viewport;

/// Outcome of reconciling an open lightbox with a rebuilt sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Nothing was open
    Closed,
    /// The selected image is still present, possibly at a new index
    Kept(usize),
    /// The selected image disappeared; the lightbox was closed
    Stale,
}

#[derive(Debug)]
pub struct Lightbox {
    selection: Option<usize>,
    viewport: Viewport,
    registry: ListenerRegistry,
    scope: Option<ModalScope>,
}

impl Lightbox {
    pub fn new(viewport: Viewport, registry: ListenerRegistry) -> Self {
        Self {
            selection: None,
            viewport,
            registry,
            scope: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport access for zoom, wheel and drag events.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The image currently shown, if open.
    pub fn current<'a>(&self, sequence: &'a [FlatImage]) -> Option<&'a FlatImage> {
        self.selection.and_then(|index| sequence.get(index))
    }

    /// Open on the first image with this URL. Returns false (and stays
    /// closed) if the URL is not in the sequence.
    pub fn open_url(&mut self, sequence: &[FlatImage], url: &str) -> bool {
        match select_by_url(sequence, url) {
            Some(index) => self.open_at(sequence, index),
            None => {
                log::warn!("Ignoring click on unknown image {}", url);
                false
            }
        }
    }

    /// Open on a sequence position. Out-of-range positions keep the lightbox
    /// closed.
    pub fn open_at(&mut self, sequence: &[FlatImage], index: usize) -> bool {
        if index >= sequence.len() {
            return false;
        }
        self.selection = Some(index);
        self.viewport.reset();
        if self.scope.is_none() {
            self.scope = Some(self.registry.acquire());
        }
        log::debug!("Lightbox opened at {}/{}", index + 1, sequence.len());
        true
    }

    /// Move to `target`. Out-of-range targets are a no-op. Returns true if
    /// the selection changed, in which case the viewport was reset.
    pub fn go_to(&mut self, sequence: &[FlatImage], target: isize) -> bool {
        let Some(current) = self.selection else {
            return false;
        };
        let next = navigate(sequence, current, target);
        if next == current {
            return false;
        }
        self.selection = Some(next);
        self.viewport.reset();
        log::debug!("Lightbox moved {} -> {}", current, next);
        true
    }

    pub fn next(&mut self, sequence: &[FlatImage]) -> bool {
        match self.selection {
            Some(current) => self.go_to(sequence, current as isize + 1),
            None => false,
        }
    }

    pub fn previous(&mut self, sequence: &[FlatImage]) -> bool {
        match self.selection {
            Some(current) => self.go_to(sequence, current as isize - 1),
            None => false,
        }
    }

    /// Clear the selection, reset the viewport and release the modal scope.
    pub fn close(&mut self) {
        if self.selection.take().is_some() {
            log::debug!("Lightbox closed");
        }
        self.viewport.reset();
        self.scope = None;
    }

    /// Re-resolve the selection after the sequence was rebuilt.
    ///
    /// `selected_url` is the URL that was open before the rebuild. An open
    /// lightbox with no URL to look up is closed.
    pub fn reconcile(&mut self, selected_url: Option<&str>, sequence: &[FlatImage]) -> Reconcile {
        let Some(current) = self.selection else {
            return Reconcile::Closed;
        };
        let Some(url) = selected_url else {
            self.close();
            return Reconcile::Closed;
        };
        match select_by_url(sequence, url) {
            Some(index) => {
                if index != current {
                    self.selection = Some(index);
                    self.viewport.reset();
                }
                Reconcile::Kept(index)
            }
            None => {
                log::info!("Selected image {} no longer present, closing lightbox", url);
                self.close();
                Reconcile::Stale
            }
        }
    }

    /// Apply a modal action. Returns true if any state changed.
    pub fn apply(&mut self, action: ModalAction, sequence: &[FlatImage]) -> bool {
        if !self.is_open() {
            return false;
        }
        match action {
            ModalAction::Close => {
                self.close();
                true
            }
            ModalAction::Previous => self.previous(sequence),
            ModalAction::Next => self.next(sequence),
            ModalAction::ZoomIn => self.viewport.zoom_in(),
            ModalAction::ZoomOut => self.viewport.zoom_out(),
            ModalAction::ResetZoom => {
                let changed = *self.viewport.state() != Default::default();
                self.viewport.reset();
                changed
            }
        }
    }

    /// Keyboard input. Ignored entirely while closed.
    pub fn handle_key(
        &mut self,
        key: Key,
        bindings: &KeyBindings,
        sequence: &[FlatImage],
    ) -> Option<ModalAction> {
        if !self.is_open() {
            return None;
        }
        let action = bindings.action_for_key(key)?;
        self.apply(action, sequence);
        Some(action)
    }

    /// Swipe input: left shows the next image, right the previous one.
    pub fn handle_gesture(&mut self, gesture: Gesture, sequence: &[FlatImage]) -> bool {
        match gesture {
            Gesture::Swipe(SwipeDirection::Left) => self.next(sequence),
            Gesture::Swipe(SwipeDirection::Right) => self.previous(sequence),
            Gesture::Tap | Gesture::None => false,
        }
    }
}
