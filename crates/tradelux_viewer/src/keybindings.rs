//! Customizable keybindings for the photo lightbox.
//!
//! Bindings only apply while the lightbox is open; the grid ignores the
//! keyboard entirely.

use serde::{Deserialize, Serialize};

use crate::event::Key;

/// Something a key press can do inside the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalAction {
    /// Close the lightbox
    Close,
    /// Show the previous image
    Previous,
    /// Show the next image
    Next,
    /// Zoom in one step
    ZoomIn,
    /// Zoom out one step
    ZoomOut,
    /// Reset zoom and pan
    ResetZoom,
}

impl ModalAction {
    /// All actions, in settings display order.
    pub fn all() -> &'static [ModalAction] {
        &[
            ModalAction::Close,
            ModalAction::Previous,
            ModalAction::Next,
            ModalAction::ZoomIn,
            ModalAction::ZoomOut,
            ModalAction::ResetZoom,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModalAction::Close => "Close",
            ModalAction::Previous => "Previous image",
            ModalAction::Next => "Next image",
            ModalAction::ZoomIn => "Zoom in",
            ModalAction::ZoomOut => "Zoom out",
            ModalAction::ResetZoom => "Reset zoom",
        }
    }
}

/// Keybinding configuration for the lightbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Hotkey for closing the lightbox
    pub close: Key,
    /// Hotkey for the previous image
    pub previous: Key,
    /// Hotkey for the next image
    pub next: Key,
    /// Hotkeys for zooming in (`+` and `=` share a physical key on most layouts)
    #[serde(default = "default_zoom_in")]
    pub zoom_in: Vec<Key>,
    /// Hotkey for zooming out
    #[serde(default = "default_zoom_out")]
    pub zoom_out: Key,
    /// Hotkey for resetting the view
    #[serde(default = "default_reset")]
    pub reset: Key,
}

fn default_zoom_in() -> Vec<Key> {
    vec![Key::Char('+'), Key::Char('=')]
}

fn default_zoom_out() -> Key {
    Key::Char('-')
}

fn default_reset() -> Key {
    Key::Char('0')
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            close: Key::Escape,
            previous: Key::ArrowLeft,
            next: Key::ArrowRight,
            zoom_in: default_zoom_in(),
            zoom_out: default_zoom_out(),
            reset: default_reset(),
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: Key) -> Option<ModalAction> {
        if key == self.close {
            Some(ModalAction::Close)
        } else if key == self.previous {
            Some(ModalAction::Previous)
        } else if key == self.next {
            Some(ModalAction::Next)
        } else if self.zoom_in.contains(&key) {
            Some(ModalAction::ZoomIn)
        } else if key == self.zoom_out {
            Some(ModalAction::ZoomOut)
        } else if key == self.reset {
            Some(ModalAction::ResetZoom)
        } else {
            None
        }
    }

    /// Get the primary hotkey for an action.
    pub fn key_for_action(&self, action: ModalAction) -> Option<Key> {
        match action {
            ModalAction::Close => Some(self.close),
            ModalAction::Previous => Some(self.previous),
            ModalAction::Next => Some(self.next),
            ModalAction::ZoomIn => self.zoom_in.first().copied(),
            ModalAction::ZoomOut => Some(self.zoom_out),
            ModalAction::ResetZoom => Some(self.reset),
        }
    }

    /// Set the hotkey for an action. Zoom-in keeps only the new key.
    pub fn set_key(&mut self, action: ModalAction, key: Key) {
        match action {
            ModalAction::Close => self.close = key,
            ModalAction::Previous => self.previous = key,
            ModalAction::Next => self.next = key,
            ModalAction::ZoomIn => self.zoom_in = vec![key],
            ModalAction::ZoomOut => self.zoom_out = key,
            ModalAction::ResetZoom => self.reset = key,
        }
    }

    /// Check if a key is already bound to an action other than `exclude`.
    pub fn key_conflict(&self, key: Key, exclude: Option<ModalAction>) -> Option<ModalAction> {
        ModalAction::all()
            .iter()
            .copied()
            .filter(|action| Some(*action) != exclude)
            .find(|action| self.action_for_key(key) == Some(*action))
    }
}

/// Convert a key to a display string.
pub fn key_to_string(key: Key) -> String {
    match key {
        Key::Escape => "Esc".to_string(),
        Key::ArrowLeft => "←".to_string(),
        Key::ArrowRight => "→".to_string(),
        Key::ArrowUp => "↑".to_string(),
        Key::ArrowDown => "↓".to_string(),
        Key::Enter => "Enter".to_string(),
        Key::Space => "Space".to_string(),
        Key::Char(c) => c.to_uppercase().to_string(),
        Key::Unidentified => "?".to_string(),
    }
}
