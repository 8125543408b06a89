//! Input events the viewer reacts to.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Keyboard keys (the subset the viewer cares about).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Space,
    Char(char),
    /// Anything else
    Unidentified,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Key {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unidentified,
                }
            }
        }
    }
}

/// Pointer and touch events on the image surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed
    Down(Point),
    /// Mouse moved
    Move(Point),
    /// Mouse button released
    Up,
    /// Pointer left the image surface
    Leave,
    /// Mouse wheel scrolled (positive = down)
    Wheel { delta_y: f32 },
}

/// Touch events, used for swipe navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Start(Point),
    Move(Point),
    End,
    Cancel,
}
