//! Grid vs. carousel layout, and the mobile carousel position.

use serde::Serialize;

use crate::constants::MOBILE_BREAKPOINT;
use crate::gallery::{navigate, FlatImage};
use crate::gesture::{Gesture, SwipeDirection};

/// How the photo section is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Category sections with thumbnail grids
    #[default]
    Grid,
    /// One image at a time, swiped horizontally
    Carousel,
}

impl LayoutMode {
    /// Carousel below the breakpoint width, grid at or above it.
    pub fn for_width(width: f32, breakpoint: f32) -> Self {
        if width < breakpoint {
            LayoutMode::Carousel
        } else {
            LayoutMode::Grid
        }
    }

    pub fn for_width_default(width: f32) -> Self {
        Self::for_width(width, MOBILE_BREAKPOINT)
    }
}

/// Position in the mobile carousel. Independent of the lightbox selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Carousel {
    index: usize,
}

impl Carousel {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Jump to a dot. Out-of-range targets are a no-op.
    pub fn go_to(&mut self, sequence: &[FlatImage], target: isize) -> bool {
        let next = navigate(sequence, self.index, target);
        let changed = next != self.index;
        self.index = next;
        changed
    }

    pub fn next(&mut self, sequence: &[FlatImage]) -> bool {
        self.go_to(sequence, self.index as isize + 1)
    }

    pub fn previous(&mut self, sequence: &[FlatImage]) -> bool {
        self.go_to(sequence, self.index as isize - 1)
    }

    pub fn handle_gesture(&mut self, gesture: Gesture, sequence: &[FlatImage]) -> bool {
        match gesture {
            Gesture::Swipe(SwipeDirection::Left) => self.next(sequence),
            Gesture::Swipe(SwipeDirection::Right) => self.previous(sequence),
            Gesture::Tap | Gesture::None => false,
        }
    }

    /// Pull the index back into range after the sequence shrank.
    pub fn clamp_to(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}
