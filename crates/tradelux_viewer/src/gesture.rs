//! Touch swipe recognition.
//!
//! A touch sequence is reduced to its start point and its latest move point.
//! On release the displacement is classified: only a horizontal-dominant
//! movement longer than the threshold counts as a swipe, so vertical scrolling
//! and finger jitter never navigate.

use crate::constants::SWIPE_THRESHOLD;
use crate::geometry::Point;

/// Direction of a recognised swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right-to-left: show the next image
    Left,
    /// Finger moved left-to-right: show the previous image
    Right,
}

/// Outcome of a finished touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Released without moving
    Tap,
    /// Horizontal movement past the threshold
    Swipe(SwipeDirection),
    /// Vertical-dominant or too short to count
    None,
}

/// Classify a displacement where `dx = start.x - end.x`, `dy = start.y - end.y`.
pub fn classify_swipe(dx: f32, dy: f32, threshold: f32) -> Option<SwipeDirection> {
    let horizontal = dx.abs() > dy.abs();
    if !horizontal {
        return None;
    }
    if dx > threshold {
        Some(SwipeDirection::Left)
    } else if dx < -threshold {
        Some(SwipeDirection::Right)
    } else {
        None
    }
}

/// Tracks one touch sequence at a time.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<Point>,
    last: Option<Point>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
            last: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether a touch sequence is in progress.
    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    pub fn touch_start(&mut self, position: Point) {
        self.start = Some(position);
        self.last = None;
    }

    pub fn touch_move(&mut self, position: Point) {
        if self.start.is_some() {
            self.last = Some(position);
        }
    }

    /// Abandon the current sequence (e.g. touchcancel).
    pub fn cancel(&mut self) {
        self.start = None;
        self.last = None;
    }

    /// Finish the sequence and classify it.
    pub fn touch_end(&mut self) -> Gesture {
        let start = self.start.take();
        let last = self.last.take();
        match (start, last) {
            (Some(start), Some(end)) => {
                let dx = start.x - end.x;
                let dy = start.y - end.y;
                match classify_swipe(dx, dy, self.threshold) {
                    Some(direction) => {
                        log::debug!("Swipe {:?} (dx {:.0}, dy {:.0})", direction, dx, dy);
                        Gesture::Swipe(direction)
                    }
                    None => Gesture::None,
                }
            }
            (Some(_), None) => Gesture::Tap,
            (None, _) => Gesture::None,
        }
    }
}
