//! Viewer settings, embedded in the application config file.

use serde::{Deserialize, Serialize};

use crate::constants::{CONTENT_HEIGHT, CONTENT_WIDTH, MOBILE_BREAKPOINT, PLACEHOLDER_DIR, SWIPE_THRESHOLD};
use crate::gallery::EmptyCategoryPolicy;
use crate::geometry::Size;
use crate::keybindings::KeyBindings;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Render empty categories as a placeholder tile instead of hiding them
    #[serde(default)]
    pub show_empty_categories: bool,

    /// Reference box width used for pan bounds
    #[serde(default = "default_content_width")]
    pub content_width: f32,

    /// Reference box height used for pan bounds
    #[serde(default = "default_content_height")]
    pub content_height: f32,

    /// Minimum horizontal travel, in pixels, for a swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,

    /// Viewport widths below this use the carousel layout
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: f32,

    /// Public directory holding the per-category placeholder images
    #[serde(default = "default_placeholder_dir")]
    pub placeholder_dir: String,

    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_content_width() -> f32 {
    CONTENT_WIDTH
}

fn default_content_height() -> f32 {
    CONTENT_HEIGHT
}

fn default_swipe_threshold() -> f32 {
    SWIPE_THRESHOLD
}

fn default_mobile_breakpoint() -> f32 {
    MOBILE_BREAKPOINT
}

fn default_placeholder_dir() -> String {
    PLACEHOLDER_DIR.to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            show_empty_categories: false,
            content_width: default_content_width(),
            content_height: default_content_height(),
            swipe_threshold: default_swipe_threshold(),
            mobile_breakpoint: default_mobile_breakpoint(),
            placeholder_dir: default_placeholder_dir(),
            keybindings: KeyBindings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn empty_category_policy(&self) -> EmptyCategoryPolicy {
        EmptyCategoryPolicy::from_show_empty(self.show_empty_categories)
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.content_width, self.content_height)
    }

    /// A fresh viewport over the configured reference box.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.content_size())
    }
}
