//! Menu geometry and timing configuration
//!
//! Defaults mirror the stylesheet values; on wasm the adapter overrides the
//! geometry and timing fields from CSS custom properties at startup.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Everything the controller needs to know about the page layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Ring radius items are placed on (px)
    pub radius: f32,
    /// Item diameter (px)
    pub item_size: f32,
    /// Minimum clearance from viewport edges (px)
    pub edge_margin: f32,
    /// Maximum pointer travel for a tap (px)
    pub click_threshold: f32,
    /// Ghost mouse-event window after a touch tap (ms)
    pub ghost_window_ms: f64,
    /// Click swallow window after a drag release (ms)
    pub drag_guard_ms: f64,
    /// Open/close animation duration (s)
    pub animation_duration: f32,
    /// Delay between consecutive item animations (s)
    pub item_stagger: f32,
    /// Button top-left at startup (px)
    pub initial_anchor: Vec2,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            radius: MENU_RADIUS,
            item_size: MENU_ITEM_SIZE,
            edge_margin: EDGE_MARGIN,
            click_threshold: CLICK_THRESHOLD_PX,
            ghost_window_ms: GHOST_EVENT_WINDOW_MS,
            drag_guard_ms: DRAG_CLICK_GUARD_MS,
            animation_duration: ANIMATION_DURATION_S,
            item_stagger: ITEM_STAGGER_S,
            initial_anchor: Vec2::new(INITIAL_ANCHOR.0, INITIAL_ANCHOR.1),
        }
    }
}

impl MenuConfig {
    /// Time (s) until the last of `item_count` staggered animations finishes
    pub fn settle_time(&self, item_count: usize) -> f32 {
        self.animation_duration + self.item_stagger * item_count.saturating_sub(1) as f32
    }
}
