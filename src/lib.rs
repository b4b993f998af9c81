//! Orbit Menu - a draggable action button with a radial menu
//!
//! Core modules:
//! - `geom`: Pure placement geometry (blocked intervals, free-arc search)
//! - `input`: Drag lifecycle, tap/drag classification, timed event guards
//! - `menu`: Controller tying pointer input to the menu open/close state
//! - `config`: Geometry and timing knobs
//!
//! The core is platform-free and never reads a clock; all DOM wiring lives
//! in the wasm32 side of the binary.

pub mod config;
pub mod geom;
pub mod input;
pub mod menu;

pub use config::MenuConfig;
pub use menu::{MenuController, MenuPhase};

use glam::Vec2;

/// Widget layout and timing constants
pub mod consts {
    /// Maximum pointer travel (px) for a press to still count as a tap
    pub const CLICK_THRESHOLD_PX: f32 = 5.0;
    /// Window (ms) during which mouse events after a touch tap are ghosts
    pub const GHOST_EVENT_WINDOW_MS: f64 = 50.0;
    /// Window (ms) during which the click following a drag is swallowed
    pub const DRAG_CLICK_GUARD_MS: f64 = 50.0;

    /// Ring radius (px) items are placed on, stylesheet fallback
    pub const MENU_RADIUS: f32 = 100.0;
    /// Item diameter (px), stylesheet fallback
    pub const MENU_ITEM_SIZE: f32 = 45.0;
    /// Minimum clearance (px) kept between items and the viewport edge
    pub const EDGE_MARGIN: f32 = 10.0;

    /// Open/close animation length (s), stylesheet fallback
    pub const ANIMATION_DURATION_S: f32 = 0.3;
    /// Delay (s) between consecutive item animations
    pub const ITEM_STAGGER_S: f32 = 0.05;
    /// Extra slack (ms) before post-close style cleanup runs
    pub const CLEANUP_BUFFER_MS: f64 = 50.0;

    /// Arc start when nothing blocks the circle (degrees, pointing up)
    pub const UNOBSTRUCTED_START_DEG: f32 = 270.0;
    /// Tolerance (degrees) when coalescing adjacent blocked intervals
    pub const MERGE_EPSILON_DEG: f32 = 0.01;
    /// Gaps narrower than this (degrees) are float noise, not usable arcs
    pub const MIN_GAP_DEG: f32 = 0.1;

    /// Initial button position (px), matching the stylesheet
    pub const INITIAL_ANCHOR: (f32, f32) = (50.0, 50.0);
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_deg(mut angle: f32) -> f32 {
    angle %= 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    // adding 360 to a tiny negative can round straight back to 360
    if angle >= 360.0 { 0.0 } else { angle }
}

/// Translation offset to a point at `angle_deg` on a circle of `radius`
#[inline]
pub fn polar_offset(radius: f32, angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos() * radius, rad.sin() * radius)
}
