//! Pure placement geometry
//!
//! Everything here is a deterministic function of its arguments:
//! - No clocks, no hidden state
//! - Safe to recompute on every pointer move
//! - No rendering or platform dependencies

pub mod interval;
pub mod placement;

pub use interval::{Gap, Interval, gaps, merge, push_wrapped};
pub use placement::{FreeArc, ItemPlacement, free_arc, place_items};
