//! Free-arc search and per-item placement
//!
//! The tricky part of the widget: given the button center and the viewport,
//! find the widest angular arc on the placement ring where every item stays
//! fully on screen, then spread the items across it.
//!
//! Items need a clearance circle of `radius + item_size / 2 + edge_margin`
//! around the center. Any viewport edge closer than that cuts a chord off
//! the circle and blocks an angular range centered on the direction facing
//! that edge.

use glam::Vec2;

use crate::consts::UNOBSTRUCTED_START_DEG;
use crate::geom::interval::{self, Gap};
use crate::{normalize_deg, polar_offset};

/// The widest unblocked arc around the anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeArc {
    /// Arc start in degrees, [0, 360), clockwise from the positive x-axis
    pub start_deg: f32,
    /// Arc span in degrees, [0, 360]
    pub span_deg: f32,
}

/// Final placement for one menu item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPlacement {
    /// Angle on the ring, degrees in [0, 360)
    pub angle_deg: f32,
    /// Translation offset from the button center (px)
    pub offset: Vec2,
    /// False when the whole circle is blocked; the coordinates stay valid
    /// so a later recompute can restore the item in place
    pub visible: bool,
}

/// Compute the widest free arc around `center` inside `viewport`.
///
/// Deterministic and stateless. When several gaps tie for widest, the
/// first one in merged-block order wins; ties only occur at exactly equal
/// spans, so the choice is stable across calls.
pub fn free_arc(
    center: Vec2,
    viewport: Vec2,
    radius: f32,
    item_size: f32,
    edge_margin: f32,
) -> FreeArc {
    let clearance = radius + item_size / 2.0 + edge_margin;

    // Perpendicular distance to each edge, paired with the angle that faces
    // away from it. Screen y grows downward, so the top edge blocks angles
    // around 270.
    let edges = [
        (center.y, 270.0_f32),
        (viewport.y - center.y, 90.0),
        (center.x, 180.0),
        (viewport.x - center.x, 0.0),
    ];

    let mut blocked = Vec::new();
    for (dist, facing) in edges {
        if dist < clearance {
            // Half-width of the blocked range; the clamp keeps a center
            // beyond the edge from feeding acos out of range
            let alpha = (dist / clearance).clamp(-1.0, 1.0).acos().to_degrees();
            interval::push_wrapped(&mut blocked, facing - alpha, facing + alpha);
        }
    }

    if blocked.is_empty() {
        return FreeArc {
            start_deg: UNOBSTRUCTED_START_DEG,
            span_deg: 360.0,
        };
    }

    let merged = interval::merge(blocked);
    let gaps = interval::gaps(&merged);

    let widest = gaps
        .iter()
        .copied()
        .reduce(|best, gap| if gap.span > best.span { gap } else { best })
        .unwrap_or(Gap {
            // Every gap was float noise; keep a valid angle with no room
            start: merged[0].start,
            span: 0.0,
        });

    log::trace!(
        "free arc: {} blocked range(s), widest gap {:.1}° from {:.1}°",
        merged.len(),
        widest.span,
        widest.start
    );

    FreeArc {
        start_deg: normalize_deg(widest.start),
        span_deg: widest.span.clamp(0.0, 360.0),
    }
}

/// Spread `count` items across `arc` on a ring of `radius`.
///
/// A full circle spaces items every `span / count` so the two ends do not
/// both land on the seam; a partial arc pins the first and last items to
/// the arc boundaries. A single item sits mid-arc. Zero span keeps every
/// item at the arc start, hidden.
pub fn place_items(arc: FreeArc, count: usize, radius: f32) -> Vec<ItemPlacement> {
    if count == 0 {
        return Vec::new();
    }

    let visible = arc.span_deg > 0.0;
    let step = if count > 1 && visible {
        if arc.span_deg >= 360.0 {
            arc.span_deg / count as f32
        } else {
            arc.span_deg / (count - 1) as f32
        }
    } else {
        0.0
    };

    (0..count)
        .map(|index| {
            let angle = if count == 1 && visible {
                arc.start_deg + arc.span_deg / 2.0
            } else {
                arc.start_deg + step * index as f32
            };
            let angle = normalize_deg(angle);
            ItemPlacement {
                angle_deg: angle,
                offset: polar_offset(radius, angle),
                visible,
            }
        })
        .collect()
}
