//! Blocked-interval algebra on the degree circle
//!
//! Edge constraints arrive as possibly-wrapping angular ranges in degrees.
//! This module normalizes them into non-wrapping intervals, coalesces
//! overlaps, and computes the complementary gaps the placement engine
//! chooses from. It knows nothing about viewports or menus.

use crate::consts::{MERGE_EPSILON_DEG, MIN_GAP_DEG, UNOBSTRUCTED_START_DEG};
use crate::normalize_deg;

/// A blocked angular range with `0 <= start <= end <= 360`.
///
/// After wraparound fusion in [`merge`], the final interval of a set may
/// wrap the 0/360 seam (`end < start`); the modular arithmetic in [`gaps`]
/// handles that representation transparently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f32,
    pub end: f32,
}

/// An unblocked arc: `start` in [0, 360), clockwise `span` in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub start: f32,
    pub span: f32,
}

/// Append the range `[start, end]` to `out`, splitting it at the 0/360 seam
/// when it wraps. Zero-width ranges are dropped.
pub fn push_wrapped(out: &mut Vec<Interval>, start: f32, end: f32) {
    let start = normalize_deg(start);
    let end = normalize_deg(end);
    if start > end {
        // Wraps past 360 (e.g. 350 to 10)
        out.push(Interval { start, end: 360.0 });
        out.push(Interval { start: 0.0, end });
    } else if start < end {
        out.push(Interval { start, end });
    }
}

/// Coalesce intervals into a disjoint set, sorted by start angle.
///
/// Intervals closer than the merge tolerance count as touching. When the
/// result still abuts the seam from both sides, the two seam blocks are one
/// wraparound block: the last interval absorbs the first and keeps its
/// wrapping representation.
pub fn merge(mut blocks: Vec<Interval>) -> Vec<Interval> {
    if blocks.is_empty() {
        return blocks;
    }
    blocks.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Interval> = Vec::with_capacity(blocks.len());
    merged.push(blocks[0]);
    for current in &blocks[1..] {
        let last = merged.last_mut().unwrap();
        if current.start <= last.end + MERGE_EPSILON_DEG {
            last.end = last.end.max(current.end);
        } else {
            merged.push(*current);
        }
    }

    if merged.len() > 1 {
        let first = merged[0];
        let last = merged[merged.len() - 1];
        if first.start < MERGE_EPSILON_DEG && last.end > 360.0 - MERGE_EPSILON_DEG {
            let last_idx = merged.len() - 1;
            merged[last_idx].end = first.end;
            merged.remove(0);
        }
    }

    merged
}

/// Complement of a merged block set: the free arcs between consecutive
/// blocks, including the one crossing the 0/360 seam.
///
/// No blocks yield the full circle starting at the top; a block covering
/// the whole circle yields a single zero-span gap. Gaps below the minimum
/// span are float noise and dropped.
pub fn gaps(merged: &[Interval]) -> Vec<Gap> {
    if merged.is_empty() {
        return vec![Gap {
            start: UNOBSTRUCTED_START_DEG,
            span: 360.0,
        }];
    }

    if merged.len() == 1 {
        let block = merged[0];
        if block.start < MERGE_EPSILON_DEG && block.end > 360.0 - MERGE_EPSILON_DEG {
            return vec![Gap { start: 0.0, span: 0.0 }];
        }
        // The single gap runs from the block's end back around to its start
        return vec![Gap {
            start: normalize_deg(block.end),
            span: normalize_deg(block.start - block.end),
        }];
    }

    let mut out = Vec::with_capacity(merged.len());
    for i in 0..merged.len() {
        let current_end = merged[i].end;
        let next_start = merged[(i + 1) % merged.len()].start;
        let span = normalize_deg(next_start - current_end);
        if span > MIN_GAP_DEG {
            out.push(Gap {
                start: normalize_deg(current_end),
                span,
            });
        }
    }
    out
}
