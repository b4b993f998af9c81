//! Drag session bookkeeping and tap/drag classification

use glam::Vec2;

/// Which input channel a press arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// How a finished press is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Net travel stayed under the click threshold; the platform's
    /// follow-up click performs the toggle
    Tap,
    /// The control was moved; the follow-up synthetic click is noise
    Drag,
}

/// One press-to-release interaction. At most one exists at a time; a second
/// pointer-down while a session is live is rejected by the controller.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    /// Pointer position at press (viewport px)
    pub start: Vec2,
    /// Control top-left when the press landed
    pub anchor_at_start: Vec2,
    pub kind: PointerKind,
}

impl DragSession {
    pub fn new(kind: PointerKind, start: Vec2, anchor_at_start: Vec2) -> Self {
        Self {
            start,
            anchor_at_start,
            kind,
        }
    }

    /// Where the control's top-left belongs for a pointer at `point`,
    /// before viewport clamping
    pub fn anchor_for(&self, point: Vec2) -> Vec2 {
        self.anchor_at_start + (point - self.start)
    }

    /// Euclidean travel from the press point
    pub fn displacement(&self, point: Vec2) -> f32 {
        (point - self.start).length()
    }

    /// Tap when net travel stays strictly under `threshold`
    pub fn classify(&self, end: Vec2, threshold: f32) -> Release {
        if self.displacement(end) < threshold {
            Release::Tap
        } else {
            Release::Drag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DragSession {
        DragSession::new(PointerKind::Mouse, Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0))
    }

    #[test]
    fn test_tap_below_threshold() {
        let end = Vec2::new(100.0, 104.9);
        assert_eq!(session().classify(end, 5.0), Release::Tap);
    }

    #[test]
    fn test_drag_above_threshold() {
        let end = Vec2::new(100.0, 105.1);
        assert_eq!(session().classify(end, 5.0), Release::Drag);
    }

    #[test]
    fn test_exact_threshold_is_a_drag() {
        let end = Vec2::new(103.0, 104.0); // 3-4-5 triangle
        assert_eq!(session().classify(end, 5.0), Release::Drag);
    }

    #[test]
    fn test_anchor_follows_pointer_delta() {
        let anchor = session().anchor_for(Vec2::new(130.0, 80.0));
        assert_eq!(anchor, Vec2::new(80.0, 30.0));
    }
}
