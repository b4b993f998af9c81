//! Menu controller
//!
//! Owns the button position, the drag session, and the menu lifecycle, and
//! turns raw pointer events into placement updates for the host. Every
//! time-dependent entry point takes the current time in milliseconds;
//! nothing here reads a clock or schedules a timer, which keeps the whole
//! state machine testable without a DOM.

use glam::Vec2;

use crate::config::MenuConfig;
use crate::consts::CLEANUP_BUFFER_MS;
use crate::geom::{self, ItemPlacement};
use crate::input::{DragSession, PointerKind, Release, TimedFlag};

/// Menu lifecycle. `Opening` and `Closing` are the animated edges; every
/// non-`Closed` phase keeps item placement tracking the anchor during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Result of a pointer-down on the control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// A drag session started; the host shows the grabbing affordance and
    /// disables transitions on the control
    Started,
    /// Ghost mouse event or a session already live
    Ignored,
}

/// Result of a pointer-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Below the click threshold; the platform's follow-up click toggles
    Tap,
    /// The control moved; the follow-up synthetic click will be swallowed
    Drag,
    /// No live session, or a ghost mouse-up
    Ignored,
}

/// Container center and item placements, applied without animation
#[derive(Debug, Clone)]
pub struct MenuFrame {
    pub center: Vec2,
    pub items: Vec<ItemPlacement>,
}

/// One synchronous drag update
#[derive(Debug, Clone)]
pub struct DragFrame {
    /// Clamped control top-left
    pub anchor: Vec2,
    /// Present while the menu is shown
    pub menu: Option<MenuFrame>,
}

/// Everything the host needs to run the open animation
#[derive(Debug, Clone)]
pub struct OpenTransition {
    pub center: Vec2,
    pub items: Vec<OpenItem>,
    /// When the last item finishes animating (ms timestamp)
    pub settles_at_ms: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OpenItem {
    pub placement: ItemPlacement,
    /// Animation start delay (s), staggered by index
    pub delay_s: f32,
}

/// Everything the host needs to run the close animation
#[derive(Debug, Clone)]
pub struct CloseTransition {
    pub items: Vec<CloseItem>,
    /// When the last cleanup may run (ms timestamp)
    pub settles_at_ms: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct CloseItem {
    /// Animation start delay (s); items retract last-to-first
    pub delay_s: f32,
    /// When the host may reset this item's transient styles (ms timestamp)
    pub cleanup_at_ms: f64,
}

/// Open or close, as decided by a toggle
#[derive(Debug, Clone)]
pub enum Toggle {
    Opened(OpenTransition),
    Closed(CloseTransition),
}

/// The widget's single owned state object
pub struct MenuController {
    config: MenuConfig,
    item_count: usize,
    anchor: Vec2,
    control_size: Vec2,
    viewport: Vec2,
    phase: MenuPhase,
    session: Option<DragSession>,
    /// Ignore mouse down/up on the control after a touch tap
    ghost_guard: TimedFlag,
    /// Swallow the click the browser fires right after a drag release
    click_guard: TimedFlag,
    /// When the current Opening/Closing animation settles
    phase_settles_ms: f64,
}

impl MenuController {
    pub fn new(config: MenuConfig, item_count: usize) -> Self {
        Self {
            anchor: config.initial_anchor,
            config,
            item_count,
            control_size: Vec2::ZERO,
            viewport: Vec2::ZERO,
            phase: MenuPhase::Closed,
            session: None,
            ghost_guard: TimedFlag::default(),
            click_guard: TimedFlag::default(),
            phase_settles_ms: 0.0,
        }
    }

    /// Control size and viewport, as measured by the host at startup
    pub fn set_layout(&mut self, control_size: Vec2, viewport: Vec2) {
        self.control_size = control_size;
        self.viewport = viewport;
    }

    /// Refresh the viewport before a toggle; drags refresh it per move
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Center of the control, the origin for all menu geometry
    pub fn center(&self) -> Vec2 {
        self.anchor + self.control_size / 2.0
    }

    /// True in every phase where items are on screen and must track the
    /// anchor
    pub fn menu_shown(&self) -> bool {
        self.phase != MenuPhase::Closed
    }

    fn accepts_presses(&self) -> bool {
        matches!(self.phase, MenuPhase::Opening | MenuPhase::Open)
    }

    fn placements(&self) -> Vec<ItemPlacement> {
        let arc = geom::free_arc(
            self.center(),
            self.viewport,
            self.config.radius,
            self.config.item_size,
            self.config.edge_margin,
        );
        geom::place_items(arc, self.item_count, self.config.radius)
    }

    /// Current container center and item placements, while the menu is shown
    pub fn menu_frame(&self) -> Option<MenuFrame> {
        if !self.menu_shown() {
            return None;
        }
        Some(MenuFrame {
            center: self.center(),
            items: self.placements(),
        })
    }

    /// A primary-button or single-touch press on the control
    pub fn pointer_down(&mut self, kind: PointerKind, point: Vec2, now_ms: f64) -> Press {
        if kind == PointerKind::Mouse && self.ghost_guard.active(now_ms) {
            log::debug!("ignoring ghost mouse-down");
            return Press::Ignored;
        }
        if self.session.is_some() {
            return Press::Ignored;
        }
        self.session = Some(DragSession::new(kind, point, self.anchor));
        Press::Started
    }

    /// Pointer travel while a session is live. Clamps the new anchor into
    /// the viewport (re-read every move, the window may have been resized)
    /// and, while the menu is shown, recomputes placement so the items track
    /// the pointer with no animation in the way.
    pub fn pointer_move(&mut self, point: Vec2, viewport: Vec2) -> Option<DragFrame> {
        self.viewport = viewport;
        let session = self.session?;

        let limit = (viewport - self.control_size).max(Vec2::ZERO);
        self.anchor = session.anchor_for(point).clamp(Vec2::ZERO, limit);

        let menu = self.menu_shown().then(|| MenuFrame {
            center: self.center(),
            items: self.placements(),
        });
        Some(DragFrame {
            anchor: self.anchor,
            menu,
        })
    }

    /// End of a press. Classifies tap vs. drag by net displacement; a tap
    /// leaves the toggle to the platform's follow-up click, a drag arms the
    /// guard that swallows that click.
    pub fn pointer_up(&mut self, kind: PointerKind, point: Vec2, now_ms: f64) -> ReleaseOutcome {
        if kind == PointerKind::Mouse && self.ghost_guard.active(now_ms) {
            log::debug!("ignoring ghost mouse-up");
            return ReleaseOutcome::Ignored;
        }
        let Some(session) = self.session.take() else {
            return ReleaseOutcome::Ignored;
        };

        match session.classify(point, self.config.click_threshold) {
            Release::Tap => {
                if session.kind == PointerKind::Touch {
                    self.ghost_guard.arm(now_ms, self.config.ghost_window_ms);
                }
                ReleaseOutcome::Tap
            }
            Release::Drag => {
                self.click_guard.arm(now_ms, self.config.drag_guard_ms);
                ReleaseOutcome::Drag
            }
        }
    }

    /// Abort the live session without classifying it (a touch sequence that
    /// ended without a touch point, or a toggle arriving mid-drag)
    pub fn cancel_drag(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// The platform's native click on the control. Swallowed right after a
    /// drag; otherwise it toggles the menu.
    pub fn click(&mut self, now_ms: f64) -> Option<Toggle> {
        if self.click_guard.active(now_ms) {
            self.click_guard.disarm();
            log::debug!("swallowing the click after a drag");
            return None;
        }
        Some(self.toggle(now_ms))
    }

    /// Open or close the menu. A drag in progress is cancelled first so the
    /// toggle starts from a settled control.
    pub fn toggle(&mut self, now_ms: f64) -> Toggle {
        if self.cancel_drag() {
            log::debug!("toggle cancelled a live drag");
        }
        if self.accepts_presses() {
            Toggle::Closed(self.close(now_ms))
        } else {
            Toggle::Opened(self.open(now_ms))
        }
    }

    /// A press outside the control and all menu items. Closes the menu,
    /// except mouse presses inside the ghost window: those are echoes of
    /// the touch tap that just toggled. Touch presses are the authoritative
    /// close signal and always go through.
    pub fn outside_press(&mut self, kind: PointerKind, now_ms: f64) -> Option<CloseTransition> {
        if !self.accepts_presses() {
            return None;
        }
        if kind == PointerKind::Mouse && self.ghost_guard.active(now_ms) {
            log::debug!("ignoring ghost outside press");
            return None;
        }
        Some(self.close(now_ms))
    }

    /// A menu item was selected. Closes the menu as a side effect.
    pub fn item_activated(&mut self, index: usize, now_ms: f64) -> Option<CloseTransition> {
        if !self.accepts_presses() {
            return None;
        }
        log::info!("menu item {} activated", index + 1);
        Some(self.close(now_ms))
    }

    /// Advance an animated phase once its deadline passes. Safe to run
    /// redundantly: a toggle that interrupted the animation rearmed the
    /// deadline, turning the stale call into a no-op.
    pub fn tick(&mut self, now_ms: f64) {
        if now_ms < self.phase_settles_ms {
            return;
        }
        match self.phase {
            MenuPhase::Opening => self.phase = MenuPhase::Open,
            MenuPhase::Closing => self.phase = MenuPhase::Closed,
            _ => {}
        }
    }

    fn open(&mut self, now_ms: f64) -> OpenTransition {
        self.phase = MenuPhase::Opening;
        self.phase_settles_ms = now_ms + 1000.0 * self.config.settle_time(self.item_count) as f64;

        let items = self.placements();
        if let Some(first) = items.first() {
            log::info!(
                "menu opening: {} item(s), first at {:.1}°{}",
                items.len(),
                first.angle_deg,
                if first.visible { "" } else { " (no room, hidden)" },
            );
        }

        OpenTransition {
            center: self.center(),
            items: items
                .into_iter()
                .enumerate()
                .map(|(index, placement)| OpenItem {
                    placement,
                    delay_s: index as f32 * self.config.item_stagger,
                })
                .collect(),
            settles_at_ms: self.phase_settles_ms,
        }
    }

    fn close(&mut self, now_ms: f64) -> CloseTransition {
        self.phase = MenuPhase::Closing;
        self.phase_settles_ms =
            now_ms + 1000.0 * self.config.settle_time(self.item_count) as f64 + CLEANUP_BUFFER_MS;
        log::info!("menu closing");

        let count = self.item_count;
        CloseTransition {
            items: (0..count)
                .map(|index| {
                    // Items retract in reverse order, outermost first
                    let delay_s = (count - 1 - index) as f32 * self.config.item_stagger;
                    CloseItem {
                        delay_s,
                        cleanup_at_ms: now_ms
                            + 1000.0 * (self.config.animation_duration + delay_s) as f64
                            + CLEANUP_BUFFER_MS,
                    }
                })
                .collect(),
            settles_at_ms: self.phase_settles_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(items: usize) -> MenuController {
        let mut controller = MenuController::new(MenuConfig::default(), items);
        controller.set_layout(Vec2::splat(60.0), Vec2::new(800.0, 600.0));
        controller
    }

    fn open_menu(controller: &mut MenuController, now_ms: f64) {
        match controller.toggle(now_ms) {
            Toggle::Opened(_) => {}
            Toggle::Closed(_) => panic!("expected the toggle to open"),
        }
    }

    const P: Vec2 = Vec2::new(100.0, 100.0);

    #[test]
    fn test_tap_defers_toggle_to_click() {
        let mut c = controller(5);
        assert_eq!(c.pointer_down(PointerKind::Mouse, P, 0.0), Press::Started);
        let up = c.pointer_up(PointerKind::Mouse, P + Vec2::new(0.0, 4.9), 10.0);
        assert_eq!(up, ReleaseOutcome::Tap);
        // The release itself must not toggle
        assert_eq!(c.phase(), MenuPhase::Closed);

        let toggle = c.click(20.0).expect("tap click should toggle");
        assert!(matches!(toggle, Toggle::Opened(_)));
        assert_eq!(c.phase(), MenuPhase::Opening);
    }

    #[test]
    fn test_drag_swallows_the_next_click() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Mouse, P, 0.0);
        c.pointer_move(P + Vec2::new(0.0, 5.1), Vec2::new(800.0, 600.0));
        let up = c.pointer_up(PointerKind::Mouse, P + Vec2::new(0.0, 5.1), 10.0);
        assert_eq!(up, ReleaseOutcome::Drag);

        assert!(c.click(30.0).is_none(), "click right after a drag is noise");
        assert_eq!(c.phase(), MenuPhase::Closed);

        // Past the guard window the control clicks normally again
        assert!(c.click(80.0).is_some());
    }

    #[test]
    fn test_exact_threshold_displacement_is_a_drag() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Mouse, P, 0.0);
        let up = c.pointer_up(PointerKind::Mouse, P + Vec2::new(0.0, 5.0), 10.0);
        assert_eq!(up, ReleaseOutcome::Drag);
    }

    #[test]
    fn test_ghost_mouse_events_after_touch_tap() {
        let mut c = controller(5);

        // Touch tap on the control
        c.pointer_down(PointerKind::Touch, P, 0.0);
        assert_eq!(c.pointer_up(PointerKind::Touch, P, 10.0), ReleaseOutcome::Tap);

        // The platform's trailing mouse events arrive ~30 ms later
        assert_eq!(c.pointer_down(PointerKind::Mouse, P, 30.0), Press::Ignored);
        assert_eq!(c.pointer_up(PointerKind::Mouse, P, 32.0), ReleaseOutcome::Ignored);

        // The native click performs the one intended toggle
        assert!(c.click(35.0).is_some());
        assert_eq!(c.phase(), MenuPhase::Opening);

        // Past the window, mouse input works normally
        assert_eq!(c.pointer_down(PointerKind::Mouse, P, 70.0), Press::Started);
    }

    #[test]
    fn test_second_pointer_down_is_rejected() {
        let mut c = controller(5);
        assert_eq!(c.pointer_down(PointerKind::Mouse, P, 0.0), Press::Started);
        assert_eq!(c.pointer_down(PointerKind::Touch, P, 5.0), Press::Ignored);
        assert!(c.is_dragging());
    }

    #[test]
    fn test_pointer_up_without_session_is_ignored() {
        let mut c = controller(5);
        assert_eq!(c.pointer_up(PointerKind::Mouse, P, 0.0), ReleaseOutcome::Ignored);
        assert!(c.pointer_move(P, Vec2::new(800.0, 600.0)).is_none());
    }

    #[test]
    fn test_drag_clamps_to_viewport() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Mouse, P, 0.0);

        let frame = c.pointer_move(Vec2::new(5000.0, 5000.0), Vec2::new(800.0, 600.0));
        // 800x600 viewport minus the 60px control
        assert_eq!(frame.unwrap().anchor, Vec2::new(740.0, 540.0));

        let frame = c.pointer_move(Vec2::new(-5000.0, -5000.0), Vec2::new(800.0, 600.0));
        assert_eq!(frame.unwrap().anchor, Vec2::ZERO);
    }

    #[test]
    fn test_clamp_tracks_viewport_resizes() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Mouse, P, 0.0);
        let frame = c.pointer_move(Vec2::new(5000.0, 5000.0), Vec2::new(400.0, 300.0));
        assert_eq!(frame.unwrap().anchor, Vec2::new(340.0, 240.0));
    }

    #[test]
    fn test_drag_replaces_items_while_menu_shown() {
        let mut c = controller(5);
        open_menu(&mut c, 0.0);

        c.pointer_down(PointerKind::Mouse, P, 600.0);
        let frame = c
            .pointer_move(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0))
            .unwrap();
        let menu = frame.menu.expect("open menu must track the drag");
        assert_eq!(menu.items.len(), 5);
        assert_eq!(menu.center, frame.anchor + Vec2::splat(30.0));
    }

    #[test]
    fn test_drag_with_menu_closed_carries_no_menu_frame() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Mouse, P, 0.0);
        let frame = c.pointer_move(Vec2::new(200.0, 200.0), Vec2::new(800.0, 600.0));
        assert!(frame.unwrap().menu.is_none());
        assert!(c.menu_frame().is_none());
    }

    #[test]
    fn test_toggle_mid_drag_cancels_the_session() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Mouse, P, 0.0);
        c.pointer_move(Vec2::new(300.0, 300.0), Vec2::new(800.0, 600.0));
        assert!(c.is_dragging());

        let toggle = c.toggle(50.0);
        assert!(matches!(toggle, Toggle::Opened(_)));
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_open_staggers_item_delays() {
        let mut c = controller(3);
        let Toggle::Opened(open) = c.toggle(1000.0) else {
            panic!("expected an open transition");
        };
        let delays: Vec<f32> = open.items.iter().map(|i| i.delay_s).collect();
        assert_eq!(delays, vec![0.0, 0.05, 0.1]);
        // 0.3s animation + 2 staggers
        assert!((open.settles_at_ms - 1400.0).abs() < 1e-3);
    }

    #[test]
    fn test_close_staggers_in_reverse_with_cleanups() {
        let mut c = controller(3);
        open_menu(&mut c, 0.0);
        let Toggle::Closed(close) = c.toggle(1000.0) else {
            panic!("expected a close transition");
        };
        let delays: Vec<f32> = close.items.iter().map(|i| i.delay_s).collect();
        assert_eq!(delays, vec![0.1, 0.05, 0.0]);

        // Each cleanup waits out the animation plus its delay plus slack
        assert!((close.items[0].cleanup_at_ms - 1450.0).abs() < 1e-3);
        assert!((close.items[2].cleanup_at_ms - 1350.0).abs() < 1e-3);
        assert!((close.settles_at_ms - 1450.0).abs() < 1e-3);
    }

    #[test]
    fn test_tick_settles_animated_phases() {
        let mut c = controller(5);
        open_menu(&mut c, 0.0); // settles at 500
        c.tick(499.0);
        assert_eq!(c.phase(), MenuPhase::Opening);
        c.tick(500.0);
        assert_eq!(c.phase(), MenuPhase::Open);

        c.toggle(600.0); // settles at 1150
        c.tick(1100.0);
        assert_eq!(c.phase(), MenuPhase::Closing);
        c.tick(1150.0);
        assert_eq!(c.phase(), MenuPhase::Closed);
    }

    #[test]
    fn test_stale_tick_after_interrupting_toggle_is_a_no_op() {
        let mut c = controller(5);
        open_menu(&mut c, 0.0); // would settle at 500
        c.toggle(100.0); // closing now settles at 650
        c.tick(500.0);
        assert_eq!(c.phase(), MenuPhase::Closing);
        c.tick(650.0);
        assert_eq!(c.phase(), MenuPhase::Closed);
    }

    #[test]
    fn test_outside_mouse_press_closes_the_menu() {
        let mut c = controller(5);
        open_menu(&mut c, 0.0);
        assert!(c.outside_press(PointerKind::Mouse, 100.0).is_some());
        assert_eq!(c.phase(), MenuPhase::Closing);
    }

    #[test]
    fn test_outside_press_while_closed_is_ignored() {
        let mut c = controller(5);
        assert!(c.outside_press(PointerKind::Mouse, 0.0).is_none());
        assert!(c.outside_press(PointerKind::Touch, 0.0).is_none());
    }

    #[test]
    fn test_outside_mouse_press_in_ghost_window_is_an_echo() {
        let mut c = controller(5);

        // Touch tap opens the menu and arms the ghost window
        c.pointer_down(PointerKind::Touch, P, 0.0);
        c.pointer_up(PointerKind::Touch, P, 10.0);
        assert!(c.click(15.0).is_some());

        assert!(c.outside_press(PointerKind::Mouse, 30.0).is_none());
        assert_eq!(c.phase(), MenuPhase::Opening);

        // After the window the same press closes
        assert!(c.outside_press(PointerKind::Mouse, 70.0).is_some());
    }

    #[test]
    fn test_outside_touch_press_closes_despite_ghost_window() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Touch, P, 0.0);
        c.pointer_up(PointerKind::Touch, P, 10.0);
        assert!(c.click(15.0).is_some());

        // A real finger outside is the close signal, not an echo
        assert!(c.outside_press(PointerKind::Touch, 30.0).is_some());
        assert_eq!(c.phase(), MenuPhase::Closing);
    }

    #[test]
    fn test_item_activation_closes_the_menu() {
        let mut c = controller(5);
        open_menu(&mut c, 0.0);
        assert!(c.item_activated(2, 100.0).is_some());
        assert_eq!(c.phase(), MenuPhase::Closing);

        // Activations with the menu closed do nothing
        assert!(c.item_activated(2, 200.0).is_none());
    }

    #[test]
    fn test_cancel_drag_skips_classification() {
        let mut c = controller(5);
        c.pointer_down(PointerKind::Touch, P, 0.0);
        assert!(c.cancel_drag());
        assert!(!c.cancel_drag());
        // No tap was classified, so no ghost window was armed
        assert_eq!(c.pointer_down(PointerKind::Mouse, P, 10.0), Press::Started);
    }

    #[test]
    fn test_zero_items_short_circuits() {
        let mut c = controller(0);
        let Toggle::Opened(open) = c.toggle(0.0) else {
            panic!("expected an open transition");
        };
        assert!(open.items.is_empty());
        let Toggle::Closed(close) = c.toggle(100.0) else {
            panic!("expected a close transition");
        };
        assert!(close.items.is_empty());
    }

    #[test]
    fn test_menu_frame_tracks_the_center() {
        let mut c = controller(5);
        assert!(c.menu_frame().is_none());
        open_menu(&mut c, 0.0);
        let frame = c.menu_frame().unwrap();
        assert_eq!(frame.center, c.center());
        assert_eq!(frame.items.len(), 5);
    }
}
