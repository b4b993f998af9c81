//! Timed one-bit guards
//!
//! Both browser quirks this widget papers over are "ignore X for the next
//! few milliseconds" rules: the ghost mouse events platforms synthesize
//! after a touch tap, and the click fired after every mouse-up even when
//! the gesture was a drag. A `TimedFlag` is that rule with the clock
//! injected: arming stores a deadline, and the flag reads as set until the
//! deadline passes. Re-arming moves the deadline, so overlapping windows
//! need no cancellation.

/// A boolean that arms for a fixed window and decays on its own
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedFlag {
    deadline_ms: f64,
}

impl TimedFlag {
    /// Set the flag for `window_ms` starting at `now_ms`
    pub fn arm(&mut self, now_ms: f64, window_ms: f64) {
        self.deadline_ms = now_ms + window_ms;
    }

    /// Clear the flag immediately
    pub fn disarm(&mut self) {
        self.deadline_ms = 0.0;
    }

    /// Whether the window is still open at `now_ms`
    pub fn active(&self, now_ms: f64) -> bool {
        now_ms < self.deadline_ms
    }
}
