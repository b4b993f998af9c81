//! Input state machine
//!
//! Unifies mouse and touch presses into one drag lifecycle, classifies a
//! finished press as a tap or a drag by net displacement, and carries the
//! timed guards that paper over browser event quirks.

pub mod guards;
pub mod session;

pub use guards::TimedFlag;
pub use session::{DragSession, PointerKind, Release};
