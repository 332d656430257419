//! NitePost Drag Engine
//!
//! Converts pointer gestures on the rendered canvas into clamped,
//! percentage-based element positions. A gesture is a small state machine:
//!
//! - **Idle:** no listeners attached.
//! - **Dragging:** one element owns the gesture; global move/up listeners
//!   are attached through a [`PointerCapture`] host hook.
//!
//! Position updates go to a [`PositionSink`], either a closure or a
//! [`ContentSink`] writing into a `PostContent`.

pub mod capture;
pub mod controller;
pub mod frame;
pub mod gesture;
pub mod sink;

pub use capture::{CaptureToken, ListenerRegistry, PointerCapture};
pub use controller::{ActiveDrag, DownOutcome, DragController, DragState, DragStats};
pub use frame::{pointer_to_position, FrameRect};
pub use gesture::{drag_script, replay, PointerEvent, ReplaySummary};
pub use sink::{ContentSink, PositionSink};
