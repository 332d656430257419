//! Drag state machine.

use nitepost_post_model::{ElementId, NormalizedPosition};

use crate::capture::{CaptureToken, PointerCapture};
use crate::frame::{pointer_to_position, FrameRect};
use crate::sink::PositionSink;

/// An in-progress gesture.
#[derive(Debug)]
pub struct ActiveDrag {
    pub element: ElementId,
    pub frame: FrameRect,
    token: CaptureToken,
}

/// Drag state. At most one element is dragged at a time.
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragStats {
    pub gestures: u64,
    pub updates: u64,
    pub skipped: u64,
}

/// Result of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownOutcome {
    Started,
    /// Another element already owns the gesture.
    Busy(ElementId),
    /// The element cannot be dragged.
    NotDraggable,
}

/// Maps pointer gestures onto normalized element positions.
///
/// Global listeners are attached on pointer-down and detached on pointer-up,
/// [`cancel`](Self::cancel), or when the controller is dropped mid-drag.
pub struct DragController<C: PointerCapture> {
    capture: C,
    state: DragState,
    stats: DragStats,
}

impl<C: PointerCapture> DragController<C> {
    pub fn new(capture: C) -> Self {
        Self {
            capture,
            state: DragState::Idle,
            stats: DragStats::default(),
        }
    }

    /// Begin dragging `element` relative to `frame`.
    pub fn pointer_down(&mut self, element: ElementId, frame: FrameRect) -> DownOutcome {
        if !element.is_draggable() {
            tracing::debug!(%element, "Ignoring pointer-down on fixed element");
            return DownOutcome::NotDraggable;
        }
        if let DragState::Dragging(active) = &self.state {
            tracing::debug!(
                active = %active.element,
                requested = %element,
                "Drag already in progress"
            );
            return DownOutcome::Busy(active.element);
        }

        let token = self.capture.attach();
        tracing::debug!(
            %element,
            capture = %self.capture.name(),
            token = token.id(),
            "Drag started"
        );
        self.state = DragState::Dragging(ActiveDrag {
            element,
            frame,
            token,
        });
        self.stats.gestures += 1;
        DownOutcome::Started
    }

    /// Replace the reference frame of the active gesture (e.g. after layout).
    pub fn update_frame(&mut self, frame: FrameRect) {
        if let DragState::Dragging(active) = &mut self.state {
            active.frame = frame;
        }
    }

    /// Apply a pointer move to the active element.
    ///
    /// Emits exactly one sink call per move that maps to a position. Moves
    /// while idle, or against a frame without size, are skipped.
    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        sink: &mut dyn PositionSink,
    ) -> Option<NormalizedPosition> {
        let DragState::Dragging(active) = &self.state else {
            return None;
        };
        match pointer_to_position(&active.frame, client_x, client_y) {
            Some(position) => {
                sink.position_changed(active.element, position);
                self.stats.updates += 1;
                Some(position)
            }
            None => {
                tracing::trace!(
                    element = %active.element,
                    client_x,
                    client_y,
                    width = active.frame.width,
                    height = active.frame.height,
                    "Skipping drag update"
                );
                self.stats.skipped += 1;
                None
            }
        }
    }

    /// End the gesture. Returns the element that was being dragged.
    pub fn pointer_up(&mut self) -> Option<ElementId> {
        let element = self.release();
        if let Some(element) = element {
            tracing::debug!(%element, "Drag finished");
        }
        element
    }

    /// Abort the gesture without a final pointer-up.
    pub fn cancel(&mut self) -> Option<ElementId> {
        let element = self.release();
        if let Some(element) = element {
            tracing::debug!(%element, "Drag cancelled");
        }
        element
    }

    fn release(&mut self) -> Option<ElementId> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Dragging(active) => {
                self.capture.detach(active.token);
                Some(active.element)
            }
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Element owning the current gesture, if any.
    pub fn active_element(&self) -> Option<ElementId> {
        match &self.state {
            DragState::Dragging(active) => Some(active.element),
            DragState::Idle => None,
        }
    }

    pub fn stats(&self) -> DragStats {
        self.stats
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }
}

impl<C: PointerCapture> Drop for DragController<C> {
    fn drop(&mut self) {
        if let Some(element) = self.release() {
            tracing::debug!(%element, "Released capture on drop");
        }
    }
}

impl<C: PointerCapture> std::fmt::Debug for DragController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragController")
            .field("capture", &self.capture.name())
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ListenerRegistry;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn frame() -> FrameRect {
        FrameRect::new(0.0, 0.0, 400.0, 400.0)
    }

    #[test]
    fn test_move_emits_once_per_event() {
        let mut drag = DragController::new(ListenerRegistry::new());
        let mut seen = Vec::new();
        let mut sink = |element: ElementId, position: NormalizedPosition| {
            seen.push((element, position));
        };

        assert_eq!(drag.pointer_down(ElementId::Headline, frame()), DownOutcome::Started);
        drag.pointer_move(100.0, 100.0, &mut sink);
        drag.pointer_move(120.0, 100.0, &mut sink);
        drag.pointer_move(120.0, 100.0, &mut sink);
        drag.pointer_up();

        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|(e, _)| *e == ElementId::Headline));
        assert_eq!(drag.stats().updates, 3);
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut drag = DragController::new(ListenerRegistry::new());
        drag.pointer_down(ElementId::Headline, frame());
        assert_eq!(
            drag.pointer_down(ElementId::Section(0), frame()),
            DownOutcome::Busy(ElementId::Headline)
        );
        assert_eq!(drag.capture().active(), 1);
        assert_eq!(drag.active_element(), Some(ElementId::Headline));
    }

    #[test]
    fn test_logo_is_not_draggable() {
        let mut drag = DragController::new(ListenerRegistry::new());
        assert_eq!(drag.pointer_down(ElementId::Logo, frame()), DownOutcome::NotDraggable);
        assert!(!drag.is_dragging());
        assert_eq!(drag.capture().attached_total(), 0);
    }

    #[test]
    fn test_moves_while_idle_do_nothing() {
        let mut drag = DragController::new(ListenerRegistry::new());
        let mut calls = 0;
        let mut sink = |_: ElementId, _: NormalizedPosition| calls += 1;
        assert!(drag.pointer_move(10.0, 10.0, &mut sink).is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_unlaid_frame_skips_until_updated() {
        let mut drag = DragController::new(ListenerRegistry::new());
        let mut calls = 0;
        let mut sink = |_: ElementId, _: NormalizedPosition| calls += 1;
        drag.pointer_down(ElementId::Headline, FrameRect::new(0.0, 0.0, 0.0, 0.0));
        assert!(drag.pointer_move(10.0, 10.0, &mut sink).is_none());
        drag.update_frame(frame());
        assert!(drag.pointer_move(200.0, 200.0, &mut sink).is_some());
        assert_eq!(calls, 1);
        assert_eq!(drag.stats().skipped, 1);
    }

    #[test]
    fn test_drop_releases_capture() {
        let registry = Rc::new(RefCell::new(ListenerRegistry::new()));
        {
            let mut drag = DragController::new(registry.clone());
            drag.pointer_down(ElementId::Headline, frame());
            assert_eq!(registry.borrow().active(), 1);
        }
        assert_eq!(registry.borrow().active(), 0);
        assert_eq!(registry.borrow().detached_total(), 1);
    }

    #[test]
    fn test_cancel_releases_capture() {
        let mut drag = DragController::new(ListenerRegistry::new());
        drag.pointer_down(ElementId::Section(1), frame());
        assert_eq!(drag.cancel(), Some(ElementId::Section(1)));
        assert_eq!(drag.capture().active(), 0);
        assert_eq!(drag.cancel(), None);
    }
}
