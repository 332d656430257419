//! Scripted pointer gestures.

use nitepost_post_model::ElementId;
use serde::{Deserialize, Serialize};

use crate::capture::PointerCapture;
use crate::controller::{DownOutcome, DragController};
use crate::frame::FrameRect;
use crate::sink::PositionSink;

/// A recorded pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        element: ElementId,
        client_x: f64,
        client_y: f64,
    },
    Move {
        client_x: f64,
        client_y: f64,
    },
    Up,
}

/// Counts from a replayed gesture script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub updates: usize,
    pub ignored_downs: usize,
}

/// Feed `events` through `controller` against a fixed frame.
///
/// A gesture left open at the end of the script is cancelled so capture
/// never leaks past the replay.
pub fn replay<C: PointerCapture>(
    controller: &mut DragController<C>,
    frame: FrameRect,
    events: &[PointerEvent],
    sink: &mut dyn PositionSink,
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for event in events {
        summary.events += 1;
        match *event {
            PointerEvent::Down { element, .. } => {
                if controller.pointer_down(element, frame) != DownOutcome::Started {
                    summary.ignored_downs += 1;
                }
            }
            PointerEvent::Move { client_x, client_y } => {
                if controller.pointer_move(client_x, client_y, sink).is_some() {
                    summary.updates += 1;
                }
            }
            PointerEvent::Up => {
                controller.pointer_up();
            }
        }
    }
    controller.cancel();
    summary
}

/// Build a drag script moving `element` through percentage waypoints.
pub fn drag_script(element: ElementId, frame: &FrameRect, waypoints: &[(f64, f64)]) -> Vec<PointerEvent> {
    let start = frame.client_point(50.0, 50.0);
    let mut events = Vec::with_capacity(waypoints.len() + 2);
    events.push(PointerEvent::Down {
        element,
        client_x: start.0,
        client_y: start.1,
    });
    for (x, y) in waypoints {
        let (client_x, client_y) = frame.client_point(*x, *y);
        events.push(PointerEvent::Move { client_x, client_y });
    }
    events.push(PointerEvent::Up);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ListenerRegistry;

    #[test]
    fn test_pointer_event_json_shape() {
        let json = r#"[
            {"type":"down","element":"section-1","client_x":10,"client_y":20},
            {"type":"move","client_x":15.5,"client_y":20},
            {"type":"up"}
        ]"#;
        let events: Vec<PointerEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            PointerEvent::Down {
                element: ElementId::Section(1),
                ..
            }
        ));
    }

    #[test]
    fn test_open_gesture_is_closed_after_replay() {
        let frame = FrameRect::new(0.0, 0.0, 300.0, 300.0);
        let mut drag = DragController::new(ListenerRegistry::new());
        let events = [
            PointerEvent::Down {
                element: ElementId::Headline,
                client_x: 150.0,
                client_y: 150.0,
            },
            PointerEvent::Move {
                client_x: 30.0,
                client_y: 30.0,
            },
        ];
        let mut sink = |_: ElementId, _: nitepost_post_model::NormalizedPosition| {};
        let summary = replay(&mut drag, frame, &events, &mut sink);
        assert_eq!(summary.updates, 1);
        assert!(!drag.is_dragging());
        assert_eq!(drag.capture().active(), 0);
    }
}
