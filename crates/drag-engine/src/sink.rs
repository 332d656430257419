//! Position-change callbacks.

use nitepost_post_model::{ElementId, NormalizedPosition, PostContent};

/// Receives position updates produced by a drag.
pub trait PositionSink {
    fn position_changed(&mut self, element: ElementId, position: NormalizedPosition);
}

impl<F> PositionSink for F
where
    F: FnMut(ElementId, NormalizedPosition),
{
    fn position_changed(&mut self, element: ElementId, position: NormalizedPosition) {
        self(element, position)
    }
}

/// Writes drag updates straight into a [`PostContent`].
pub struct ContentSink<'a> {
    content: &'a mut PostContent,
    applied: usize,
}

impl<'a> ContentSink<'a> {
    pub fn new(content: &'a mut PostContent) -> Self {
        Self {
            content,
            applied: 0,
        }
    }

    /// Number of updates that landed in the content.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl PositionSink for ContentSink<'_> {
    fn position_changed(&mut self, element: ElementId, position: NormalizedPosition) {
        match self.content.set_position(element, position) {
            Ok(()) => self.applied += 1,
            Err(e) => tracing::warn!(%element, error = %e, "Dropping drag update"),
        }
    }
}
