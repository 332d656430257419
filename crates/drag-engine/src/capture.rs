//! Global pointer capture.
//!
//! While a drag is active, move/up listeners are registered globally so the
//! gesture keeps tracking outside the element. Attach and detach must stay
//! symmetric per gesture or listeners accumulate across drags.

use std::cell::RefCell;
use std::rc::Rc;

/// Proof that listeners are attached. Consumed by [`PointerCapture::detach`].
#[derive(Debug, PartialEq, Eq)]
pub struct CaptureToken(u64);

impl CaptureToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host hook that attaches and detaches global move/up listeners.
pub trait PointerCapture {
    /// Attach global listeners for a new gesture.
    fn attach(&mut self) -> CaptureToken;

    /// Detach the listeners registered under `token`.
    fn detach(&mut self, token: CaptureToken);

    /// Number of listener sets currently attached.
    fn active(&self) -> usize;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// In-process listener bookkeeping used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: Vec<u64>,
    attached_total: u64,
    detached_total: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total attach calls over the registry's lifetime.
    pub fn attached_total(&self) -> u64 {
        self.attached_total
    }

    /// Total detach calls over the registry's lifetime.
    pub fn detached_total(&self) -> u64 {
        self.detached_total
    }
}

impl PointerCapture for ListenerRegistry {
    fn attach(&mut self) -> CaptureToken {
        self.next_id += 1;
        self.attached_total += 1;
        self.active.push(self.next_id);
        CaptureToken(self.next_id)
    }

    fn detach(&mut self, token: CaptureToken) {
        match self.active.iter().position(|id| *id == token.0) {
            Some(index) => {
                self.active.swap_remove(index);
                self.detached_total += 1;
            }
            None => tracing::warn!(token = token.0, "Detach for unknown capture token"),
        }
    }

    fn active(&self) -> usize {
        self.active.len()
    }

    fn name(&self) -> &str {
        "listener-registry"
    }
}

/// Shared capture, so a host can observe listeners after the controller is gone.
impl<C: PointerCapture> PointerCapture for Rc<RefCell<C>> {
    fn attach(&mut self) -> CaptureToken {
        self.borrow_mut().attach()
    }

    fn detach(&mut self, token: CaptureToken) {
        self.borrow_mut().detach(token)
    }

    fn active(&self) -> usize {
        self.borrow().active()
    }

    fn name(&self) -> &str {
        "shared"
    }
}
