//! Explicit runtime context for scroll views

use std::rc::Rc;

use kinetic_animation::{SharedClock, SystemClock};

/// Services a scroll view borrows from its host
///
/// Passed to [`ScrollView::new`](crate::ScrollView::new) instead of being
/// looked up globally, so several views can share one clock and tests can
/// swap in a [`ManualClock`](kinetic_animation::ManualClock).
#[derive(Clone)]
pub struct ScrollContext {
    clock: SharedClock,
}

impl ScrollContext {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Context backed by the monotonic system clock
    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock::new()))
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }
}

impl Default for ScrollContext {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for ScrollContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollContext")
            .field("now_ms", &self.now_ms())
            .finish()
    }
}
