//! Time sources
//!
//! The engine never reads the system time directly; views receive a clock
//! through their context so tests and simulations can drive time by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Shared clock handle (the engine is single-threaded)
pub type SharedClock = Rc<dyn Clock>;

/// Monotonic wall clock, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) -> f64 {
        let now = self.now.get() + delta_ms;
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
