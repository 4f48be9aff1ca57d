//! Kinetic Animation System
//!
//! Time-based primitives driving the scroll engine.
//!
//! # Features
//!
//! - **Easing**: the quarter-circle ease-out used for momentum and snapping
//! - **Animation Plans**: a single from→to transition sampled against a clock
//! - **Animator**: a step queue with at most one active plan, cancelled synchronously
//! - **Timers**: deadline-ordered callbacks addressed by cancellable handles
//! - **Clocks**: monotonic wall clock and a manual clock for deterministic tests

pub mod animator;
pub mod clock;
pub mod easing;
pub mod plan;
pub mod timer;

pub use animator::{Animator, Step};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use easing::Easing;
pub use plan::{AnimationPlan, PlanSample};
pub use timer::{TimerId, TimerQueue};
