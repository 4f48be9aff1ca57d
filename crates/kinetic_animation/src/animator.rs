//! Step queue with a single active plan
//!
//! Chained `scroll_to` calls queue up as steps; only one plan runs at a time
//! and a new one can only start after the previous finished or was cancelled.

use std::collections::VecDeque;

use kinetic_core::Point;

use crate::easing::Easing;
use crate::plan::{AnimationPlan, PlanSample};

/// A queued destination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub to: Point,
    pub duration_ms: f64,
}

impl Step {
    pub fn new(to: Point, duration_ms: f64) -> Self {
        Self { to, duration_ms }
    }
}

/// Owns the queued steps and the one active plan
#[derive(Debug, Default)]
pub struct Animator {
    queue: VecDeque<Step>,
    active: Option<AnimationPlan>,
    easing: Easing,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self {
            easing,
            ..Default::default()
        }
    }

    /// Append a step
    pub fn push(&mut self, step: Step) {
        self.queue.push_back(step);
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn active(&self) -> Option<&AnimationPlan> {
        self.active.as_ref()
    }

    /// Start the next queued step from `from`
    ///
    /// Returns `None` if a plan is already running or the queue is empty.
    /// A step whose destination equals `from` gets a zero duration.
    pub fn start_next(&mut self, from: Point, now_ms: f64) -> Option<AnimationPlan> {
        if self.active.is_some() {
            return None;
        }
        let step = self.queue.pop_front()?;
        let duration = if step.to == from { 0.0 } else { step.duration_ms };
        let plan = AnimationPlan::new(from, step.to, duration, now_ms).with_easing(self.easing);
        tracing::trace!(?from, to = ?plan.to, duration, "animation step started");
        self.active = Some(plan);
        Some(plan)
    }

    /// Sample the active plan, retiring it once finished
    pub fn sample(&mut self, now_ms: f64) -> Option<PlanSample> {
        let sample = self.active.as_ref()?.sample(now_ms);
        if sample.finished {
            self.active = None;
        }
        Some(sample)
    }

    /// Retire the active plan without sampling (transition-end path)
    pub fn finish(&mut self) -> Option<AnimationPlan> {
        self.active.take()
    }

    /// Drop the active plan and every queued step
    ///
    /// Returns true if anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        let had_work = self.active.is_some() || !self.queue.is_empty();
        self.active = None;
        self.queue.clear();
        had_work
    }
}
