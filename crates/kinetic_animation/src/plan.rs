//! Timed from→to transitions

use kinetic_core::Point;

use crate::easing::Easing;

/// A scheduled transition from one offset to another
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationPlan {
    pub from: Point,
    pub to: Point,
    pub duration_ms: f64,
    pub start_ms: f64,
    pub easing: Easing,
}

/// Result of sampling a plan
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanSample {
    pub position: Point,
    /// Linear progress in `[0, 1]`
    pub progress: f32,
    pub finished: bool,
}

impl AnimationPlan {
    pub fn new(from: Point, to: Point, duration_ms: f64, start_ms: f64) -> Self {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            from,
            to,
            duration_ms,
            start_ms,
            easing: Easing::QuarterCircleOut,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Time at which the plan completes
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// True when the plan would complete without any intermediate frame
    pub fn is_instant(&self) -> bool {
        self.duration_ms <= 0.0 || self.from == self.to
    }

    /// Position at `now_ms`; exactly `to` once the duration has elapsed
    pub fn sample(&self, now_ms: f64) -> PlanSample {
        if self.is_instant() || now_ms >= self.end_ms() {
            return PlanSample {
                position: self.to,
                progress: 1.0,
                finished: true,
            };
        }

        let progress = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32;
        let eased = self.easing.apply(progress);
        PlanSample {
            position: self.from + (self.to - self.from) * eased,
            progress,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_reaches_destination_exactly() {
        let plan = AnimationPlan::new(Point::ZERO, Point::new(-300.0, -17.3), 400.0, 1000.0);

        let mid = plan.sample(1200.0);
        assert!(!mid.finished);
        assert!(mid.position.x < 0.0 && mid.position.x > -300.0);

        let end = plan.sample(1400.0);
        assert!(end.finished);
        assert_eq!(end.position, Point::new(-300.0, -17.3));

        let late = plan.sample(5000.0);
        assert_eq!(late.position, plan.to);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let plan = AnimationPlan::new(Point::ZERO, Point::new(10.0, 10.0), 0.0, 0.0);
        assert!(plan.is_instant());
        assert!(plan.sample(0.0).finished);

        let nan = AnimationPlan::new(Point::ZERO, Point::new(10.0, 10.0), f64::NAN, 0.0);
        assert_eq!(nan.duration_ms, 0.0);
    }

    #[test]
    fn test_before_start_stays_at_origin() {
        let plan = AnimationPlan::new(Point::new(5.0, 5.0), Point::ZERO, 100.0, 50.0);
        let s = plan.sample(10.0);
        assert_eq!(s.progress, 0.0);
        assert_eq!(s.position, Point::new(5.0, 5.0));
    }
}
