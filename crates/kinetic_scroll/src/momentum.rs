//! Post-release deceleration
//!
//! Projects how far a flick carries the content at a constant deceleration.
//! When the projected stop lies past an edge the speed is scaled down so the
//! content stops a short overshoot beyond the edge, and a return time is
//! recorded for the rubber-band animation that brings it back.

/// Deceleration in px/ms²
pub const DECELERATION: f32 = 0.0006;

/// Result of a momentum projection
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Momentum {
    /// Signed travel distance, same sign as the input drag
    pub distance: f32,
    /// Duration of the deceleration, whole milliseconds
    pub duration_ms: f32,
    /// Duration of the return animation when the stop overshoots an edge
    pub return_time_ms: f32,
}

impl Momentum {
    pub const NONE: Momentum = Momentum {
        distance: 0.0,
        duration_ms: 0.0,
        return_time_ms: 0.0,
    };

    pub fn is_none(&self) -> bool {
        self.distance == 0.0
    }
}

/// Project a flick
///
/// * `dist` - signed drag distance since the last re-anchor (positive toward
///   the top/left edge)
/// * `time` - elapsed drag time in ms
/// * `max_dist_upper` - room before the top/left edge
/// * `max_dist_lower` - room before the bottom/right edge
/// * `size` - overshoot budget (viewport length when bouncing, else 0)
/// * `divisor` - overshoot divisor, 6 by default or 30 for a tight feel
pub fn momentum(
    dist: f32,
    time: f32,
    max_dist_upper: f32,
    max_dist_lower: f32,
    size: f32,
    divisor: f32,
) -> Momentum {
    if dist == 0.0 || !dist.is_finite() || !time.is_finite() || time <= 0.0 {
        return Momentum::NONE;
    }

    let mut speed = dist.abs() / time;
    let mut new_dist = (speed * speed) / (2.0 * DECELERATION);
    let mut return_time = 0.0;

    let limit = if dist > 0.0 {
        max_dist_upper
    } else {
        max_dist_lower
    };

    if new_dist > limit {
        let outside = if size > 0.0 && divisor > 0.0 {
            size / (divisor / (new_dist / speed * DECELERATION))
        } else {
            0.0
        };
        let allowed = (limit + outside).max(0.0);
        speed = speed * allowed / new_dist;
        new_dist = allowed;
        if size > 0.0 {
            return_time = 800.0 / size * outside + 100.0;
        }
    }

    if new_dist == 0.0 {
        return Momentum::NONE;
    }

    Momentum {
        distance: new_dist * dist.signum(),
        duration_ms: (speed / DECELERATION).round(),
        return_time_ms: return_time,
    }
}
