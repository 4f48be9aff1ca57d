//! Easing curves

/// Maps linear progress in `[0, 1]` to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    /// `sqrt(1 - (p - 1)^2)`: steep start, long tail
    #[default]
    QuarterCircleOut,
    CubicOut,
}

impl Easing {
    /// Apply the curve; input is clamped to `[0, 1]`
    pub fn apply(&self, progress: f32) -> f32 {
        let p = if progress.is_nan() {
            1.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self {
            Easing::Linear => p,
            Easing::QuarterCircleOut => {
                let t = p - 1.0;
                (1.0 - t * t).sqrt()
            }
            Easing::CubicOut => {
                let t = 1.0 - p;
                1.0 - t * t * t
            }
        }
    }
}
