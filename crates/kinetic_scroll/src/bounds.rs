//! Scrollable boundaries
//!
//! Offsets follow the translate convention: `min_offset` is the resting
//! position at the top/left edge (0, or `-top_offset` vertically) and
//! `max_offset` is the negative offset at the bottom/right edge. A valid
//! resting offset lies in `[max_offset, min_offset]`.

use kinetic_core::{Axis, Point, Size};

use crate::config::ScrollOptions;

/// Limits along one axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Boundary {
    /// Top/left edge offset
    pub min_offset: f32,
    /// Bottom/right edge offset (never greater than `min_offset`)
    pub max_offset: f32,
}

impl Boundary {
    pub fn new(min_offset: f32, max_offset: f32) -> Self {
        Self {
            min_offset,
            max_offset: max_offset.min(min_offset),
        }
    }

    /// True when there is room to scroll
    pub fn is_scrollable(&self) -> bool {
        self.max_offset < self.min_offset
    }

    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(self.max_offset, self.min_offset)
    }

    pub fn contains(&self, offset: f32) -> bool {
        offset <= self.min_offset && offset >= self.max_offset
    }

    /// Signed distance past the nearest edge (positive past the top/left)
    pub fn overshoot(&self, offset: f32) -> f32 {
        if offset > self.min_offset {
            offset - self.min_offset
        } else if offset < self.max_offset {
            offset - self.max_offset
        } else {
            0.0
        }
    }

    /// Length of the scrollable range
    pub fn extent(&self) -> f32 {
        self.min_offset - self.max_offset
    }
}

/// Boundaries and scroll availability for both axes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollBounds {
    pub x: Boundary,
    pub y: Boundary,
    pub h_scroll: bool,
    pub v_scroll: bool,
    /// Viewport size (at least 1x1)
    pub viewport: Size,
    /// Content size after scaling
    pub scroller: Size,
}

impl ScrollBounds {
    /// Derive boundaries from viewport and (unscaled) content geometry
    pub fn compute(viewport: Size, content: Size, scale: f32, options: &ScrollOptions) -> Self {
        let viewport = viewport.at_least_one();
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let content = Size::new(
            if content.width.is_finite() { content.width.max(0.0) } else { 0.0 },
            if content.height.is_finite() { content.height.max(0.0) } else { 0.0 },
        );

        let min_scroll_y = -options.top_offset;
        let scroller = Size::new(
            (content.width * scale).round(),
            ((content.height + min_scroll_y) * scale).round(),
        );
        let max_scroll_x = viewport.width - scroller.width;
        let max_scroll_y = viewport.height - scroller.height + min_scroll_y;

        let h_scroll = options.h_scroll && max_scroll_x < 0.0;
        let v_scroll = options.v_scroll
            && ((!options.bounce_lock && !h_scroll) || scroller.height > viewport.height);

        Self {
            x: Boundary::new(0.0, max_scroll_x),
            y: Boundary::new(min_scroll_y, max_scroll_y),
            h_scroll,
            v_scroll,
            viewport,
            scroller,
        }
    }

    pub fn axis(&self, axis: Axis) -> &Boundary {
        match axis {
            Axis::Horizontal => &self.x,
            Axis::Vertical => &self.y,
        }
    }

    /// Whether dragging moves content along `axis`
    pub fn scrolls(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.h_scroll,
            Axis::Vertical => self.v_scroll,
        }
    }

    pub fn clamp(&self, offset: Point) -> Point {
        Point::new(self.x.clamp(offset.x), self.y.clamp(offset.y))
    }

    pub fn contains(&self, offset: Point) -> bool {
        self.x.contains(offset.x) && self.y.contains(offset.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_basic() {
        let b = Boundary::new(0.0, -600.0);
        assert!(b.is_scrollable());
        assert_eq!(b.clamp(50.0), 0.0);
        assert_eq!(b.clamp(-700.0), -600.0);
        assert_eq!(b.overshoot(30.0), 30.0);
        assert_eq!(b.overshoot(-650.0), -50.0);
        assert_eq!(b.overshoot(-300.0), 0.0);
        assert_eq!(b.extent(), 600.0);
    }

    #[test]
    fn test_small_content_cannot_scroll() {
        let b = Boundary::new(0.0, 120.0);
        assert_eq!(b.max_offset, 0.0);
        assert!(!b.is_scrollable());
        assert_eq!(b.clamp(-10.0), 0.0);
    }

    #[test]
    fn test_compute_horizontal_pager() {
        let options = ScrollOptions::default();
        let bounds = ScrollBounds::compute(
            Size::new(320.0, 480.0),
            Size::new(960.0, 480.0),
            1.0,
            &options,
        );

        assert!(bounds.h_scroll);
        assert_eq!(bounds.x.max_offset, -640.0);
        assert_eq!(bounds.y.max_offset, 0.0);
        // Vertical stays enabled without bounce_lock but has no range
        assert!(bounds.v_scroll);
        assert!(!bounds.y.is_scrollable());
    }

    #[test]
    fn test_bounce_lock_disables_short_vertical() {
        let options = ScrollOptions {
            bounce_lock: true,
            ..Default::default()
        };
        let bounds = ScrollBounds::compute(
            Size::new(320.0, 480.0),
            Size::new(960.0, 480.0),
            1.0,
            &options,
        );
        assert!(!bounds.v_scroll);
    }

    #[test]
    fn test_scale_and_top_offset() {
        let options = ScrollOptions {
            top_offset: 40.0,
            ..Default::default()
        };
        let bounds = ScrollBounds::compute(
            Size::new(100.0, 100.0),
            Size::new(100.0, 240.0),
            2.0,
            &options,
        );

        assert_eq!(bounds.scroller, Size::new(200.0, 400.0));
        assert_eq!(bounds.x.max_offset, -100.0);
        assert_eq!(bounds.y.min_offset, -40.0);
        assert_eq!(bounds.y.max_offset, 100.0 - 400.0 - 40.0);
    }

    #[test]
    fn test_zero_viewport_is_clamped() {
        let bounds = ScrollBounds::compute(
            Size::ZERO,
            Size::new(10.0, 10.0),
            1.0,
            &ScrollOptions::default(),
        );
        assert_eq!(bounds.viewport, Size::new(1.0, 1.0));
        assert_eq!(bounds.x.max_offset, -9.0);
    }
}
