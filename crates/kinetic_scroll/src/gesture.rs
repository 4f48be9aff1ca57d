//! Gesture tracking
//!
//! The tracker turns a pointer-down / move / up sequence into offset updates
//! while dragging and a [`Release`] decision once the pointer lifts. It never
//! writes to the surface; the view applies what it returns.
//!
//! Drag rules:
//!
//! - Nothing moves until either cumulative distance reaches 6px.
//! - Once one axis leads the other by more than 5px the gesture locks to it
//!   until the pointer lifts.
//! - Past an edge the delta is halved when bouncing, otherwise clamped.
//! - The velocity anchor is reset whenever more than 300ms have passed since
//!   the previous anchor, so only the tail of a slow drag feeds momentum.

use kinetic_core::{Axis, Point};

use crate::bounds::{Boundary, ScrollBounds};
use crate::config::ScrollOptions;
use crate::momentum::{momentum, Momentum};
use crate::pages::Pages;
use crate::snap;

/// Distance a pointer must travel before a drag starts
pub const MOVE_THRESHOLD: f32 = 6.0;

/// Lead one axis needs over the other to lock the drag to it
pub const LOCK_MARGIN: f32 = 5.0;

/// Age after which the velocity anchor is moved up
pub const REANCHOR_MS: f64 = 300.0;

/// Releases within this time of the last anchor count as a flick
pub const MOMENTUM_WINDOW_MS: f64 = 300.0;

/// Shortest momentum animation
pub const MIN_MOMENTUM_MS: f32 = 10.0;

/// Duration of a return to the gesture start below the snap threshold
pub const SNAP_RETURN_MS: f32 = 200.0;

/// Duration of the settle when a drag ends without momentum
pub const SETTLE_MS: f32 = 200.0;

// ============================================================================
// Contexts & Results
// ============================================================================

/// View state a drag move is evaluated against
#[derive(Clone, Copy, Debug)]
pub struct MoveContext<'a> {
    pub offset: Point,
    pub bounds: &'a ScrollBounds,
    pub bounce: bool,
    pub lock_direction: bool,
}

/// View state a pinch move is evaluated against
#[derive(Clone, Copy, Debug)]
pub struct PinchContext {
    pub offset: Point,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub bounce: bool,
}

/// View state a release is resolved against
#[derive(Clone, Copy, Debug)]
pub struct ReleaseContext<'a> {
    pub offset: Point,
    pub bounds: &'a ScrollBounds,
    pub pages: &'a Pages,
    pub options: &'a ScrollOptions,
}

/// Live pinch output
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchUpdate {
    /// Offset that keeps the pinch origin fixed at `scale`
    pub offset: Point,
    pub scale: f32,
    /// Rotation of the pointer pair since the pinch started, in degrees
    pub rotation: f32,
}

/// What to do once the pointer lifts
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    /// The pointer never crossed the move threshold
    Tap { position: Point },
    /// A pinch finished at a clamped scale
    Zoom { scale: f32, offset: Point },
    /// Animate to `to`
    ScrollTo {
        to: Point,
        duration_ms: f32,
        /// Rubber-band time to use if the destination overshoots an edge
        return_time_ms: f32,
        /// Page the animation settles on, when snapping
        page: Option<(usize, usize)>,
    },
    /// Nothing to animate; bring the offset back into bounds
    Settle { duration_ms: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pinch {
    start_distance: f32,
    start_angle: f32,
    /// Pinch midpoint relative to the content's top-left corner
    origin: Point,
    start_scale: f32,
    scale: f32,
    rotation: f32,
}

// ============================================================================
// GestureTracker
// ============================================================================

/// Per-gesture drag and pinch bookkeeping
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    active: bool,
    moved: bool,
    last_point: Point,
    /// Offset and time of the velocity anchor
    anchor: Point,
    anchor_ms: f64,
    /// Offset when the pointer went down
    abs_start: Point,
    dist: Point,
    dir: (i8, i8),
    lock: Option<Axis>,
    start_page: (usize, usize),
    pinch: Option<Pinch>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for a new gesture, discarding everything from the previous one
    pub fn begin(&mut self, point: Point, offset: Point, time_ms: f64, start_page: (usize, usize)) {
        *self = Self {
            active: true,
            last_point: point,
            anchor: offset,
            anchor_ms: time_ms,
            abs_start: offset,
            start_page,
            ..Self::default()
        };
    }

    /// Switch the current gesture into pinch mode
    ///
    /// `viewport_origin` is the viewport's top-left corner in the same space
    /// as the pointer positions.
    pub fn begin_pinch(
        &mut self,
        a: Point,
        b: Point,
        viewport_origin: Point,
        offset: Point,
        scale: f32,
    ) {
        self.active = true;
        self.pinch = Some(Pinch {
            start_distance: a.distance(b).max(1.0),
            start_angle: a.angle_to(b),
            origin: a.midpoint(b) - viewport_origin - offset,
            start_scale: scale,
            scale,
            rotation: 0.0,
        });
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// True once the drag crossed the move threshold
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Sign of the last applied delta per axis (+1 when the offset grew)
    pub fn direction(&self) -> (i8, i8) {
        self.dir
    }

    /// Axis the drag is locked to, if any
    pub fn lock(&self) -> Option<Axis> {
        self.lock
    }

    pub fn last_point(&self) -> Point {
        self.last_point
    }

    /// Live scale while pinching
    pub fn pinch_scale(&self) -> Option<f32> {
        self.pinch.map(|p| p.scale)
    }

    /// Drop the gesture without resolving it
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed a single-pointer move
    ///
    /// Returns the new offset once the drag is under way, `None` while below
    /// the move threshold or when no gesture is armed.
    pub fn track_move(
        &mut self,
        point: Point,
        time_ms: f64,
        ctx: &MoveContext<'_>,
    ) -> Option<Point> {
        if !self.active || self.pinch.is_some() {
            return None;
        }

        let mut delta = point - self.last_point;
        self.last_point = point;

        if !ctx.bounds.h_scroll {
            delta.x = 0.0;
        }
        if !ctx.bounds.v_scroll {
            delta.y = 0.0;
        }
        if let Some(axis) = self.lock {
            delta.set(axis.cross(), 0.0);
        }

        let mut next = Point::new(
            damp(ctx.offset.x, delta.x, &ctx.bounds.x, ctx.bounce),
            damp(ctx.offset.y, delta.y, &ctx.bounds.y, ctx.bounce),
        );

        self.dist = self.dist + delta;
        let abs_x = self.dist.x.abs();
        let abs_y = self.dist.y.abs();
        if abs_x < MOVE_THRESHOLD && abs_y < MOVE_THRESHOLD {
            return None;
        }

        if ctx.lock_direction && self.lock.is_none() {
            if abs_x > abs_y + LOCK_MARGIN {
                self.lock = Some(Axis::Horizontal);
            } else if abs_y > abs_x + LOCK_MARGIN {
                self.lock = Some(Axis::Vertical);
            }
            if let Some(axis) = self.lock {
                tracing::trace!(?axis, "drag direction locked");
                let cross = axis.cross();
                next.set(cross, ctx.offset.get(cross));
                delta.set(cross, 0.0);
            }
        }

        self.moved = true;
        self.dir = (signum(delta.x), signum(delta.y));

        if time_ms - self.anchor_ms > REANCHOR_MS {
            self.anchor = next;
            self.anchor_ms = time_ms;
        }

        Some(next)
    }

    /// Feed a two-pointer move while pinching
    pub fn pinch_move(&mut self, a: Point, b: Point, ctx: &PinchContext) -> Option<PinchUpdate> {
        let pinch = self.pinch.as_mut()?;

        let raw = a.distance(b) / pinch.start_distance * pinch.start_scale;
        let scale = if ctx.bounce {
            elastic_scale(raw, ctx.zoom_min, ctx.zoom_max)
        } else {
            raw.clamp(ctx.zoom_min, ctx.zoom_max)
        };
        if !scale.is_finite() {
            return None;
        }

        pinch.scale = scale;
        pinch.rotation = a.angle_to(b) - pinch.start_angle;

        let relative = scale / pinch.start_scale;
        Some(PinchUpdate {
            offset: pinch.origin - pinch.origin * relative + ctx.offset,
            scale,
            rotation: pinch.rotation,
        })
    }

    /// Resolve the gesture once the last pointer lifts
    pub fn release(&mut self, time_ms: f64, ctx: &ReleaseContext<'_>) -> Release {
        self.active = false;
        let options = ctx.options;

        if let Some(pinch) = self.pinch.take() {
            let scale = pinch.scale.clamp(options.zoom_min, options.zoom_max);
            let relative = scale / pinch.start_scale;
            return Release::Zoom {
                scale,
                offset: pinch.origin - pinch.origin * relative + ctx.offset,
            };
        }

        if !self.moved {
            return Release::Tap {
                position: self.last_point,
            };
        }

        let offset = ctx.offset;
        let bounds = ctx.bounds;
        let elapsed = time_ms - self.anchor_ms;
        let snapping =
            options.snap.is_enabled() && !(ctx.pages.x.is_empty() && ctx.pages.y.is_empty());

        let mut dest = offset;
        let mut mx = Momentum::NONE;
        let mut my = Momentum::NONE;

        if options.momentum && elapsed < MOMENTUM_WINDOW_MS {
            let elapsed = elapsed as f32;
            if bounds.h_scroll {
                mx = momentum(
                    offset.x - self.anchor.x,
                    elapsed,
                    bounds.x.min_offset - offset.x,
                    offset.x - bounds.x.max_offset,
                    if options.bounce { bounds.viewport.width } else { 0.0 },
                    options.overshoot_divisor,
                );
            }
            if bounds.v_scroll {
                my = momentum(
                    offset.y - self.anchor.y,
                    elapsed,
                    bounds.y.min_offset - offset.y,
                    offset.y - bounds.y.max_offset,
                    if options.bounce { bounds.viewport.height } else { 0.0 },
                    options.overshoot_divisor,
                );
            }

            dest = Point::new(offset.x + mx.distance, offset.y + my.distance);

            // Already past an edge and heading further out: no momentum
            if heading_out(offset.x, dest.x, &bounds.x) {
                mx = Momentum::NONE;
                dest.x = offset.x;
            }
            if heading_out(offset.y, dest.y, &bounds.y) {
                my = Momentum::NONE;
                dest.y = offset.y;
            }
        }

        let has_momentum = !mx.is_none() || !my.is_none();

        if snapping {
            if self.below_snap_threshold(dest, options.snap_threshold) {
                return Release::ScrollTo {
                    to: self.abs_start,
                    duration_ms: SNAP_RETURN_MS,
                    return_time_ms: 0.0,
                    page: None,
                };
            }

            let resolved = snap::resolve(ctx.pages, dest, self.dir, self.start_page, offset);
            let duration_ms = if has_momentum {
                resolved
                    .duration_ms
                    .max(mx.duration_ms.max(my.duration_ms).max(MIN_MOMENTUM_MS))
            } else if resolved.target == offset {
                0.0
            } else {
                resolved.duration_ms
            };
            tracing::debug!(
                target = ?resolved.target,
                page = ?(resolved.page_x, resolved.page_y),
                duration_ms,
                "gesture snapped"
            );
            return Release::ScrollTo {
                to: resolved.target.round(),
                duration_ms,
                return_time_ms: 0.0,
                page: Some((resolved.page_x, resolved.page_y)),
            };
        }

        if has_momentum {
            let duration_ms = mx.duration_ms.max(my.duration_ms).max(MIN_MOMENTUM_MS);
            tracing::debug!(?dest, duration_ms, "momentum");
            return Release::ScrollTo {
                to: dest.round(),
                duration_ms,
                return_time_ms: mx.return_time_ms.max(my.return_time_ms),
                page: None,
            };
        }

        Release::Settle { duration_ms: SETTLE_MS }
    }

    fn below_snap_threshold(&self, dest: Point, threshold: f32) -> bool {
        (dest.x - self.abs_start.x).abs() < threshold
            && (dest.y - self.abs_start.y).abs() < threshold
    }
}

/// Offset after applying `delta`, resisting travel past the edges
fn damp(offset: f32, delta: f32, boundary: &Boundary, bounce: bool) -> f32 {
    let next = offset + delta;
    if boundary.contains(next) {
        next
    } else if bounce {
        offset + delta / 2.0
    } else {
        boundary.clamp(next)
    }
}

/// True when `offset` is already outside and `dest` is further out the same side
fn heading_out(offset: f32, dest: f32, boundary: &Boundary) -> bool {
    (offset > boundary.min_offset && dest > boundary.min_offset)
        || (offset < boundary.max_offset && dest < boundary.max_offset)
}

/// Rubber-band a pinch scale past the zoom limits
pub fn elastic_scale(scale: f32, min: f32, max: f32) -> f32 {
    if scale < min {
        0.5 * min * 2f32.powf(scale / min)
    } else if scale > max {
        2.0 * max * 0.5f32.powf(max / scale)
    } else {
        scale
    }
}

fn signum(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapMode;
    use crate::pages::PageSet;
    use kinetic_core::Size;

    fn bounds(viewport: Size, content: Size, options: &ScrollOptions) -> ScrollBounds {
        ScrollBounds::compute(viewport, content, 1.0, options)
    }

    fn move_ctx(offset: Point, bounds: &ScrollBounds) -> MoveContext<'_> {
        MoveContext {
            offset,
            bounds,
            bounce: true,
            lock_direction: true,
        }
    }

    #[test]
    fn test_below_threshold_does_not_move() {
        let options = ScrollOptions::default();
        let b = bounds(Size::new(100.0, 100.0), Size::new(400.0, 400.0), &options);
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(50.0, 50.0), Point::ZERO, 0.0, (0, 0));

        let ctx = move_ctx(Point::ZERO, &b);
        assert_eq!(tracker.track_move(Point::new(47.0, 47.0), 10.0, &ctx), None);
        assert!(!tracker.moved());
    }

    #[test]
    fn test_direction_lock_latches() {
        let options = ScrollOptions::default();
        let b = bounds(Size::new(100.0, 100.0), Size::new(400.0, 400.0), &options);
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(50.0, 80.0), Point::new(-20.0, -100.0), 0.0, (0, 0));

        // |dx| = 2, |dy| = 10
        let offset = tracker
            .track_move(Point::new(48.0, 70.0), 16.0, &move_ctx(Point::new(-20.0, -100.0), &b))
            .unwrap();
        assert_eq!(tracker.lock(), Some(Axis::Vertical));
        assert_eq!(offset, Point::new(-20.0, -110.0));

        // Later horizontal movement is ignored for the rest of the gesture
        let offset = tracker
            .track_move(Point::new(10.0, 60.0), 32.0, &move_ctx(offset, &b))
            .unwrap();
        assert_eq!(offset.x, -20.0);
        assert_eq!(offset.y, -120.0);
        assert_eq!(tracker.direction(), (0, -1));
    }

    #[test]
    fn test_rubber_band_halves_delta() {
        let options = ScrollOptions::default();
        let b = bounds(Size::new(100.0, 100.0), Size::new(100.0, 400.0), &options);
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(50.0, 10.0), Point::ZERO, 0.0, (0, 0));

        let offset = tracker
            .track_move(Point::new(50.0, 30.0), 16.0, &move_ctx(Point::ZERO, &b))
            .unwrap();
        assert_eq!(offset.y, 10.0);

        let ctx = MoveContext {
            bounce: false,
            ..move_ctx(Point::ZERO, &b)
        };
        tracker.begin(Point::new(50.0, 10.0), Point::ZERO, 0.0, (0, 0));
        let offset = tracker.track_move(Point::new(50.0, 30.0), 16.0, &ctx).unwrap();
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn test_pinch_scales_by_distance_ratio() {
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(100.0, 100.0), Point::ZERO, 0.0, (0, 0));
        tracker.begin_pinch(
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            Point::ZERO,
            Point::ZERO,
            1.0,
        );

        let ctx = PinchContext {
            offset: Point::ZERO,
            zoom_min: 1.0,
            zoom_max: 4.0,
            bounce: true,
        };
        let update = tracker
            .pinch_move(Point::new(75.0, 100.0), Point::new(225.0, 100.0), &ctx)
            .unwrap();
        assert!((update.scale - 1.5).abs() < 1e-5);
        // The midpoint stays over the same content point
        let midpoint = update.offset + Point::new(150.0, 100.0) * update.scale;
        assert!((midpoint.x - 150.0).abs() < 1e-3);
        assert!((midpoint.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_pinch_clamps_without_bounce_and_release_clamps() {
        let options = ScrollOptions {
            zoom: true,
            zoom_max: 2.0,
            ..Default::default()
        };
        let b = bounds(Size::new(100.0, 100.0), Size::new(400.0, 400.0), &options);
        let pages = Pages::default();
        let mut tracker = GestureTracker::new();
        tracker.begin_pinch(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::ZERO,
            Point::ZERO,
            1.0,
        );

        let hard = PinchContext {
            offset: Point::ZERO,
            zoom_min: 1.0,
            zoom_max: 2.0,
            bounce: false,
        };
        let update = tracker
            .pinch_move(Point::new(0.0, 0.0), Point::new(300.0, 0.0), &hard)
            .unwrap();
        assert_eq!(update.scale, 2.0);

        let soft = PinchContext { bounce: true, ..hard };
        let update = tracker
            .pinch_move(Point::new(0.0, 0.0), Point::new(300.0, 0.0), &soft)
            .unwrap();
        assert!(update.scale > 2.0 && update.scale < 4.0);

        let release = tracker.release(
            100.0,
            &ReleaseContext {
                offset: Point::ZERO,
                bounds: &b,
                pages: &pages,
                options: &options,
            },
        );
        match release {
            Release::Zoom { scale, .. } => assert_eq!(scale, 2.0),
            other => panic!("expected zoom, got {other:?}"),
        }
    }

    #[test]
    fn test_elastic_scale_is_continuous_at_limits() {
        assert!((elastic_scale(1.0, 1.0, 4.0) - 1.0).abs() < 1e-6);
        assert!((elastic_scale(4.0, 1.0, 4.0) - 4.0).abs() < 1e-6);
        assert!(elastic_scale(0.5, 1.0, 4.0) < 1.0);
        assert!(elastic_scale(0.5, 1.0, 4.0) > 0.5);
    }

    #[test]
    fn test_tap_release() {
        let options = ScrollOptions::default();
        let b = bounds(Size::new(100.0, 100.0), Size::new(400.0, 400.0), &options);
        let pages = Pages::default();
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(10.0, 10.0), Point::ZERO, 0.0, (0, 0));
        tracker.track_move(Point::new(12.0, 11.0), 20.0, &move_ctx(Point::ZERO, &b));

        let release = tracker.release(
            40.0,
            &ReleaseContext {
                offset: Point::ZERO,
                bounds: &b,
                pages: &pages,
                options: &options,
            },
        );
        assert_eq!(
            release,
            Release::Tap {
                position: Point::new(12.0, 11.0)
            }
        );
    }

    #[test]
    fn test_slow_drag_settles_without_momentum() {
        let options = ScrollOptions::default();
        let b = bounds(Size::new(100.0, 100.0), Size::new(100.0, 400.0), &options);
        let pages = Pages::default();
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(50.0, 90.0), Point::ZERO, 0.0, (0, 0));
        let offset = tracker
            .track_move(Point::new(50.0, 40.0), 100.0, &move_ctx(Point::ZERO, &b))
            .unwrap();

        // Released long after the last anchor
        let release = tracker.release(
            450.0,
            &ReleaseContext {
                offset,
                bounds: &b,
                pages: &pages,
                options: &options,
            },
        );
        assert_eq!(release, Release::Settle { duration_ms: SETTLE_MS });
    }

    #[test]
    fn test_flick_snaps_to_next_page() {
        let options = ScrollOptions::carousel();
        let b = bounds(Size::new(320.0, 480.0), Size::new(960.0, 480.0), &options);
        let pages = Pages {
            x: PageSet::fixed(&b.x, 320.0),
            y: PageSet::fixed(&b.y, 480.0),
        };
        assert_eq!(options.snap, SnapMode::Pages);

        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(200.0, 100.0), Point::ZERO, 0.0, (0, 0));
        let mut offset = Point::ZERO;
        for (i, x) in [190.0, 150.0, 100.0].into_iter().enumerate() {
            let t = 50.0 * (i as f64 + 1.0);
            offset = tracker
                .track_move(Point::new(x, 100.0), t, &move_ctx(offset, &b))
                .unwrap_or(offset);
        }
        assert_eq!(offset.x, -100.0);

        let release = tracker.release(
            150.0,
            &ReleaseContext {
                offset,
                bounds: &b,
                pages: &pages,
                options: &options,
            },
        );
        match release {
            Release::ScrollTo {
                to, duration_ms, page, ..
            } => {
                assert_eq!(to, Point::new(-320.0, 0.0));
                assert_eq!(page, Some((1, 0)));
                assert!(duration_ms >= 200.0);
            }
            other => panic!("expected a snap, got {other:?}"),
        }
    }

    #[test]
    fn test_momentum_cancelled_when_heading_out() {
        let options = ScrollOptions::default();
        let b = bounds(Size::new(100.0, 100.0), Size::new(100.0, 400.0), &options);
        let pages = Pages::default();
        let mut tracker = GestureTracker::new();
        tracker.begin(Point::new(50.0, 10.0), Point::ZERO, 0.0, (0, 0));
        // Pull down past the top edge quickly
        let offset = tracker
            .track_move(Point::new(50.0, 60.0), 50.0, &move_ctx(Point::ZERO, &b))
            .unwrap();
        assert!(offset.y > 0.0);

        let release = tracker.release(
            60.0,
            &ReleaseContext {
                offset,
                bounds: &b,
                pages: &pages,
                options: &options,
            },
        );
        assert_eq!(release, Release::Settle { duration_ms: SETTLE_MS });
    }
}
