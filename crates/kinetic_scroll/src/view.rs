//! Scroll view
//!
//! `ScrollView` owns the scroll state of one surface and is its only writer.
//! Pointer and wheel events go in through [`ScrollView::handle_pointer`] and
//! [`ScrollView::handle_wheel`]; animations advance through
//! [`ScrollView::tick`] (frame driver) or [`ScrollView::transition_end`]
//! (transition driver).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use kinetic_animation::ManualClock;
//! use kinetic_core::{PointerEvent, Size};
//! use kinetic_scroll::{HeadlessSurface, ScrollContext, ScrollOptions, ScrollView};
//!
//! let clock = Rc::new(ManualClock::new(0.0));
//! let surface = HeadlessSurface::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0));
//! let mut view = ScrollView::new(
//!     ScrollContext::new(clock.clone()),
//!     surface,
//!     ScrollOptions::default(),
//! );
//!
//! view.handle_pointer(&PointerEvent::start(100.0, 400.0, 0.0));
//! view.handle_pointer(&PointerEvent::moved(100.0, 300.0, 500.0));
//! view.handle_pointer(&PointerEvent::end(100.0, 300.0, 900.0));
//!
//! assert_eq!(view.offset().y, -100.0);
//! ```

use kinetic_animation::{Animator, Easing, Step, TimerId, TimerQueue};
use kinetic_core::{
    Axis, Point, PointerEvent, PointerPhase, StateTransitions, Transform2D, WheelEvent,
};

use crate::bounds::ScrollBounds;
use crate::config::{DriverMode, ScrollOptions, SnapMode, WheelAction};
use crate::context::ScrollContext;
use crate::gesture::{GestureTracker, MoveContext, PinchContext, Release, ReleaseContext};
use crate::handlers::{ScrollEventContext, ScrollEventKind, ScrollHandlers};
use crate::pages::{PageSet, Pages};
use crate::scrollbar::Scrollbar;
use crate::state::{scroll_events, ScrollPhase};
use crate::surface::Surface;

/// Default `scroll_to_page` duration
pub const PAGE_SCROLL_MS: f64 = 400.0;

/// Default `zoom` duration
pub const ZOOM_MS: f64 = 200.0;

/// Settle time after taps, refreshes and completed animations
pub const RESET_MS: f32 = 400.0;

/// Window in which a second tap counts as a double tap
pub const DOUBLE_TAP_MS: f64 = 250.0;

/// Duration of a wheel zoom step, and how long zoom-end waits for the next
pub const WHEEL_ZOOM_MS: f64 = 400.0;

/// Wheel zoom factor exponent: each notch scales by 2^(1/3)
pub const WHEEL_ZOOM_STEP: f32 = 1.0 / 3.0;

/// Page selector for [`ScrollView::scroll_to_page`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTarget {
    Index(usize),
    Next,
    Prev,
}

impl PageTarget {
    fn resolve(self, current: usize, pages: &PageSet) -> usize {
        let index = match self {
            PageTarget::Index(i) => i,
            PageTarget::Next => current.saturating_add(1),
            PageTarget::Prev => current.saturating_sub(1),
        };
        pages.clamp_index(index)
    }
}

/// Work scheduled on the timer queue
#[derive(Clone, Copy, Debug, PartialEq)]
enum Deferred {
    /// Single-tap window elapsed; pass the tap through if `click`
    Tap { position: Point, click: bool },
    ZoomEnd,
    /// One wheel zoom step finished settling
    WheelZoomSettled,
}

/// Visual interpolation between two transforms during a zoom
#[derive(Clone, Copy, Debug, PartialEq)]
struct ZoomTween {
    from: Transform2D,
    to: Transform2D,
    start_ms: f64,
    duration_ms: f64,
}

impl ZoomTween {
    fn sample(&self, now_ms: f64) -> (Transform2D, bool) {
        let progress = if self.duration_ms > 0.0 {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        if progress >= 1.0 {
            return (self.to, true);
        }
        let eased = Easing::QuarterCircleOut.apply(progress);
        let translate = self.from.translate + (self.to.translate - self.from.translate) * eased;
        let scale = self.from.scale + (self.to.scale - self.from.scale) * eased;
        (Transform2D::new(translate, scale), false)
    }
}

// ============================================================================
// ScrollView
// ============================================================================

/// Inertial scroll and zoom controller for one surface
pub struct ScrollView<S: Surface> {
    ctx: ScrollContext,
    surface: S,
    options: ScrollOptions,
    handlers: ScrollHandlers,

    offset: Point,
    scale: f32,
    phase: ScrollPhase,
    /// Set once the content moved; cleared when `ScrollEnd` fires
    moved: bool,
    gesture: GestureTracker,
    /// Last transform written while pinching
    pinch_visual: Option<Transform2D>,
    animator: Animator,
    zoom_tween: Option<ZoomTween>,
    /// Rubber-band time for the reset after a momentum animation
    return_time_ms: f32,

    bounds: ScrollBounds,
    pages: Pages,
    current_page: (usize, usize),
    h_bar: Option<Scrollbar>,
    v_bar: Option<Scrollbar>,
    indicators_visible: bool,

    timers: TimerQueue<Deferred>,
    tap_timer: Option<TimerId>,
    wheel_zooms: u32,

    available: bool,
    enabled: bool,
    destroyed: bool,
}

impl<S: Surface> std::fmt::Debug for ScrollView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollView")
            .field("offset", &self.offset)
            .field("scale", &self.scale)
            .field("phase", &self.phase)
            .field("current_page", &self.current_page)
            .field("available", &self.available)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> ScrollView<S> {
    /// Attach a view to `surface`
    ///
    /// If the surface reports no content the view is created unavailable and
    /// ignores input until a later `refresh` finds content.
    pub fn new(ctx: ScrollContext, surface: S, options: ScrollOptions) -> Self {
        let mut view = Self {
            ctx,
            surface,
            options: options.sanitized(),
            handlers: ScrollHandlers::new(),
            offset: Point::ZERO,
            scale: 1.0,
            phase: ScrollPhase::Idle,
            moved: false,
            gesture: GestureTracker::new(),
            pinch_visual: None,
            animator: Animator::with_easing(Easing::QuarterCircleOut),
            zoom_tween: None,
            return_time_ms: 0.0,
            bounds: ScrollBounds::default(),
            pages: Pages::default(),
            current_page: (0, 0),
            h_bar: None,
            v_bar: None,
            indicators_visible: false,
            timers: TimerQueue::new(),
            tap_timer: None,
            wheel_zooms: 0,
            available: false,
            enabled: true,
            destroyed: false,
        };

        view.offset.y = -view.options.top_offset;
        view.refresh();
        if view.available {
            view.render();
        }
        view
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn transform(&self) -> Transform2D {
        Transform2D::new(self.offset, self.scale)
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn current_page(&self) -> (usize, usize) {
        self.current_page
    }

    pub fn bounds(&self) -> &ScrollBounds {
        &self.bounds
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    pub fn scrollbar(&self, axis: Axis) -> Option<&Scrollbar> {
        match axis {
            Axis::Horizontal => self.h_bar.as_ref(),
            Axis::Vertical => self.v_bar.as_ref(),
        }
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    /// True when nothing is moving and no gesture is in progress
    pub fn is_ready(&self) -> bool {
        self.phase == ScrollPhase::Idle && self.zoom_tween.is_none() && !self.gesture.is_active()
    }

    /// False when the surface had no content at the last refresh
    pub fn is_available(&self) -> bool {
        self.available && !self.destroyed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn handlers_mut(&mut self) -> &mut ScrollHandlers {
        &mut self.handlers
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn context(&self) -> &ScrollContext {
        &self.ctx
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the options and refresh
    pub fn set_options(&mut self, options: ScrollOptions) {
        self.options = options.sanitized();
        self.refresh();
    }

    /// Recompute boundaries, pages and scrollbars from the surface
    ///
    /// When idle the offset is brought back into the new bounds over 400ms.
    pub fn refresh(&mut self) {
        if !self.recompute() {
            return;
        }
        self.dispatch(ScrollEventKind::Refresh);

        if self.phase == ScrollPhase::Idle && self.zoom_tween.is_none() {
            self.surface.set_transition_duration(0.0);
            self.reset_position(RESET_MS);
        }
    }

    /// Geometry part of a refresh; returns availability
    fn recompute(&mut self) -> bool {
        if self.destroyed {
            return false;
        }

        let Some(content) = self.surface.content_size() else {
            if self.available {
                tracing::warn!("scroll content disappeared, scrolling disabled");
            } else {
                tracing::debug!("no scroll content, scrolling unavailable");
            }
            self.available = false;
            self.animator.cancel();
            self.zoom_tween = None;
            self.h_bar = None;
            self.v_bar = None;
            self.surface.remove_indicator(Axis::Horizontal);
            self.surface.remove_indicator(Axis::Vertical);
            return false;
        };

        self.available = true;
        self.bounds = ScrollBounds::compute(
            self.surface.viewport_size(),
            content,
            self.scale,
            &self.options,
        );
        self.pages = self.build_pages();
        self.current_page = (
            self.pages.x.clamp_index(self.current_page.0),
            self.pages.y.clamp_index(self.current_page.1),
        );
        self.measure_scrollbars();

        tracing::debug!(
            viewport = ?self.bounds.viewport,
            scroller = ?self.bounds.scroller,
            min = ?(self.bounds.x.min_offset, self.bounds.y.min_offset),
            max = ?(self.bounds.x.max_offset, self.bounds.y.max_offset),
            pages = ?(self.pages.x.len(), self.pages.y.len()),
            "scroll geometry refreshed"
        );
        true
    }

    fn build_pages(&self) -> Pages {
        match &self.options.snap {
            SnapMode::Off => Pages::default(),
            SnapMode::Pages => self.viewport_pages(),
            SnapMode::Selector(selector) => {
                let targets = self.surface.snap_targets(selector);
                if targets.is_empty() {
                    tracing::debug!(%selector, "snap selector matched nothing");
                }
                let xs = targets.iter().map(|p| p.x);
                let ys = targets.iter().map(|p| p.y);
                Pages {
                    x: PageSet::from_targets(xs, &self.bounds.x, self.scale),
                    y: PageSet::from_targets(ys, &self.bounds.y, self.scale),
                }
            }
        }
    }

    /// One page per viewport length on both axes
    fn viewport_pages(&self) -> Pages {
        Pages {
            x: PageSet::fixed(&self.bounds.x, self.bounds.viewport.width),
            y: PageSet::fixed(&self.bounds.y, self.bounds.viewport.height),
        }
    }

    fn measure_scrollbars(&mut self) {
        let wants_h =
            self.options.h_scrollbar && self.bounds.h_scroll && self.bounds.x.is_scrollable();
        let wants_v =
            self.options.v_scrollbar && self.bounds.v_scroll && self.bounds.y.is_scrollable();

        self.h_bar = if wants_h {
            Scrollbar::measure(Axis::Horizontal, &self.bounds, wants_v)
        } else {
            None
        };
        self.v_bar = if wants_v {
            Scrollbar::measure(Axis::Vertical, &self.bounds, wants_h)
        } else {
            None
        };

        if self.h_bar.is_none() {
            self.surface.remove_indicator(Axis::Horizontal);
        }
        if self.v_bar.is_none() {
            self.surface.remove_indicator(Axis::Vertical);
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stop reacting to pointer and wheel input
    ///
    /// Any animation is stopped and the offset jumps back into bounds.
    pub fn disable(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop();
        if self.gesture.is_active() {
            self.gesture.reset();
            self.pinch_visual = None;
            self.phase.transition(scroll_events::POINTER_UP);
        }
        if self.available {
            self.reset_position(0.0);
        }
        self.enabled = false;
        tracing::debug!("scroll view disabled");
    }

    pub fn enable(&mut self) {
        if self.destroyed {
            return;
        }
        self.enabled = true;
        tracing::debug!("scroll view enabled");
    }

    /// Detach from the surface for good
    ///
    /// Cancels every timer and animation, removes the indicators and drops
    /// all handlers. Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.animator.cancel();
        self.zoom_tween = None;
        self.timers.clear();
        self.tap_timer = None;
        self.wheel_zooms = 0;
        self.gesture.reset();
        self.pinch_visual = None;
        self.surface.set_transition_duration(0.0);
        self.surface.remove_indicator(Axis::Horizontal);
        self.surface.remove_indicator(Axis::Vertical);
        self.handlers.clear();
        self.phase = ScrollPhase::Idle;
        self.enabled = false;
        self.destroyed = true;
        tracing::debug!("scroll view destroyed");
    }

    // =========================================================================
    // Programmatic Scrolling
    // =========================================================================

    /// Animate to `(x, y)` over `duration_ms`
    ///
    /// With `relative` the content moves by `(x, y)` from the current offset,
    /// positive values scrolling further into the content.
    pub fn scroll_to(&mut self, x: f32, y: f32, duration_ms: f64, relative: bool) {
        if !x.is_finite() || !y.is_finite() {
            tracing::warn!(x, y, "ignoring scroll_to with non-finite target");
            return;
        }
        if !self.is_available() {
            return;
        }

        self.stop();
        let to = if relative {
            self.offset - Point::new(x, y)
        } else {
            Point::new(x, y)
        };
        self.animator.push(Step::new(to, sanitize_duration(duration_ms)));
        self.start_animation(scroll_events::ANIMATE);
    }

    /// Animate through a chain of absolute steps, one after another
    pub fn scroll_along(&mut self, steps: impl IntoIterator<Item = Step>) {
        if !self.is_available() {
            return;
        }

        self.stop();
        for step in steps {
            if !step.to.is_finite() {
                tracing::warn!(to = ?step.to, "skipping non-finite scroll step");
                continue;
            }
            self.animator.push(Step::new(step.to, sanitize_duration(step.duration_ms)));
        }
        self.start_animation(scroll_events::ANIMATE);
    }

    /// Scroll so the element `id` sits at the top-left of the viewport
    ///
    /// Without a duration the animation takes twice the target offset in ms.
    pub fn scroll_to_element(&mut self, id: &str, duration_ms: Option<f64>) {
        if !self.is_available() {
            return;
        }
        let Some(position) = self.surface.element_offset(id) else {
            tracing::debug!(id, "scroll target not found");
            return;
        };

        let target = self.bounds.clamp(position * -self.scale);
        let duration = duration_ms
            .unwrap_or_else(|| (2.0 * target.x.abs()).max(2.0 * target.y.abs()) as f64);
        self.scroll_to(target.x, target.y, duration, false);
    }

    /// Scroll to a page on each axis (400ms by default)
    ///
    /// Pages are the snap pages when snapping, otherwise viewport-sized
    /// pages. Indices past the last page clamp to it.
    pub fn scroll_to_page(&mut self, x: PageTarget, y: PageTarget, duration_ms: Option<f64>) {
        if !self.is_available() {
            return;
        }
        self.dispatch(ScrollEventKind::ScrollStart);

        let fixed;
        let pages = if self.options.snap.is_enabled() {
            &self.pages
        } else {
            fixed = self.viewport_pages();
            &fixed
        };

        let page = (
            x.resolve(self.current_page.0, &pages.x),
            y.resolve(self.current_page.1, &pages.y),
        );
        let to = Point::new(
            pages.x.get(page.0).unwrap_or(self.offset.x),
            pages.y.get(page.1).unwrap_or(self.offset.y),
        );

        self.current_page = page;
        self.scroll_to(to.x, to.y, duration_ms.unwrap_or(PAGE_SCROLL_MS), false);
    }

    /// Zoom to `scale` about the point `(x, y)` (pointer coordinates)
    ///
    /// The scale is clamped to the zoom limits and the resulting offset to
    /// the new bounds. Defaults to 200ms.
    pub fn zoom(&mut self, x: f32, y: f32, scale: f32, duration_ms: Option<f64>) {
        if !x.is_finite() || !y.is_finite() || !scale.is_finite() || scale <= 0.0 {
            tracing::warn!(x, y, scale, "ignoring zoom with invalid arguments");
            return;
        }
        if !self.is_available() {
            return;
        }
        self.zoom_about(
            Point::new(x, y),
            scale,
            sanitize_duration(duration_ms.unwrap_or(ZOOM_MS)),
        );
    }

    /// Stop any animation where it currently is
    pub fn stop(&mut self) {
        let now = self.ctx.now_ms();
        self.interrupt(now);
        self.moved = false;
        self.phase.transition(scroll_events::SETTLED);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feed a normalized pointer event
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        if !self.accepts_input() {
            return;
        }
        self.run_due_timers();
        match event.phase {
            PointerPhase::Start => self.pointer_down(event),
            PointerPhase::Move => self.pointer_move(event),
            PointerPhase::End | PointerPhase::Cancel => self.pointer_up(event),
        }
    }

    /// Feed a wheel event
    pub fn handle_wheel(&mut self, event: &WheelEvent) {
        if !self.accepts_input() || self.phase.is_dragging() {
            return;
        }
        self.run_due_timers();

        match self.options.wheel_action {
            WheelAction::Disabled => {}
            WheelAction::Zoom => {
                let notch = if event.delta_y > 0.0 {
                    1.0
                } else if event.delta_y < 0.0 {
                    -1.0
                } else {
                    0.0
                };
                let target = (self.scale * 2f32.powf(WHEEL_ZOOM_STEP * notch))
                    .clamp(self.options.zoom_min, self.options.zoom_max);
                if (target - self.scale).abs() <= f32::EPSILON {
                    return;
                }

                if self.wheel_zooms == 0 {
                    self.dispatch(ScrollEventKind::ZoomStart);
                }
                self.wheel_zooms += 1;
                self.zoom_about(Point::new(event.x, event.y), target, WHEEL_ZOOM_MS);
                let due = self.ctx.now_ms() + WHEEL_ZOOM_MS;
                self.timers.schedule(due, Deferred::WheelZoomSettled);
            }
            WheelAction::Scroll => {
                if !self.bounds.y.is_scrollable() {
                    return;
                }
                let delta = Point::new(
                    if self.bounds.h_scroll { event.delta_x } else { 0.0 },
                    if self.bounds.v_scroll { event.delta_y } else { 0.0 },
                );
                if !delta.is_finite() {
                    return;
                }
                let to = self.bounds.clamp(self.offset + delta);
                self.scroll_to(to.x, to.y, 0.0, false);
            }
        }
    }

    fn accepts_input(&self) -> bool {
        self.enabled && self.is_available()
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        let position = event.position();
        self.dispatch_at(ScrollEventKind::BeforeScrollStart, position);

        // Plans run on the context clock, not the host's event epoch
        let now = self.ctx.now_ms();
        if self.interrupt(now) {
            self.dispatch(ScrollEventKind::ScrollEnd);
        }
        self.surface.set_transition_duration(0.0);
        self.moved = false;
        self.pinch_visual = None;
        self.phase.transition(scroll_events::POINTER_DOWN);
        self.gesture
            .begin(position, self.offset, event.timestamp_ms, self.current_page);

        if self.options.zoom {
            if let Some((a, b)) = event.pair() {
                let origin = self.surface.viewport_origin();
                self.gesture.begin_pinch(a, b, origin, self.offset, self.scale);
                tracing::debug!(scale = self.scale, "pinch started");
                self.dispatch_at(ScrollEventKind::ZoomStart, a.midpoint(b));
            }
        }

        self.dispatch_at(ScrollEventKind::ScrollStart, position);
    }

    fn pointer_move(&mut self, event: &PointerEvent) {
        if !self.phase.is_dragging() || !self.gesture.is_active() {
            return;
        }

        if self.gesture.is_pinching() {
            let Some((a, b)) = event.pair() else {
                return;
            };
            let ctx = PinchContext {
                offset: self.offset,
                zoom_min: self.options.zoom_min,
                zoom_max: self.options.zoom_max,
                bounce: self.options.bounce,
            };
            if let Some(update) = self.gesture.pinch_move(a, b, &ctx) {
                let visual = Transform2D::new(update.offset, update.scale);
                self.pinch_visual = Some(visual);
                self.surface.apply_transform(visual);
                tracing::trace!(scale = update.scale, "pinch");
                let ctx = self
                    .event(ScrollEventKind::Zoom)
                    .with_position(a.midpoint(b))
                    .with_rotation(update.rotation);
                self.handlers.dispatch(&ScrollEventContext {
                    scale: update.scale,
                    offset: update.offset,
                    ..ctx
                });
            }
            return;
        }

        let position = event.position();
        let ctx = MoveContext {
            offset: self.offset,
            bounds: &self.bounds,
            bounce: self.options.bounce,
            lock_direction: self.options.lock_direction,
        };
        let Some(next) = self.gesture.track_move(position, event.timestamp_ms, &ctx) else {
            return;
        };

        if !self.moved {
            self.moved = true;
            self.indicators_visible = true;
        }
        tracing::trace!(offset = ?next, "drag");
        self.offset = next;
        self.render();
        self.dispatch_at(ScrollEventKind::ScrollMove, position);
    }

    fn pointer_up(&mut self, event: &PointerEvent) {
        if !self.phase.is_dragging() {
            return;
        }
        // Wait for the last pointer to lift
        if event.phase == PointerPhase::End && !event.pointers.is_empty() {
            return;
        }

        self.dispatch_at(ScrollEventKind::BeforeScrollEnd, event.changed.position);
        self.phase.transition(scroll_events::POINTER_UP);

        let release = self.gesture.release(
            event.timestamp_ms,
            &ReleaseContext {
                offset: self.offset,
                bounds: &self.bounds,
                pages: &self.pages,
                options: &self.options,
            },
        );
        tracing::debug!(?release, "gesture released");

        match release {
            Release::Zoom { scale, offset } => self.finish_pinch(scale, offset),
            Release::Tap { position } => self.tap(position),
            Release::ScrollTo {
                to,
                duration_ms,
                return_time_ms,
                page,
            } => {
                if let Some(page) = page {
                    self.current_page = page;
                }
                self.return_time_ms = return_time_ms;
                self.animator.push(Step::new(to, duration_ms as f64));
                self.start_animation(scroll_events::ANIMATE);
            }
            Release::Settle { duration_ms } => self.reset_position(duration_ms),
        }

        self.dispatch_at(ScrollEventKind::TouchEnd, event.changed.position);
    }

    fn tap(&mut self, position: Point) {
        let now = self.ctx.now_ms();

        if self.options.zoom {
            if let Some(id) = self.tap_timer.take() {
                if self.timers.cancel(id).is_some() {
                    let target = if (self.scale - 1.0).abs() <= f32::EPSILON {
                        self.options.double_tap_zoom
                    } else {
                        1.0
                    };
                    tracing::debug!(target, "double tap zoom");
                    self.dispatch_at(ScrollEventKind::ZoomStart, position);
                    self.zoom_about(position, target, ZOOM_MS);
                    self.timers.schedule(now + ZOOM_MS, Deferred::ZoomEnd);
                    return;
                }
            }

            // Hold the tap back in case a second one follows
            self.tap_timer = Some(self.timers.schedule(
                now + DOUBLE_TAP_MS,
                Deferred::Tap {
                    position,
                    click: self.options.handle_click,
                },
            ));
        } else if self.options.handle_click {
            self.dispatch_at(ScrollEventKind::Click, position);
        }

        self.reset_position(RESET_MS);
    }

    fn finish_pinch(&mut self, scale: f32, offset: Point) {
        let from = self
            .pinch_visual
            .take()
            .unwrap_or_else(|| Transform2D::new(self.offset, self.scale));

        self.scale = scale;
        if !self.recompute() {
            return;
        }
        self.offset = self.bounds.clamp(offset);
        self.dispatch(ScrollEventKind::Refresh);

        self.start_zoom_tween(from, ZOOM_MS);
        self.dispatch(ScrollEventKind::ZoomEnd);
    }

    // =========================================================================
    // Animation Driver
    // =========================================================================

    /// Advance timers and the frame driver to the context clock's time
    ///
    /// Returns true while there is more to do (an animation is running or a
    /// timer is pending), so hosts know whether to request another frame.
    pub fn tick(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let now = self.ctx.now_ms();
        self.run_due_timers();

        if self.options.driver == DriverMode::Frame {
            if let Some(sample) = self.animator.sample(now) {
                self.offset = sample.position;
                self.render();
                if sample.finished {
                    self.complete_step();
                }
            } else if let Some(tween) = self.zoom_tween {
                let (transform, finished) = tween.sample(now);
                if finished {
                    self.finish_zoom_tween();
                } else {
                    self.surface.apply_transform(transform);
                }
            }
        }

        self.animator.is_active() || self.zoom_tween.is_some() || !self.timers.is_empty()
    }

    /// The host finished the transition started by the transition driver
    pub fn transition_end(&mut self) {
        if self.destroyed || self.options.driver != DriverMode::Transition {
            return;
        }
        if self.animator.finish().is_some() {
            self.complete_step();
        } else if self.zoom_tween.is_some() {
            self.finish_zoom_tween();
        }
    }

    /// Fire every timer whose deadline has passed
    ///
    /// Also runs before input so a tap window that expired without a tick
    /// is not mistaken for a double tap.
    fn run_due_timers(&mut self) {
        let now = self.ctx.now_ms();
        for (id, deferred) in self.timers.pop_due(now) {
            self.fire(id, deferred);
        }
    }

    fn fire(&mut self, id: TimerId, deferred: Deferred) {
        match deferred {
            Deferred::Tap { position, click } => {
                if self.tap_timer == Some(id) {
                    self.tap_timer = None;
                }
                if click {
                    self.dispatch_at(ScrollEventKind::Click, position);
                }
            }
            Deferred::ZoomEnd => self.dispatch(ScrollEventKind::ZoomEnd),
            Deferred::WheelZoomSettled => {
                self.wheel_zooms = self.wheel_zooms.saturating_sub(1);
                if self.wheel_zooms == 0 {
                    self.dispatch(ScrollEventKind::ZoomEnd);
                }
            }
        }
    }

    /// Start the next queued step, completing it at once if it is instant
    fn start_animation(&mut self, event: u32) {
        if self.animator.is_active() {
            return;
        }
        let now = self.ctx.now_ms();
        let Some(plan) = self.animator.start_next(self.offset, now) else {
            self.reset_position(RESET_MS);
            return;
        };

        self.moved = true;
        self.phase.transition(event);
        self.indicators_visible = true;
        tracing::debug!(
            from = ?plan.from,
            to = ?plan.to,
            duration_ms = plan.duration_ms,
            phase = ?self.phase,
            "animation started"
        );

        if plan.is_instant() {
            self.animator.finish();
            self.offset = plan.to;
            self.surface.set_transition_duration(0.0);
            self.render();
            self.complete_step();
            return;
        }

        if self.options.driver == DriverMode::Transition {
            self.surface.set_transition_duration(plan.duration_ms);
            self.offset = plan.to;
            self.render();
        }
    }

    /// Shared completion path of both drivers
    fn complete_step(&mut self) {
        self.surface.set_transition_duration(0.0);
        self.dispatch(ScrollEventKind::AnimationEnd);

        if self.animator.has_queued() {
            let event = if self.phase == ScrollPhase::SnappingBack {
                scroll_events::SNAP_BACK
            } else {
                scroll_events::ANIMATE
            };
            self.start_animation(event);
            return;
        }

        let return_ms = if self.return_time_ms > 0.0 {
            std::mem::take(&mut self.return_time_ms)
        } else {
            RESET_MS
        };
        self.reset_position(return_ms);
    }

    /// Bring the offset back into bounds, or settle if it already is
    fn reset_position(&mut self, duration_ms: f32) {
        let target = self.bounds.clamp(self.offset);
        if target == self.offset {
            self.phase.transition(scroll_events::SETTLED);
            if self.moved {
                self.moved = false;
                self.dispatch(ScrollEventKind::ScrollEnd);
            }
            self.hide_indicators();
            return;
        }

        tracing::debug!(from = ?self.offset, to = ?target, duration_ms, "returning into bounds");
        self.animator.push(Step::new(target, duration_ms as f64));
        self.start_animation(scroll_events::SNAP_BACK);
    }

    /// Cancel the active plan, zoom tween and queued steps
    ///
    /// The offset is left where the content currently appears. Returns true
    /// if anything was running.
    fn interrupt(&mut self, now_ms: f64) -> bool {
        let mut interrupted = false;

        if let Some(plan) = self.animator.active().copied() {
            if self.options.driver == DriverMode::Transition {
                let visual = self
                    .surface
                    .rendered_transform()
                    .map(|t| t.translate)
                    .unwrap_or_else(|| plan.sample(now_ms).position);
                if visual.is_finite() {
                    self.offset = visual;
                }
            }
            interrupted = true;
        }
        interrupted |= self.animator.cancel();
        interrupted |= self.zoom_tween.take().is_some();
        self.return_time_ms = 0.0;

        if interrupted {
            tracing::debug!(offset = ?self.offset, "animation interrupted");
            self.surface.set_transition_duration(0.0);
            self.render();
        }
        interrupted
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    fn zoom_about(&mut self, at: Point, scale: f32, duration_ms: f64) {
        let now = self.ctx.now_ms();
        self.interrupt(now);

        let scale = scale.clamp(self.options.zoom_min, self.options.zoom_max);
        let from = Transform2D::new(self.offset, self.scale);
        let zoomed = from.zoom_about(at - self.surface.viewport_origin(), scale);

        self.scale = scale;
        if !self.recompute() {
            return;
        }
        self.offset = self.bounds.clamp(zoomed.translate);
        self.dispatch(ScrollEventKind::Refresh);
        tracing::debug!(scale, offset = ?self.offset, duration_ms, "zoom");

        self.start_zoom_tween(from, duration_ms);
    }

    fn start_zoom_tween(&mut self, from: Transform2D, duration_ms: f64) {
        let to = Transform2D::new(self.offset, self.scale);
        if duration_ms <= 0.0 || from == to {
            self.surface.set_transition_duration(0.0);
            self.render();
            return;
        }

        self.zoom_tween = Some(ZoomTween {
            from,
            to,
            start_ms: self.ctx.now_ms(),
            duration_ms,
        });
        self.phase.transition(scroll_events::ANIMATE);

        match self.options.driver {
            DriverMode::Frame => self.surface.apply_transform(from),
            DriverMode::Transition => {
                self.surface.set_transition_duration(duration_ms);
                self.render();
            }
        }
    }

    fn finish_zoom_tween(&mut self) {
        self.zoom_tween = None;
        self.surface.set_transition_duration(0.0);
        self.render();
        self.reset_position(0.0);
    }

    // =========================================================================
    // Rendering & Dispatch
    // =========================================================================

    fn render(&mut self) {
        self.surface
            .apply_transform(Transform2D::new(self.offset, self.scale));
        self.update_indicators();
    }

    fn update_indicators(&mut self) {
        let visible = self.indicators_visible || !self.options.hide_scrollbar;
        for bar in [self.h_bar, self.v_bar].into_iter().flatten() {
            let geometry = bar.indicator(
                self.offset.get(bar.axis()),
                self.options.fixed_scrollbar,
                visible,
                self.options.fade_scrollbar,
            );
            self.surface.update_indicator(&geometry);
        }
    }

    fn hide_indicators(&mut self) {
        if self.options.hide_scrollbar {
            self.indicators_visible = false;
        }
        self.update_indicators();
    }

    fn event(&self, kind: ScrollEventKind) -> ScrollEventContext {
        ScrollEventContext::new(kind, self.offset, self.scale, self.current_page)
    }

    fn dispatch(&self, kind: ScrollEventKind) {
        self.handlers.dispatch(&self.event(kind));
    }

    fn dispatch_at(&self, kind: ScrollEventKind, position: Point) {
        self.handlers.dispatch(&self.event(kind).with_position(position));
    }
}

fn sanitize_duration(duration_ms: f64) -> f64 {
    if duration_ms.is_finite() {
        duration_ms.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use kinetic_animation::ManualClock;
    use kinetic_core::Size;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view_with(
        options: ScrollOptions,
        viewport: Size,
        content: Size,
    ) -> (Rc<ManualClock>, ScrollView<HeadlessSurface>) {
        let clock = Rc::new(ManualClock::new(0.0));
        let view = ScrollView::new(
            ScrollContext::new(clock.clone()),
            HeadlessSurface::new(viewport, content),
            options,
        );
        (clock, view)
    }

    fn tall_view() -> (Rc<ManualClock>, ScrollView<HeadlessSurface>) {
        view_with(ScrollOptions::default(), Size::new(320.0, 480.0), Size::new(320.0, 2000.0))
    }

    fn record(
        view: &mut ScrollView<HeadlessSurface>,
        kind: ScrollEventKind,
    ) -> Rc<RefCell<Vec<Point>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        view.handlers_mut().on(kind, move |ctx| l.borrow_mut().push(ctx.offset));
        log
    }

    #[test]
    fn test_missing_content_is_unavailable() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut view = ScrollView::new(
            ScrollContext::new(clock),
            HeadlessSurface::empty(Size::new(100.0, 100.0)),
            ScrollOptions::default(),
        );
        assert!(!view.is_available());

        view.handle_pointer(&PointerEvent::start(10.0, 10.0, 0.0));
        view.scroll_to(0.0, -50.0, 0.0, false);
        assert_eq!(view.offset(), Point::ZERO);
        assert!(!view.tick());

        view.surface_mut().set_content_size(Some(Size::new(100.0, 400.0)));
        view.refresh();
        assert!(view.is_available());
    }

    #[test]
    fn test_scroll_to_zero_duration_is_idempotent() {
        let (_clock, mut view) = tall_view();
        let ends = record(&mut view, ScrollEventKind::AnimationEnd);

        view.scroll_to(0.0, -300.0, 0.0, false);
        assert_eq!(view.offset(), Point::new(0.0, -300.0));
        assert_eq!(ends.borrow().len(), 1);

        view.scroll_to(0.0, -300.0, 0.0, false);
        assert_eq!(view.offset(), Point::new(0.0, -300.0));
        assert_eq!(ends.borrow().len(), 2);
        assert_eq!(view.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_relative_scroll() {
        let (_clock, mut view) = tall_view();
        view.scroll_to(0.0, -100.0, 0.0, false);
        view.scroll_to(0.0, 50.0, 0.0, true);
        assert_eq!(view.offset(), Point::new(0.0, -150.0));
    }

    #[test]
    fn test_non_finite_scroll_is_ignored() {
        let (_clock, mut view) = tall_view();
        view.scroll_to(f32::NAN, 0.0, 0.0, false);
        view.zoom(0.0, 0.0, f32::INFINITY, None);
        assert_eq!(view.offset(), Point::ZERO);
        assert_eq!(view.scale(), 1.0);
    }

    #[test]
    fn test_frame_driver_samples_until_done() {
        let (clock, mut view) = tall_view();
        let ends = record(&mut view, ScrollEventKind::ScrollEnd);

        view.scroll_to(0.0, -400.0, 300.0, false);
        assert_eq!(view.phase(), ScrollPhase::Animating);

        clock.set(150.0);
        assert!(view.tick());
        let mid = view.offset().y;
        assert!(mid < 0.0 && mid > -400.0);

        clock.set(300.0);
        view.tick();
        assert_eq!(view.offset(), Point::new(0.0, -400.0));
        assert_eq!(view.phase(), ScrollPhase::Idle);
        assert_eq!(*ends.borrow(), vec![Point::new(0.0, -400.0)]);
    }

    #[test]
    fn test_out_of_bounds_target_snaps_back() {
        let (clock, mut view) = tall_view();
        view.scroll_to(0.0, 100.0, 100.0, false);

        clock.set(100.0);
        view.tick();
        assert_eq!(view.offset().y, 100.0);
        assert_eq!(view.phase(), ScrollPhase::SnappingBack);

        clock.set(600.0);
        view.tick();
        assert_eq!(view.offset(), Point::ZERO);
        assert_eq!(view.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_transition_driver_waits_for_host() {
        let options = ScrollOptions {
            driver: DriverMode::Transition,
            ..Default::default()
        };
        let (_clock, mut view) =
            view_with(options, Size::new(320.0, 480.0), Size::new(320.0, 2000.0));

        view.scroll_to(0.0, -200.0, 250.0, false);
        assert_eq!(view.surface().transition_ms(), 250.0);
        assert_eq!(view.surface().last_transform().unwrap().translate, Point::new(0.0, -200.0));
        assert!(view.phase().is_animating());

        view.transition_end();
        assert_eq!(view.phase(), ScrollPhase::Idle);
        assert_eq!(view.surface().transition_ms(), 0.0);
    }

    #[test]
    fn test_pointer_down_reads_rendered_position_mid_transition() {
        let options = ScrollOptions {
            driver: DriverMode::Transition,
            ..Default::default()
        };
        let (_clock, mut view) =
            view_with(options, Size::new(320.0, 480.0), Size::new(320.0, 2000.0));
        let ends = record(&mut view, ScrollEventKind::ScrollEnd);

        view.scroll_to(0.0, -400.0, 1000.0, false);
        view.surface_mut()
            .set_rendered_transform(Some(Transform2D::new(Point::new(0.0, -120.0), 1.0)));
        view.handle_pointer(&PointerEvent::start(10.0, 10.0, 10.0));

        assert_eq!(view.offset(), Point::new(0.0, -120.0));
        assert!(view.phase().is_dragging());
        assert_eq!(ends.borrow().len(), 1);
    }

    #[test]
    fn test_pointer_down_samples_on_context_clock() {
        let options = ScrollOptions {
            driver: DriverMode::Transition,
            ..Default::default()
        };
        let (clock, mut view) =
            view_with(options, Size::new(320.0, 480.0), Size::new(320.0, 2000.0));

        view.scroll_to(0.0, -400.0, 1000.0, false);
        clock.set(100.0);
        // Host event times count from a different epoch
        view.handle_pointer(&PointerEvent::start(10.0, 10.0, 1_000_100.0));

        let expected = -400.0 * Easing::QuarterCircleOut.apply(0.1);
        assert!((view.offset().y - expected).abs() < 1e-3);
        assert!(view.phase().is_dragging());
    }

    #[test]
    fn test_scroll_to_page_without_snap_uses_viewport_pages() {
        let (_clock, mut view) = tall_view();
        view.scroll_to_page(PageTarget::Index(0), PageTarget::Index(2), Some(0.0));
        assert_eq!(view.offset(), Point::new(0.0, -960.0));
        assert_eq!(view.current_page(), (0, 2));

        view.scroll_to_page(PageTarget::Index(0), PageTarget::Next, Some(0.0));
        view.scroll_to_page(PageTarget::Index(0), PageTarget::Next, Some(0.0));
        // Last page is the partial page at the bottom edge
        assert_eq!(view.offset(), Point::new(0.0, -1520.0));
        assert_eq!(view.current_page(), (0, 4));
    }

    #[test]
    fn test_scroll_to_element_default_duration() {
        let clock = Rc::new(ManualClock::new(0.0));
        let surface = HeadlessSurface::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0))
            .with_element("footer", Point::new(0.0, 900.0));
        let mut view = ScrollView::new(
            ScrollContext::new(clock.clone()),
            surface,
            ScrollOptions::default(),
        );

        view.scroll_to_element("footer", None);
        assert_eq!(view.phase(), ScrollPhase::Animating);

        clock.set(1000.0);
        view.tick();
        assert!(view.offset().y > -900.0);
        clock.set(1800.0);
        view.tick();
        assert_eq!(view.offset().y, -900.0);

        view.scroll_to_element("missing", Some(0.0));
        assert_eq!(view.offset().y, -900.0);
    }

    #[test]
    fn test_zoom_clamps_scale_and_offset() {
        let options = ScrollOptions::zoomable();
        let (clock, mut view) =
            view_with(options, Size::new(200.0, 200.0), Size::new(200.0, 200.0));

        view.zoom(100.0, 100.0, 10.0, None);
        assert_eq!(view.scale(), 4.0);
        assert_eq!(view.offset(), Point::new(-300.0, -300.0));
        assert_eq!(view.bounds().x.max_offset, -600.0);

        clock.set(200.0);
        view.tick();
        assert_eq!(view.surface().last_transform(), Some(view.transform()));
        assert!(view.is_ready());

        view.zoom(0.0, 0.0, 1.0, Some(0.0));
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.offset(), Point::ZERO);
    }

    #[test]
    fn test_disable_blocks_input_and_destroy_is_final() {
        let (_clock, mut view) = tall_view();
        view.disable();
        view.handle_pointer(&PointerEvent::start(10.0, 300.0, 0.0));
        assert_eq!(view.phase(), ScrollPhase::Idle);

        view.enable();
        view.handle_pointer(&PointerEvent::start(10.0, 300.0, 0.0));
        assert!(view.phase().is_dragging());

        view.destroy();
        assert!(view.is_destroyed());
        view.enable();
        view.scroll_to(0.0, -100.0, 0.0, false);
        assert_eq!(view.offset(), Point::ZERO);
        assert!(view.surface().indicator(Axis::Vertical).is_none());
    }
}
