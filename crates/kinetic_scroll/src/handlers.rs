//! Lifecycle callbacks
//!
//! Hosts observe a scroll view by registering callbacks per event kind:
//!
//! ```
//! use kinetic_scroll::ScrollHandlers;
//!
//! let mut handlers = ScrollHandlers::new();
//! handlers.on_scroll_end(|ctx| {
//!     println!("settled at {:?} on page {:?}", ctx.offset, ctx.page);
//! });
//! ```
//!
//! Callbacks only receive a snapshot, never the view, so they cannot
//! re-enter it while it is dispatching.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use kinetic_core::Point;

/// Lifecycle notifications a scroll view emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollEventKind {
    /// Pointer went down, before any state was touched
    BeforeScrollStart,
    /// Pointer went down and a gesture was armed
    ScrollStart,
    /// The content moved under a drag
    ScrollMove,
    /// Pointer lifted, before the release was resolved
    BeforeScrollEnd,
    /// The view came to rest after moving
    ScrollEnd,
    /// Pointer lifted and the release was resolved
    TouchEnd,
    /// An animation step finished
    AnimationEnd,
    /// Boundaries and pages were recomputed
    Refresh,
    ZoomStart,
    Zoom,
    ZoomEnd,
    /// A tap was passed through as a click
    Click,
}

/// Callback for scroll events
///
/// Uses Rc since the engine is single-threaded.
pub type ScrollCallback = Rc<dyn Fn(&ScrollEventContext)>;

/// Snapshot passed to callbacks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEventContext {
    pub kind: ScrollEventKind,
    pub offset: Point,
    pub scale: f32,
    /// Current page per axis
    pub page: (usize, usize),
    /// Pointer position for pointer-driven events
    pub position: Option<Point>,
    /// Pinch rotation in degrees (zoom events only)
    pub rotation: f32,
}

impl ScrollEventContext {
    pub fn new(kind: ScrollEventKind, offset: Point, scale: f32, page: (usize, usize)) -> Self {
        Self {
            kind,
            offset,
            scale,
            page,
            position: None,
            rotation: 0.0,
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Registered callbacks keyed by event kind
#[derive(Default, Clone)]
pub struct ScrollHandlers {
    handlers: FxHashMap<ScrollEventKind, Vec<ScrollCallback>>,
}

impl std::fmt::Debug for ScrollHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollHandlers")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScrollHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn has_handler(&self, kind: ScrollEventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Register a handler for an event kind
    pub fn on<F>(&mut self, kind: ScrollEventKind, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.handlers.entry(kind).or_default().push(Rc::new(handler));
    }

    /// Invoke every handler registered for `ctx.kind`, in registration order
    pub fn dispatch(&self, ctx: &ScrollEventContext) {
        if let Some(handlers) = self.handlers.get(&ctx.kind) {
            for handler in handlers {
                handler(ctx);
            }
        }
    }

    /// Drop every handler
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    // =========================================================================
    // Convenience registration methods
    // =========================================================================

    pub fn on_before_scroll_start<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::BeforeScrollStart, handler);
    }

    pub fn on_scroll_start<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::ScrollStart, handler);
    }

    pub fn on_scroll_move<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::ScrollMove, handler);
    }

    pub fn on_before_scroll_end<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::BeforeScrollEnd, handler);
    }

    pub fn on_scroll_end<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::ScrollEnd, handler);
    }

    pub fn on_touch_end<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::TouchEnd, handler);
    }

    pub fn on_animation_end<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::AnimationEnd, handler);
    }

    pub fn on_refresh<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::Refresh, handler);
    }

    pub fn on_zoom_start<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::ZoomStart, handler);
    }

    pub fn on_zoom<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::Zoom, handler);
    }

    pub fn on_zoom_end<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::ZoomEnd, handler);
    }

    /// Register a handler for taps passed through as clicks
    pub fn on_click<F>(&mut self, handler: F)
    where
        F: Fn(&ScrollEventContext) + 'static,
    {
        self.on(ScrollEventKind::Click, handler);
    }
}
