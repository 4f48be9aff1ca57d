//! In-memory surface
//!
//! `HeadlessSurface` has fixed geometry and records everything the view
//! writes to it. Simulations and tests drive a [`ScrollView`] over it and
//! inspect the recorded transforms and indicators afterwards.
//!
//! [`ScrollView`]: crate::ScrollView

use rustc_hash::FxHashMap;

use kinetic_core::{Axis, Point, Size, Transform2D};

use crate::scrollbar::IndicatorGeometry;
use crate::surface::{Renderable, Scrollable, Transformable};

/// Recording surface with fixed geometry
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    viewport: Size,
    content: Option<Size>,
    origin: Point,
    snap_targets: FxHashMap<String, Vec<Point>>,
    elements: FxHashMap<String, Point>,
    rendered: Option<Transform2D>,

    transforms: Vec<Transform2D>,
    transition_ms: f64,
    indicators: FxHashMap<Axis, IndicatorGeometry>,
}

impl HeadlessSurface {
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            viewport,
            content: Some(content),
            ..Default::default()
        }
    }

    /// A surface with a viewport but no content
    pub fn empty(viewport: Size) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Register the children a selector matches
    pub fn with_snap_targets(mut self, selector: impl Into<String>, targets: Vec<Point>) -> Self {
        self.snap_targets.insert(selector.into(), targets);
        self
    }

    /// Register an element reachable through `scroll_to_element`
    pub fn with_element(mut self, id: impl Into<String>, position: Point) -> Self {
        self.elements.insert(id.into(), position);
        self
    }

    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_content_size(&mut self, content: Option<Size>) {
        self.content = content;
    }

    /// Pretend the host is mid-transition and currently shows `transform`
    pub fn set_rendered_transform(&mut self, transform: Option<Transform2D>) {
        self.rendered = transform;
    }

    /// Every transform written so far, oldest first
    pub fn transforms(&self) -> &[Transform2D] {
        &self.transforms
    }

    pub fn last_transform(&self) -> Option<Transform2D> {
        self.transforms.last().copied()
    }

    /// Transition duration set with the last transform
    pub fn transition_ms(&self) -> f64 {
        self.transition_ms
    }

    pub fn indicator(&self, axis: Axis) -> Option<&IndicatorGeometry> {
        self.indicators.get(&axis)
    }

    pub fn clear_history(&mut self) {
        self.transforms.clear();
    }
}

impl Scrollable for HeadlessSurface {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn content_size(&self) -> Option<Size> {
        self.content
    }

    fn viewport_origin(&self) -> Point {
        self.origin
    }

    fn snap_targets(&self, selector: &str) -> Vec<Point> {
        self.snap_targets.get(selector).cloned().unwrap_or_default()
    }

    fn element_offset(&self, id: &str) -> Option<Point> {
        self.elements.get(id).copied()
    }
}

impl Transformable for HeadlessSurface {
    fn apply_transform(&mut self, transform: Transform2D) {
        self.transforms.push(transform);
    }

    fn set_transition_duration(&mut self, duration_ms: f64) {
        self.transition_ms = duration_ms;
    }

    fn rendered_transform(&self) -> Option<Transform2D> {
        self.rendered
    }
}

impl Renderable for HeadlessSurface {
    fn update_indicator(&mut self, indicator: &IndicatorGeometry) {
        self.indicators.insert(indicator.axis, *indicator);
    }

    fn remove_indicator(&mut self, axis: Axis) {
        self.indicators.remove(&axis);
    }
}
