//! Host capabilities
//!
//! A scroll view drives whatever the host renders through three small
//! traits instead of owning a widget:
//!
//! - [`Scrollable`] reports geometry (viewport, content, snap targets)
//! - [`Transformable`] receives the content transform
//! - [`Renderable`] receives scrollbar indicator geometry
//!
//! Anything implementing all three is a [`Surface`].

use kinetic_core::{Axis, Point, Size, Transform2D};

use crate::scrollbar::IndicatorGeometry;

/// Geometry source for a scroll view
pub trait Scrollable {
    /// Size of the visible area
    fn viewport_size(&self) -> Size;

    /// Unscaled size of the scrolled content, `None` if there is no content
    fn content_size(&self) -> Option<Size>;

    /// Viewport's top-left corner in pointer coordinates
    fn viewport_origin(&self) -> Point {
        Point::ZERO
    }

    /// Content-space positions of the children matching `selector`, in order
    fn snap_targets(&self, _selector: &str) -> Vec<Point> {
        Vec::new()
    }

    /// Content-space position of the element with the given id
    fn element_offset(&self, _id: &str) -> Option<Point> {
        None
    }
}

/// Receiver of the content transform
pub trait Transformable {
    fn apply_transform(&mut self, transform: Transform2D);

    /// Duration over which the host should ease to the next transform
    ///
    /// Only used by the transition driver; `0` means "apply immediately".
    fn set_transition_duration(&mut self, _duration_ms: f64) {}

    /// Transform currently on screen, if the host can report it mid-transition
    fn rendered_transform(&self) -> Option<Transform2D> {
        None
    }
}

/// Receiver of scrollbar indicator geometry
pub trait Renderable {
    fn update_indicator(&mut self, _indicator: &IndicatorGeometry) {}

    fn remove_indicator(&mut self, _axis: Axis) {}
}

/// Everything a scroll view needs from its host
pub trait Surface: Scrollable + Transformable + Renderable {}

impl<T: Scrollable + Transformable + Renderable> Surface for T {}
