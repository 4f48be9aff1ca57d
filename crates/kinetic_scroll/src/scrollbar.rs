//! Scrollbar indicator geometry
//!
//! Each scrollable axis gets a track running along the viewport edge and an
//! indicator whose length reflects how much of the content is visible. The
//! indicator follows the content offset and, when the content is dragged past
//! an edge, shrinks and pins to the end of the track.

use kinetic_core::Axis;

use crate::bounds::ScrollBounds;

/// Smallest indicator length
pub const MIN_INDICATOR_SIZE: f32 = 8.0;

/// Indicator shrink per pixel of overscroll
pub const OVERSCROLL_SHRINK: f32 = 3.0;

/// Track inset at the leading end
pub const TRACK_INSET: f32 = 2.0;

/// Track inset at the trailing end when the other axis also shows a bar
pub const TRACK_CORNER_INSET: f32 = 7.0;

/// Fade-out time for hidden indicators
pub const FADE_MS: f32 = 300.0;

/// What the host draws for one indicator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorGeometry {
    pub axis: Axis,
    /// Track length along `axis`
    pub track_length: f32,
    /// Indicator length along `axis`
    pub size: f32,
    /// Indicator position from the start of the track
    pub position: f32,
    pub visible: bool,
    /// Duration of the opacity change (non-zero only when fading out)
    pub fade_ms: f32,
}

/// Track measurements for one axis, rebuilt on refresh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scrollbar {
    axis: Axis,
    track_length: f32,
    indicator_size: f32,
    max_position: f32,
    /// Track pixels per offset pixel (negative, offsets are negative)
    prop: f32,
    min_offset: f32,
}

impl Scrollbar {
    /// Measure the track for `axis`
    ///
    /// Returns `None` when the axis has nothing to scroll. `corner` is true
    /// when the other axis also shows a bar, which shortens this track.
    pub fn measure(axis: Axis, bounds: &ScrollBounds, corner: bool) -> Option<Self> {
        let boundary = bounds.axis(axis);
        if !bounds.scrolls(axis) || !boundary.is_scrollable() {
            return None;
        }

        let trailing = if corner { TRACK_CORNER_INSET } else { TRACK_INSET };
        let track_length =
            (bounds.viewport.get(axis) - TRACK_INSET - trailing).max(MIN_INDICATOR_SIZE);
        let scroller = bounds.scroller.get(axis).max(1.0);
        let indicator_size = (track_length * track_length / scroller)
            .round()
            .max(MIN_INDICATOR_SIZE);
        let max_position = track_length - indicator_size;

        Some(Self {
            axis,
            track_length,
            indicator_size,
            max_position,
            prop: max_position / (boundary.max_offset - boundary.min_offset),
            min_offset: boundary.min_offset,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn track_length(&self) -> f32 {
        self.track_length
    }

    /// Indicator length when the content is within bounds
    pub fn indicator_size(&self) -> f32 {
        self.indicator_size
    }

    /// Indicator geometry for a content offset
    pub fn indicator(
        &self,
        offset: f32,
        fixed: bool,
        visible: bool,
        fade: bool,
    ) -> IndicatorGeometry {
        let mut size = self.indicator_size;
        let mut position = self.prop * (offset - self.min_offset);

        if position < 0.0 {
            if !fixed {
                size = (self.indicator_size + (position * OVERSCROLL_SHRINK).round())
                    .max(MIN_INDICATOR_SIZE);
            }
            position = 0.0;
        } else if position > self.max_position {
            if fixed {
                position = self.max_position;
            } else {
                let shrink = ((position - self.max_position) * OVERSCROLL_SHRINK).round();
                size = (self.indicator_size - shrink).max(MIN_INDICATOR_SIZE);
                position = self.max_position + (self.indicator_size - size);
            }
        }

        IndicatorGeometry {
            axis: self.axis,
            track_length: self.track_length,
            size,
            position,
            visible,
            fade_ms: if !visible && fade { FADE_MS } else { 0.0 },
        }
    }
}
