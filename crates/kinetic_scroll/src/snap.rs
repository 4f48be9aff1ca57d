//! Snap resolution
//!
//! Picks the page a gesture settles on and how long the settle takes.
//!
//! Direction follows the sign of the last drag delta: `+1` means the offset
//! was increasing (travelling back toward the first page), `-1` means it was
//! decreasing (forward), `0` means no movement.

use kinetic_core::Point;

use crate::pages::{PageSet, Pages};

/// Settle time for a full page-to-page move
pub const PAGE_DURATION_MS: f32 = 500.0;

/// Shortest settle time
pub const MIN_SNAP_DURATION_MS: f32 = 200.0;

/// Outcome of snap resolution for both axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapResult {
    pub target: Point,
    pub page_x: usize,
    pub page_y: usize,
    pub duration_ms: f32,
}

/// Resolved page on one axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSnap {
    pub page: usize,
    pub offset: f32,
    /// Unrounded settle time for this axis
    pub duration_ms: f32,
}

/// Resolve one axis
///
/// Returns `None` when the axis has no pages; the caller keeps the
/// destination as-is in that case.
pub fn resolve_axis(
    pages: &PageSet,
    destination: f32,
    direction: i8,
    start_page: usize,
    current: f32,
) -> Option<AxisSnap> {
    let mut page = pages.nearest(destination)?;
    let start_page = pages.clamp_index(start_page);

    // Flicking backward from the page we started on must leave it
    if page == start_page && direction > 0 && page > 0 {
        page -= 1;
    }

    let offset = pages.get(page)?;
    let start_offset = pages.get(start_page).unwrap_or(offset);
    let page_distance = (offset - start_offset).abs();
    let duration_ms = if page_distance > 0.0 {
        (current - offset).abs() / page_distance * PAGE_DURATION_MS
    } else {
        0.0
    };

    Some(AxisSnap {
        page,
        offset,
        duration_ms,
    })
}

/// Resolve both axes
pub fn resolve(
    pages: &Pages,
    destination: Point,
    direction: (i8, i8),
    start_page: (usize, usize),
    current: Point,
) -> SnapResult {
    let x = resolve_axis(&pages.x, destination.x, direction.0, start_page.0, current.x);
    let y = resolve_axis(&pages.y, destination.y, direction.1, start_page.1, current.y);

    let tx = x.map(|s| s.duration_ms).unwrap_or(0.0);
    let ty = y.map(|s| s.duration_ms).unwrap_or(0.0);
    let duration_ms = tx.max(ty).round().max(MIN_SNAP_DURATION_MS);

    SnapResult {
        target: Point::new(
            x.map(|s| s.offset).unwrap_or(destination.x),
            y.map(|s| s.offset).unwrap_or(destination.y),
        ),
        page_x: x.map(|s| s.page).unwrap_or(start_page.0),
        page_y: y.map(|s| s.page).unwrap_or(start_page.1),
        duration_ms,
    }
}
