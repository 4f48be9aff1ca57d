//! Snap page sets
//!
//! A page set is the ordered list of offsets a snapping gesture may settle
//! on, starting at the top/left edge and descending. It is rebuilt on every
//! refresh and never mutated in between.

use kinetic_core::Point;

use crate::bounds::Boundary;

/// Ordered snap offsets along one axis
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageSet {
    offsets: Vec<f32>,
}

impl PageSet {
    pub fn new(offsets: Vec<f32>) -> Self {
        Self { offsets }
    }

    /// One page per viewport length, plus a final partial page that ends
    /// exactly at the far edge
    pub fn fixed(boundary: &Boundary, page_size: f32) -> Self {
        let page_size = if page_size.is_finite() && page_size >= 1.0 {
            page_size
        } else {
            1.0
        };

        let mut offsets = Vec::new();
        let mut pos = boundary.min_offset;
        while pos >= boundary.max_offset {
            offsets.push(pos);
            pos -= page_size;
        }

        let remainder = (boundary.max_offset - boundary.min_offset) % page_size;
        if remainder.abs() > 0.5 {
            if let Some(&last) = offsets.last() {
                if last > boundary.max_offset {
                    offsets.push(boundary.max_offset);
                }
            }
        }

        Self { offsets }
    }

    /// One page per target, where each target is a content-space position
    /// (e.g. the top-left corner of a child element)
    pub fn from_targets(
        targets: impl IntoIterator<Item = f32>,
        boundary: &Boundary,
        scale: f32,
    ) -> Self {
        let offsets = targets
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| {
                let offset = -t * scale;
                if offset < boundary.max_offset {
                    boundary.max_offset
                } else {
                    offset
                }
            })
            .collect();
        Self { offsets }
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.offsets.get(index).copied()
    }

    /// Clamp an index into range (0 for an empty set)
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.offsets.len().saturating_sub(1))
    }

    /// Index of the page closest to `offset` (ties go to the lower index)
    pub fn nearest(&self, offset: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &page) in self.offsets.iter().enumerate() {
            let d = (page - offset).abs();
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Snap pages for both axes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pages {
    pub x: PageSet,
    pub y: PageSet,
}

impl Pages {
    /// Page indices nearest to an offset
    pub fn nearest(&self, offset: Point) -> (usize, usize) {
        (
            self.x.nearest(offset.x).unwrap_or(0),
            self.y.nearest(offset.y).unwrap_or(0),
        )
    }
}
