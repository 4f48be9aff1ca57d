//! Geometry primitives
//!
//! All values are in logical pixels. Scroll offsets follow the translate
//! convention: `0` is the upper/left edge and scrolling toward the end of the
//! content makes the offset more negative.

use std::ops::{Add, Mul, Sub};

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component along an axis
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Set the component along an axis
    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Angle of the vector from this point to `other`, in degrees
    pub fn angle_to(&self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Round both components to whole pixels
    pub fn round(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along an axis
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Replace non-finite or sub-pixel extents with 1px
    ///
    /// A zero-sized viewport would otherwise divide by zero in page and
    /// scrollbar math.
    pub fn at_least_one(&self) -> Size {
        let fix = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        Size::new(fix(self.width), fix(self.height))
    }
}

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }
}

/// Scroll axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The perpendicular axis
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Translate + uniform scale, the only transform the scroller ever writes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub translate: Point,
    pub scale: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn new(translate: Point, scale: f32) -> Self {
        Self { translate, scale }
    }

    pub const fn identity() -> Self {
        Self {
            translate: Point::ZERO,
            scale: 1.0,
        }
    }

    /// Rescale about `origin` (in viewport space) so the content point under
    /// it stays put
    pub fn zoom_about(&self, origin: Point, new_scale: f32) -> Transform2D {
        let relative = new_scale / self.scale;
        let local = origin - self.translate;
        Transform2D {
            translate: origin - local * relative,
            scale: new_scale,
        }
    }

    /// Map a content-space point to viewport space
    pub fn apply(&self, point: Point) -> Point {
        self.translate + point * self.scale
    }
}
