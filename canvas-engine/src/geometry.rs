//! Document-space geometry: points, sizes and axis-aligned rectangles.

use serde::{Deserialize, Serialize};

/// A point in document space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (never negative).
    pub width: f64,
    /// Height (never negative).
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both corners, in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(min_x, min_y, a.x.max(b.x) - min_x, a.y.max(b.y) - min_y)
    }

    /// Smallest rectangle containing every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the two rectangles overlap. Touching edges count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    /// Whether the point lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        Self::new(
            min_x,
            min_y,
            self.max_x().max(other.max_x()) - min_x,
            self.max_y().max(other.max_y()) - min_y,
        )
    }

    /// Grow by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Axis-aligned bounds of this rectangle rotated about its centre.
    #[must_use]
    pub fn rotated_bounds(&self, degrees: f64) -> Self {
        if (degrees % 360.0).abs() < f64::EPSILON {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let half_w = (self.width * cos.abs() + self.height * sin.abs()) / 2.0;
        let half_h = (self.width * sin.abs() + self.height * cos.abs()) / 2.0;
        let c = self.center();
        Self::new(c.x - half_w, c.y - half_h, half_w * 2.0, half_h * 2.0)
    }
}
