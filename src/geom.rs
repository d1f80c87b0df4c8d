//! Plain 2D value types shared by the grid and the partitioner.

use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Creates a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin, used as the centroid of an empty partition
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// |dx| + |dy|
    #[inline]
    pub fn manhattan_distance(self, other: Self) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Straight-line distance
    #[inline]
    pub fn euclidean_distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box given by its lower-left and upper-right corners.
///
/// The box is closed: points on the border are inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Lower-left corner
    pub ll: Point2D,
    /// Upper-right corner
    pub ur: Point2D,
}

impl BoundingBox {
    /// Creates a box from its corners
    pub const fn new(ll: Point2D, ur: Point2D) -> Self {
        Self { ll, ur }
    }

    /// Creates a box from raw coordinates (`min_x`, `min_y`, `max_x`, `max_y`)
    pub const fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            ll: Point2D::new(min_x, min_y),
            ur: Point2D::new(max_x, max_y),
        }
    }

    /// Degenerate box covering a single point
    pub const fn from_point(p: Point2D) -> Self {
        Self { ll: p, ur: p }
    }

    /// Grows the box so that it encloses `p`
    pub fn expand_to(&mut self, p: Point2D) {
        self.ll.x = self.ll.x.min(p.x);
        self.ll.y = self.ll.y.min(p.y);
        self.ur.x = self.ur.x.max(p.x);
        self.ur.y = self.ur.y.max(p.y);
    }

    /// Closed containment test
    #[inline]
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.ll.x && p.x <= self.ur.x && p.y >= self.ll.y && p.y <= self.ur.y
    }

    /// Extent along x
    pub fn width(&self) -> f64 {
        self.ur.x - self.ll.x
    }

    /// Extent along y
    pub fn height(&self) -> f64 {
        self.ur.y - self.ll.y
    }

    /// Geometric center
    pub fn center(&self) -> Point2D {
        Point2D::new((self.ll.x + self.ur.x) / 2.0, (self.ll.y + self.ur.y) / 2.0)
    }
}
