//! Planar geometry primitives shared by the skeleton graph and the
//! medial-axis construction.

use serde::{Deserialize, Serialize};

/// A point (or free vector) in the plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint of the segment `self`–`other`.
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Vector from `origin` to `self`.
    pub fn relative_to(&self, origin: &Point2) -> Point2 {
        Point2::new(self.x - origin.x, self.y - origin.y)
    }

    /// Length of the point seen as a vector.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Centroid of a set of points, `None` when the set is empty.
    pub fn centroid<'a, I>(points: I) -> Option<Point2>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let (sum_x, sum_y, count) = points
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(sx, sy, n), p| (sx + p.x, sy + p.y, n + 1));
        (count > 0).then(|| Point2::new(sum_x / count as f64, sum_y / count as f64))
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Unsigned angle in radians, in `[0, π]`, between two vectors.
///
/// Both vectors are normalised and the dot product is clamped to `[-1, 1]`
/// before `acos`. A zero vector yields NaN, like the underlying division.
pub fn angle_between(a: &Point2, b: &Point2) -> f64 {
    let (na, nb) = (a.norm(), b.norm());
    let dot = (a.x / na) * (b.x / nb) + (a.y / na) * (b.y / nb);
    dot.clamp(-1.0, 1.0).acos()
}
