//! World-space point type.

use serde::{Deserialize, Serialize};

/// A point in world coordinates (meters).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Origin point.
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    /// Create a point from coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared euclidean distance to another point.
    pub fn distance_sq(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Distance from this point to the segment `(a, b)`.
    ///
    /// Used by trajectory clearance checks against cell centers.
    pub fn distance_to_segment(&self, a: &Point2, b: &Point2) -> f64 {
        let abx = b.x - a.x;
        let aby = b.y - a.y;
        let len_sq = abx * abx + aby * aby;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = ((self.x - a.x) * abx + (self.y - a.y) * aby) / len_sq;
        let t = t.clamp(0.0, 1.0);
        let proj = Point2::new(a.x + t * abx, a.y + t * aby);
        self.distance(&proj)
    }
}
