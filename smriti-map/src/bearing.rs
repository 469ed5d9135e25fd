//! Normalized directional values.
//!
//! A [`Bearing`] is stored as a unit vector `(sin, cos)` rather than a raw
//! angle, so composition and comparison never need wrap-around handling:
//! adding two bearings is a complex product and the result is canonical by
//! construction.

use crate::point::Point2;

/// A direction measured clockwise from north, held as a unit vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bearing {
    /// Sine of the angle (east component).
    sin: f64,
    /// Cosine of the angle (north component).
    cos: f64,
}

impl Bearing {
    /// North (0 degrees).
    pub const NORTH: Bearing = Bearing { sin: 0.0, cos: 1.0 };
    /// East (90 degrees).
    pub const EAST: Bearing = Bearing { sin: 1.0, cos: 0.0 };
    /// South (180 degrees).
    pub const SOUTH: Bearing = Bearing { sin: 0.0, cos: -1.0 };
    /// West (-90 degrees).
    pub const WEST: Bearing = Bearing { sin: -1.0, cos: 0.0 };

    /// Create a bearing from radians.
    pub fn from_rad(rad: f64) -> Self {
        Self {
            sin: rad.sin(),
            cos: rad.cos(),
        }
    }

    /// Create a bearing from degrees.
    pub fn from_deg(deg: f64) -> Self {
        Self::from_rad(deg.to_radians())
    }

    /// Create a bearing from a direction vector.
    ///
    /// Returns [`Bearing::NORTH`] for the null vector.
    pub fn from_vector(dx: f64, dy: f64) -> Self {
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            Bearing::NORTH
        } else {
            Self {
                sin: dx / len,
                cos: dy / len,
            }
        }
    }

    /// The direction from one point to another.
    pub fn direction(from: &Point2, to: &Point2) -> Self {
        Self::from_vector(to.x - from.x, to.y - from.y)
    }

    /// Sine of the bearing.
    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// Cosine of the bearing.
    pub fn cos(&self) -> f64 {
        self.cos
    }

    /// The sum of two bearings.
    pub fn add(&self, other: Bearing) -> Self {
        Self {
            sin: self.sin * other.cos + self.cos * other.sin,
            cos: self.cos * other.cos - self.sin * other.sin,
        }
    }

    /// The difference of two bearings (angular distance, signed).
    pub fn sub(&self, other: Bearing) -> Self {
        Self {
            sin: self.sin * other.cos - self.cos * other.sin,
            cos: self.cos * other.cos + self.sin * other.sin,
        }
    }

    /// The negated bearing (mirror across north).
    pub fn neg(&self) -> Self {
        Self {
            sin: -self.sin,
            cos: self.cos,
        }
    }

    /// The opposite bearing (rotated by 180 degrees).
    pub fn opposite(&self) -> Self {
        Self {
            sin: -self.sin,
            cos: -self.cos,
        }
    }

    /// The bearing scaled by a factor of its angle.
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_rad(self.to_rad() * factor)
    }

    /// True if the bearing is positive (east of north).
    pub fn positive(&self) -> bool {
        self.sin > 0.0
    }

    /// True if the bearing points roughly north, within an epsilon on the
    /// east component.
    pub fn is_front(&self, epsilon: f64) -> bool {
        self.cos > 0.0 && self.sin.abs() <= epsilon
    }

    /// True if the bearing points roughly south, within an epsilon on the
    /// east component.
    pub fn is_rear(&self, epsilon: f64) -> bool {
        self.cos < 0.0 && self.sin.abs() <= epsilon
    }

    /// True if the angular distance to `other` is within `epsilon`.
    pub fn is_close_to(&self, other: Bearing, epsilon: Bearing) -> bool {
        self.sub(other).is_front(epsilon.sin.abs())
    }

    /// The point at `distance` along this bearing from `origin`.
    pub fn at(&self, origin: &Point2, distance: f64) -> Point2 {
        Point2::new(
            origin.x + distance * self.sin,
            origin.y + distance * self.cos,
        )
    }

    /// The bearing in radians, in `(-PI, PI]`.
    pub fn to_rad(&self) -> f64 {
        if self.sin == 0.0 {
            if self.cos >= 0.0 {
                0.0
            } else {
                std::f64::consts::PI
            }
        } else {
            self.sin.atan2(self.cos)
        }
    }

    /// The bearing in degrees.
    pub fn to_deg(&self) -> f64 {
        self.to_rad().to_degrees()
    }

    /// The bearing in rounded integer degrees, in `[-180, 179]`.
    pub fn to_int_deg(&self) -> i32 {
        let deg = self.to_deg().round() as i32;
        if deg < 180 {
            deg
        } else {
            deg - 360
        }
    }
}

impl Default for Bearing {
    fn default() -> Self {
        Bearing::NORTH
    }
}

impl std::fmt::Display for Bearing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} DEG", self.to_int_deg())
    }
}
