//! Planar points on the warehouse floor.

use core::fmt;
use core::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;

/// A point `(x, z)` on the warehouse floor, in meters.
///
/// Height is irrelevant for a flat-floor planner, so the vertical axis is
/// dropped and the floor plane keeps the warehouse's `x`/`z` naming.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2D {
    /// Position along the warehouse length (m).
    pub x: Fixed,
    /// Position along the warehouse width (m).
    pub z: Fixed,
}

impl Point2D {
    /// The warehouse origin.
    pub const ORIGIN: Point2D = Point2D::new(Fixed::ZERO, Fixed::ZERO);

    /// Construct a new point.
    #[must_use]
    pub const fn new(x: Fixed, z: Fixed) -> Self {
        Point2D { x, z }
    }

    /// Construct a point from thousandths of a meter, handy for literals.
    #[must_use]
    pub const fn from_millis(x: i64, z: i64) -> Self {
        Point2D::new(Fixed::from_millis(x), Fixed::from_millis(z))
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point2D) -> Fixed {
        Fixed::hypot(other.x - self.x, other.z - self.z)
    }

    /// Rotates this point about `center` given a precomputed sine and cosine.
    ///
    /// Positive angles turn counter-clockwise from the `x` axis towards `z`.
    #[must_use]
    pub fn rotate_about(self, center: Point2D, sin: Fixed, cos: Fixed) -> Point2D {
        let dx = self.x - center.x;
        let dz = self.z - center.z;
        Point2D::new(
            center.x + dx * cos - dz * sin,
            center.z + dx * sin + dz * cos,
        )
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point2D::from_millis(0, 0);
        let b = Point2D::from_millis(3_000, 4_000);
        assert_eq!(a.distance(b), Fixed::from_int(5));
        assert_eq!(b.distance(a), Fixed::from_int(5));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let (sin, cos) = Fixed::FRAC_PI_2.sin_cos();
        let center = Point2D::from_millis(1_000, 1_000);
        let p = Point2D::from_millis(2_000, 1_000);
        assert_eq!(p.rotate_about(center, sin, cos), Point2D::from_millis(1_000, 2_000));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Point2D::from_millis(1_500, -250)), "(1.5, -0.25)");
    }
}
