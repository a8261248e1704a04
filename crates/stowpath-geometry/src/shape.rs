//! Axis-aligned boxes and rotated rectangles.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;
use crate::point::Point2D;

/// An axis-aligned box on the floor plane. `min` is never greater than `max`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Aabb {
    /// Corner with the smallest coordinates.
    pub min: Point2D,
    /// Corner with the largest coordinates.
    pub max: Point2D,
}

impl Aabb {
    /// Builds the box spanned by two opposite corners, in any order.
    #[must_use]
    pub fn from_corners(a: Point2D, b: Point2D) -> Self {
        Aabb {
            min: Point2D::new(a.x.min(b.x), a.z.min(b.z)),
            max: Point2D::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing<I: IntoIterator<Item = Point2D>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Aabb::from_corners(first, first), |acc, p| acc.union_point(p)))
    }

    /// Smallest box containing `self` and `p`.
    #[must_use]
    pub fn union_point(&self, p: Point2D) -> Aabb {
        Aabb {
            min: Point2D::new(self.min.x.min(p.x), self.min.z.min(p.z)),
            max: Point2D::new(self.max.x.max(p.x), self.max.z.max(p.z)),
        }
    }

    /// Extent along `x`.
    #[must_use]
    pub fn length(&self) -> Fixed {
        self.max.x - self.min.x
    }

    /// Extent along `z`.
    #[must_use]
    pub fn width(&self) -> Fixed {
        self.max.z - self.min.z
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point2D {
        Point2D::new(
            self.min.x + self.length().div_int(2),
            self.min.z + self.width().div_int(2),
        )
    }

    /// Grows the box by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: Fixed) -> Aabb {
        Aabb {
            min: Point2D::new(self.min.x - margin, self.min.z - margin),
            max: Point2D::new(self.max.x + margin, self.max.z + margin),
        }
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Moves `p` to the nearest point inside the box.
    #[must_use]
    pub fn clamp_point(&self, p: Point2D) -> Point2D {
        Point2D::new(
            p.x.max(self.min.x).min(self.max.x),
            p.z.max(self.min.z).min(self.max.z),
        )
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}

/// A rectangle placed at `position` and turned about its own center.
///
/// `position` is the minimum corner of the unrotated footprint; `length` runs
/// along local `x` and `width` along local `z`. `rotation` is in radians,
/// counter-clockwise.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrientedRect {
    /// Minimum corner of the unrotated footprint.
    pub position: Point2D,
    /// Extent along local `x` (m).
    pub length: Fixed,
    /// Extent along local `z` (m).
    pub width: Fixed,
    /// Rotation about the center (rad).
    pub rotation: Fixed,
}

impl OrientedRect {
    /// Construct a rectangle.
    #[must_use]
    pub const fn new(position: Point2D, length: Fixed, width: Fixed, rotation: Fixed) -> Self {
        OrientedRect { position, length, width, rotation }
    }

    /// Construct an unrotated rectangle.
    #[must_use]
    pub const fn axis_aligned(position: Point2D, length: Fixed, width: Fixed) -> Self {
        OrientedRect::new(position, length, width, Fixed::ZERO)
    }

    /// Center of the rectangle. Rotation does not move it.
    #[must_use]
    pub fn center(&self) -> Point2D {
        Point2D::new(
            self.position.x + self.length.div_int(2),
            self.position.z + self.width.div_int(2),
        )
    }

    /// Maps a point given relative to the unrotated minimum corner into world
    /// coordinates, applying the rotation about the center.
    #[must_use]
    pub fn local_to_world(&self, local: Point2D) -> Point2D {
        let unrotated = self.position + local;
        if self.rotation == Fixed::ZERO {
            return unrotated;
        }
        let (sin, cos) = self.rotation.sin_cos();
        unrotated.rotate_about(self.center(), sin, cos)
    }

    /// The four corners after rotation, counter-clockwise from the minimum corner.
    #[must_use]
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(Fixed::ZERO, Fixed::ZERO),
            Point2D::new(self.length, Fixed::ZERO),
            Point2D::new(self.length, self.width),
            Point2D::new(Fixed::ZERO, self.width),
        ]
        .map(|local| self.local_to_world(local))
    }

    /// Axis-aligned bounds of the rotated rectangle.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let [a, b, c, d] = self.corners();
        Aabb::from_corners(a, c).union_point(b).union_point(d)
    }
}
