#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` fixed-point geometry library for warehouse floor plans."]
#![doc = ""]
#![doc = "This crate provides an exact six-digit decimal type, planar points on the"]
#![doc = "warehouse floor, axis-aligned boxes and rotated rectangles. All arithmetic is"]
#![doc = "integer based, so an obstacle edge lands on the same side of a grid line on"]
#![doc = "every platform."]

pub mod error;
pub mod fixed;
pub mod point;
pub mod shape;

pub use error::GeometryError;
pub use fixed::Fixed;
pub use point::Point2D;
pub use shape::{Aabb, OrientedRect};
