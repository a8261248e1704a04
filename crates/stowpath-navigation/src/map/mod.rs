//! Map-related functionality for navigation.
//!
//! This module provides the occupancy grid the search runs on and the
//! rasterizer that fills it from a warehouse snapshot.

pub mod grid;
pub mod rasterize;

pub use grid::{GridCell, GridConfig, OccupancyGrid};
pub use rasterize::{build_grid, build_obstacle_mask};
