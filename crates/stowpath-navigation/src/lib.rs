//! Grid-based path planning for warehouse pickers.
//!
//! A request loads one warehouse's geometry from a [`GeometrySource`] into a
//! [`WarehouseSnapshot`], rasterizes racks, pallets and (optionally) zones
//! into an occupancy grid, runs A* on it and simplifies the result into
//! waypoints. [`PathfindingService`] is the entry point; [`Planner`] does the
//! same work synchronously on a snapshot you already hold.
//!
//! ```no_run
//! use stowpath_geometry::Point2D;
//! use stowpath_navigation::{InMemoryGeometryStore, PathfindingService};
//!
//! # async fn run(store: InMemoryGeometryStore) -> Result<(), stowpath_navigation::PlannerError> {
//! let service = PathfindingService::new(store);
//! let result = service
//!     .find_path_between_points(1, Some(Point2D::ORIGIN), Some(Point2D::from_millis(9_000, 9_000)), None)
//!     .await?;
//! if result.success {
//!     println!("{} m over {} waypoints", result.distance, result.points.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod approach;
pub mod astar;
pub mod error;
pub mod layout;
pub mod map;
pub mod open_set;
pub mod options;
pub mod path;
pub mod planner;
pub mod result;
pub mod service;
pub mod snapshot;
pub mod source;

pub use error::PlannerError;
pub use layout::{CheckinRecord, PalletRecord, RackRecord, WarehouseLayout, ZoneRecord};
pub use options::{PathOptions, PlannerTuning};
pub use planner::Planner;
pub use result::{MultiPathResult, PathResult};
pub use service::PathfindingService;
pub use snapshot::{Obstacle, WarehouseSnapshot, ZonePolicy};
pub use source::{GeometrySource, InMemoryGeometryStore};
