//! The request boundary of the planner.
//!
//! [`PathfindingService`] validates requests, loads warehouse geometry from
//! a [`GeometrySource`] and runs the search on tokio's blocking pool. Only a
//! malformed request comes back as an `Err`; every other failure becomes a
//! result with `success = false`.

use std::sync::Arc;

use stowpath_geometry::Point2D;
use tokio::task;
use tracing::{info, warn};

use crate::error::PlannerError;
use crate::options::{PathOptions, PlannerTuning};
use crate::planner::Planner;
use crate::result::{MultiPathResult, PathResult};
use crate::snapshot::WarehouseSnapshot;
use crate::source::GeometrySource;

/// Pathfinding over warehouses supplied by a geometry source.
#[derive(Debug)]
pub struct PathfindingService<S> {
    source: Arc<S>,
    defaults: PathOptions,
    tuning: PlannerTuning,
}

impl<S> Clone for PathfindingService<S> {
    fn clone(&self) -> Self {
        PathfindingService {
            source: Arc::clone(&self.source),
            defaults: self.defaults,
            tuning: self.tuning,
        }
    }
}

fn require_positive(name: &str, id: i64) -> Result<(), PlannerError> {
    if id <= 0 {
        return Err(PlannerError::InvalidRequest(format!(
            "{} must be a positive integer, got {}",
            name, id
        )));
    }
    Ok(())
}

impl<S: GeometrySource> PathfindingService<S> {
    /// Creates a service with default options and tuning.
    pub fn new(source: S) -> Self {
        Self::with_settings(Arc::new(source), PathOptions::default(), PlannerTuning::default())
    }

    /// Creates a service sharing `source`, with the given defaults.
    ///
    /// `defaults` apply to point-to-point requests that carry no options;
    /// pallet requests without options use the same values with diagonals off.
    pub fn with_settings(source: Arc<S>, defaults: PathOptions, tuning: PlannerTuning) -> Self {
        PathfindingService {
            source,
            defaults,
            tuning,
        }
    }

    /// The geometry source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Default options for point-to-point requests.
    pub fn defaults(&self) -> &PathOptions {
        &self.defaults
    }

    /// Planner tuning.
    pub fn tuning(&self) -> &PlannerTuning {
        &self.tuning
    }

    /// Plans a path to the pallet `pallet_id`.
    ///
    /// Without a `start` the picker starts at the warehouse's check-in bay
    /// center, or at the origin if there is none.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` for non-positive ids or invalid options.
    pub async fn find_path_to_pallet(
        &self,
        warehouse_id: i64,
        pallet_id: i64,
        start: Option<Point2D>,
        options: Option<PathOptions>,
    ) -> Result<PathResult, PlannerError> {
        require_positive("warehouse_id", warehouse_id)?;
        require_positive("pallet_id", pallet_id)?;
        let options = self.pallet_options(options)?;

        let snapshot = match self.load(warehouse_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => return Ok(PathResult::failure(err.to_string(), 0)),
        };

        let tuning = self.tuning;
        let outcome = task::spawn_blocking(move || {
            let start = start.unwrap_or_else(|| snapshot.default_start());
            Planner::new(&snapshot, tuning).path_to_pallet(pallet_id, start, &options)
        })
        .await;

        Ok(flatten(outcome).unwrap_or_else(|err| {
            warn!(warehouse_id, pallet_id, error = %err, "pallet path failed");
            PathResult::failure(err.to_string(), 0)
        }))
    }

    /// Plans a path between two points.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` for a non-positive warehouse id, a
    ///   missing endpoint or invalid options.
    pub async fn find_path_between_points(
        &self,
        warehouse_id: i64,
        start: Option<Point2D>,
        goal: Option<Point2D>,
        options: Option<PathOptions>,
    ) -> Result<PathResult, PlannerError> {
        require_positive("warehouse_id", warehouse_id)?;
        let (Some(start), Some(goal)) = (start, goal) else {
            return Err(PlannerError::InvalidRequest(
                "start and goal are both required".to_string(),
            ));
        };
        let options = self.point_options(options)?;

        let snapshot = match self.load(warehouse_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => return Ok(PathResult::failure(err.to_string(), 0)),
        };

        let tuning = self.tuning;
        let outcome = task::spawn_blocking(move || {
            Planner::new(&snapshot, tuning).path_between(start, goal, &options)
        })
        .await;

        Ok(flatten(outcome).unwrap_or_else(|err| {
            warn!(warehouse_id, error = %err, "point to point path failed");
            PathResult::failure(err.to_string(), 0)
        }))
    }

    /// Plans a route visiting `pallet_ids` in order.
    ///
    /// The warehouse is loaded once for all legs. Legs that fail are recorded
    /// and skipped; the batch itself only fails when the warehouse cannot be
    /// loaded.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` for non-positive ids, an empty pallet
    ///   list or invalid options.
    pub async fn find_path_to_multiple_pallets(
        &self,
        warehouse_id: i64,
        pallet_ids: &[i64],
        start: Option<Point2D>,
        options: Option<PathOptions>,
    ) -> Result<MultiPathResult, PlannerError> {
        require_positive("warehouse_id", warehouse_id)?;
        if pallet_ids.is_empty() {
            return Err(PlannerError::InvalidRequest(
                "pallet_ids must not be empty".to_string(),
            ));
        }
        for &pallet_id in pallet_ids {
            require_positive("pallet_id", pallet_id)?;
        }
        let options = self.pallet_options(options)?;

        let snapshot = match self.load(warehouse_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => return Ok(MultiPathResult::failure(err.to_string())),
        };

        let tuning = self.tuning;
        let pallet_ids = pallet_ids.to_vec();
        let outcome = task::spawn_blocking(move || {
            let start = start.unwrap_or_else(|| snapshot.default_start());
            Planner::new(&snapshot, tuning).path_to_pallets(&pallet_ids, start, &options)
        })
        .await;

        Ok(outcome.unwrap_or_else(|err| {
            warn!(warehouse_id, error = %err, "multi pallet route failed");
            MultiPathResult::failure(err.to_string())
        }))
    }

    async fn load(&self, warehouse_id: i64) -> Result<WarehouseSnapshot, PlannerError> {
        let loaded = self
            .source
            .load_layout(warehouse_id)
            .await
            .and_then(|layout| WarehouseSnapshot::build(&layout));

        match &loaded {
            Ok(snapshot) => info!(
                warehouse_id,
                racks = snapshot.racks().len(),
                pallets = snapshot.pallets().len(),
                zones = snapshot.zones().len(),
                "warehouse loaded"
            ),
            Err(err) => warn!(warehouse_id, error = %err, "warehouse could not be loaded"),
        }
        loaded
    }

    fn point_options(&self, options: Option<PathOptions>) -> Result<PathOptions, PlannerError> {
        let options = options.unwrap_or(self.defaults);
        options.validate()?;
        self.tuning.validate()?;
        Ok(options)
    }

    fn pallet_options(&self, options: Option<PathOptions>) -> Result<PathOptions, PlannerError> {
        let options = options.unwrap_or_else(|| self.defaults.with_diagonals(false));
        options.validate()?;
        self.tuning.validate()?;
        Ok(options)
    }
}

/// Folds a panicked or cancelled blocking task into a planner error.
fn flatten<T>(outcome: Result<Result<T, PlannerError>, task::JoinError>) -> Result<T, PlannerError> {
    outcome.map_err(|err| PlannerError::Internal(err.to_string()))?
}
