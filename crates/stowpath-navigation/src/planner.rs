//! Multi-target orchestration over one warehouse snapshot.
//!
//! The planner turns "go to this pallet" and "visit these pallets in order"
//! into single searches. Each leg gets its own grid and obstacle mask; the
//! snapshot is shared by all legs of one request.

use stowpath_geometry::Point2D;
use tracing::{debug, info, warn};

use crate::approach::{ground_candidates, rack_standing_point};
use crate::astar::{self, SearchParams};
use crate::error::PlannerError;
use crate::map::grid::OccupancyGrid;
use crate::map::rasterize::{build_grid, build_obstacle_mask};
use crate::options::{PathOptions, PlannerTuning};
use crate::result::{MultiPathResult, PathResult};
use crate::snapshot::{PalletPlacement, WarehouseSnapshot};

/// Plans paths on one warehouse snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    snapshot: &'a WarehouseSnapshot,
    tuning: PlannerTuning,
}

impl<'a> Planner<'a> {
    /// Creates a planner over `snapshot`.
    pub fn new(snapshot: &'a WarehouseSnapshot, tuning: PlannerTuning) -> Self {
        Planner { snapshot, tuning }
    }

    /// The snapshot being planned on.
    pub fn snapshot(&self) -> &'a WarehouseSnapshot {
        self.snapshot
    }

    /// Builds the obstacle mask a search from `start` to `goal` runs on.
    ///
    /// `target_zone` is the zone the goal belongs to, which stays open under
    /// zone avoidance unless another zone is explicitly allowed.
    pub fn leg_grid(
        &self,
        start: Point2D,
        goal: Point2D,
        options: &PathOptions,
        target_zone: Option<i64>,
    ) -> Result<OccupancyGrid, PlannerError> {
        let config = build_grid(self.snapshot, options.cell_size)?;
        Ok(build_obstacle_mask(
            self.snapshot,
            &config,
            options.safety_margin,
            config.world_to_cell(start),
            config.world_to_cell(goal),
            options.zone_policy(target_zone),
        ))
    }

    fn search_leg(
        &self,
        start: Point2D,
        goal: Point2D,
        options: &PathOptions,
        target_zone: Option<i64>,
    ) -> Result<PathResult, PlannerError> {
        let grid = self.leg_grid(start, goal, options, target_zone)?;
        let config = grid.config();
        Ok(astar::find_path(
            &grid,
            config.world_to_cell(start),
            config.world_to_cell(goal),
            options,
            &self.tuning,
        ))
    }

    /// Plans a path between two points with the caller's options as given.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` if the grid cannot be built.
    pub fn path_between(
        &self,
        start: Point2D,
        goal: Point2D,
        options: &PathOptions,
    ) -> Result<PathResult, PlannerError> {
        let result = self.search_leg(start, goal, options, None)?;
        info!(
            warehouse_id = self.snapshot.warehouse_id(),
            %start,
            %goal,
            success = result.success,
            explored = result.explored_nodes,
            distance = %result.distance,
            "point to point path"
        );
        Ok(result)
    }

    /// Plans a path from `start` to a standing point next to `pallet_id`.
    ///
    /// A pallet on a known rack shelf is approached from the closer rack face
    /// with diagonals off. Any other pallet is approached from whichever of its
    /// four sides gives the shortest path; the explored count covers every
    /// side tried.
    ///
    /// # Errors
    /// * `PlannerError::PalletNotFound` if the snapshot has no such pallet.
    /// * `PlannerError::InvalidRequest` if the grid cannot be built.
    pub fn path_to_pallet(
        &self,
        pallet_id: i64,
        start: Point2D,
        options: &PathOptions,
    ) -> Result<PathResult, PlannerError> {
        let pallet = self
            .snapshot
            .pallet(pallet_id)
            .ok_or(PlannerError::PalletNotFound(pallet_id))?;

        let result = self.approach(pallet, start, options)?;
        info!(
            warehouse_id = self.snapshot.warehouse_id(),
            pallet_id,
            %start,
            success = result.success,
            explored = result.explored_nodes,
            distance = %result.distance,
            "pallet path"
        );
        Ok(result)
    }

    fn approach(
        &self,
        pallet: &PalletPlacement,
        start: Point2D,
        options: &PathOptions,
    ) -> Result<PathResult, PlannerError> {
        if let Some(rack) = pallet.shelf_id.and_then(|id| self.snapshot.rack_for_shelf(id)) {
            let goal = rack_standing_point(self.snapshot, rack, pallet, start, &self.tuning);
            debug!(pallet_id = pallet.id, rack_id = rack.id, %goal, "rack approach");
            return self.search_leg(start, goal, &options.with_diagonals(false), pallet.zone_id);
        }

        if let Some(shelf_id) = pallet.shelf_id {
            debug!(pallet_id = pallet.id, shelf_id, "shelf has no rack; approaching from the floor");
        }
        self.ground_approach(pallet, start, options)
    }

    fn ground_approach(
        &self,
        pallet: &PalletPlacement,
        start: Point2D,
        options: &PathOptions,
    ) -> Result<PathResult, PlannerError> {
        let candidates = ground_candidates(self.snapshot, pallet, start, &self.tuning);
        if candidates.is_empty() {
            return Ok(PathResult::failure(
                format!("No standing point around pallet {} is inside the warehouse", pallet.id),
                0,
            ));
        }

        let mut explored = 0;
        let mut best: Option<PathResult> = None;
        for candidate in candidates {
            let result = self.search_leg(start, candidate.point, options, pallet.zone_id)?;
            debug!(
                pallet_id = pallet.id,
                side = ?candidate.side,
                success = result.success,
                distance = %result.distance,
                "ground candidate"
            );
            explored += result.explored_nodes;
            if !result.success {
                continue;
            }
            if best.as_ref().is_none_or(|b| result.distance < b.distance) {
                best = Some(result);
            }
        }

        Ok(match best {
            Some(result) => PathResult { explored_nodes: explored, ..result },
            None => PathResult::no_path(explored),
        })
    }

    /// Visits `pallet_ids` in order, starting from `start`.
    ///
    /// Each leg starts where the last successful leg ended. A failed leg,
    /// including one for an unknown pallet, is recorded and does not move the
    /// current position; its explored nodes still count towards the total.
    pub fn path_to_pallets(&self, pallet_ids: &[i64], start: Point2D, options: &PathOptions) -> MultiPathResult {
        let mut batch = MultiPathResult::new();
        let mut current = start;

        for &pallet_id in pallet_ids {
            let leg = match self.path_to_pallet(pallet_id, current, options) {
                Ok(leg) => leg,
                Err(err) => {
                    warn!(pallet_id, error = %err, "leg failed");
                    PathResult::failure(err.to_string(), 0)
                }
            };
            if leg.success {
                if let Some(end) = leg.end() {
                    current = end;
                }
            }
            batch.push_leg(leg);
        }

        info!(
            warehouse_id = self.snapshot.warehouse_id(),
            legs = batch.paths.len(),
            successful = batch.successful_legs(),
            explored = batch.total_explored_nodes,
            distance = %batch.total_distance,
            "multi pallet route"
        );
        batch
    }

    /// Renders the obstacle mask of a point-to-point leg with its path drawn
    /// on top, for debugging.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` if the grid cannot be built.
    pub fn render_path_between(
        &self,
        start: Point2D,
        goal: Point2D,
        options: &PathOptions,
    ) -> Result<String, PlannerError> {
        let grid = self.leg_grid(start, goal, options, None)?;
        let config = grid.config();
        let outcome = astar::search(
            &grid,
            config.world_to_cell(start),
            config.world_to_cell(goal),
            &SearchParams::new(options, &self.tuning),
        );
        debug!(%outcome, "rendering leg");
        Ok(grid.render_with_path(&outcome.cells.unwrap_or_default()))
    }
}
