use serde::Serialize;
use stowpath_navigation::{
    GeometrySource, MultiPathResult, PathOptions, PathResult, PathfindingService, Planner, PlannerError,
    WarehouseSnapshot,
};
use tracing::{debug, warn};

use crate::settings::Query;

/// What one query produced.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Single(PathResult),
    Route(MultiPathResult),
}

impl Outcome {
    pub fn success(&self) -> bool {
        match self {
            Outcome::Single(result) => result.success,
            Outcome::Route(route) => route.success,
        }
    }
}

/// Runs `query` against `service`.
pub async fn run<S: GeometrySource>(
    service: &PathfindingService<S>,
    query: Query,
) -> Result<Outcome, PlannerError> {
    match query {
        Query::Pallet {
            warehouse_id,
            pallet_id,
            start,
            options,
        } => {
            let result = service
                .find_path_to_pallet(warehouse_id, pallet_id, start, options)
                .await?;
            let options = options.unwrap_or_else(|| service.defaults().with_diagonals(false));
            log_grid(service, warehouse_id, &result, &options).await;
            Ok(Outcome::Single(result))
        }
        Query::Points {
            warehouse_id,
            start,
            goal,
            options,
        } => {
            let result = service
                .find_path_between_points(warehouse_id, start, goal, options)
                .await?;
            let options = options.unwrap_or(*service.defaults());
            log_grid(service, warehouse_id, &result, &options).await;
            Ok(Outcome::Single(result))
        }
        Query::Pallets {
            warehouse_id,
            pallet_ids,
            start,
            options,
        } => service
            .find_path_to_multiple_pallets(warehouse_id, &pallet_ids, start, options)
            .await
            .map(Outcome::Route),
    }
}

/// Logs the obstacle grid with a successful path drawn on it.
async fn log_grid<S: GeometrySource>(
    service: &PathfindingService<S>,
    warehouse_id: i64,
    result: &PathResult,
    options: &PathOptions,
) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let (Some(start), Some(goal)) = (result.start(), result.end()) else {
        return;
    };
    let rendered = service
        .source()
        .load_layout(warehouse_id)
        .await
        .and_then(|layout| WarehouseSnapshot::build(&layout))
        .and_then(|snapshot| Planner::new(&snapshot, *service.tuning()).render_path_between(start, goal, options));
    match rendered {
        Ok(grid) => debug!(warehouse_id, "path on grid:\n{}", grid),
        Err(err) => warn!(warehouse_id, error = %err, "could not render grid"),
    }
}
