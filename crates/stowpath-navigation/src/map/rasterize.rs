//! Rasterization of warehouse geometry into an occupancy grid.

use stowpath_geometry::Fixed;
use tracing::trace;

use crate::error::PlannerError;
use crate::map::grid::{GridCell, GridConfig, OccupancyGrid};
use crate::snapshot::{WarehouseSnapshot, ZonePolicy};

/// Sizes a grid to the snapshot's floor with the given cell size.
///
/// # Errors
/// * `PlannerError::InvalidRequest` if the cell size is not positive or the
///   grid would be too large.
pub fn build_grid(snapshot: &WarehouseSnapshot, cell_size: Fixed) -> Result<GridConfig, PlannerError> {
    GridConfig::new(snapshot.length(), snapshot.width(), cell_size)
}

/// Marks every cell covered by an obstacle, grown by `safety_margin`, as
/// blocked, then reopens `start`, `goal` and their eight neighbours.
pub fn build_obstacle_mask(
    snapshot: &WarehouseSnapshot,
    config: &GridConfig,
    safety_margin: Fixed,
    start: GridCell,
    goal: GridCell,
    zones: ZonePolicy,
) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(*config);

    for obstacle in snapshot.obstacles(zones) {
        let bounds = obstacle.bounds().expand(safety_margin);
        let (Some(cols), Some(rows)) = (
            config.col_span(bounds.min.x, bounds.max.x),
            config.row_span(bounds.min.z, bounds.max.z),
        ) else {
            trace!(kind = obstacle.kind(), id = obstacle.id(), "obstacle outside grid");
            continue;
        };

        for row in rows {
            for col in cols.clone() {
                grid.block(GridCell::new(col, row));
            }
        }
    }

    force_clear(&mut grid, start);
    force_clear(&mut grid, goal);
    grid
}

/// Opens `center` and its 3x3 neighbourhood.
fn force_clear(grid: &mut OccupancyGrid, center: GridCell) {
    let config = *grid.config();
    for drow in -1..=1 {
        for dcol in -1..=1 {
            if let Some(cell) = config.offset(center, dcol, drow) {
                grid.clear(cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PalletRecord, RackRecord, WarehouseLayout, ZoneRecord};
    use stowpath_geometry::Point2D;

    fn snapshot(rotation: Fixed) -> WarehouseSnapshot {
        WarehouseSnapshot::build(&WarehouseLayout {
            id: 1,
            length: Fixed::from_int(10),
            width: Fixed::from_int(10),
            zones: vec![ZoneRecord {
                id: 5,
                position_x: Fixed::ZERO,
                position_z: Fixed::from_int(8),
                length: Fixed::from_int(2),
                width: Fixed::from_int(2),
            }],
            racks: vec![RackRecord {
                id: 1,
                position_x: Fixed::from_int(3),
                position_z: Fixed::from_millis(4_500),
                length: Fixed::from_int(4),
                width: Fixed::from_int(1),
                rotation,
                shelf_ids: vec![],
            }],
            ..Default::default()
        })
        .unwrap()
    }

    fn far_corners(config: &GridConfig) -> (GridCell, GridCell) {
        (GridCell::new(config.cols() - 1, 0), GridCell::new(config.cols() - 1, 1))
    }

    fn blocked_extent(grid: &OccupancyGrid) -> (usize, usize) {
        let config = grid.config();
        let blocked: Vec<GridCell> = (0..config.len())
            .filter(|&i| grid.is_blocked_index(i))
            .map(|i| config.cell(i))
            .collect();
        let cols = blocked.iter().map(|c| c.col).max().unwrap() - blocked.iter().map(|c| c.col).min().unwrap() + 1;
        let rows = blocked.iter().map(|c| c.row).max().unwrap() - blocked.iter().map(|c| c.row).min().unwrap() + 1;
        (cols, rows)
    }

    #[test]
    fn test_rack_blocks_margin_expanded_box() {
        let snapshot = snapshot(Fixed::ZERO);
        let config = build_grid(&snapshot, Fixed::from_millis(500)).unwrap();
        let (start, goal) = far_corners(&config);
        let grid = build_obstacle_mask(&snapshot, &config, Fixed::from_millis(250), start, goal, ZonePolicy::Ignore);

        // [2.75, 7.25] x [4.25, 5.75] covers cols 5..=14 and rows 8..=11.
        assert_eq!(grid.blocked_count(), 10 * 4);
        assert!(grid.is_blocked(GridCell::new(5, 8)));
        assert!(grid.is_blocked(GridCell::new(14, 11)));
        assert!(!grid.is_blocked(GridCell::new(4, 8)));
        assert!(!grid.is_blocked(GridCell::new(15, 11)));
        assert!(!grid.is_blocked(GridCell::new(10, 12)));
    }

    #[test]
    fn test_quarter_turn_swaps_blocked_extent() {
        let straight = snapshot(Fixed::ZERO);
        let turned = snapshot(Fixed::FRAC_PI_2);
        let config = build_grid(&straight, Fixed::from_millis(500)).unwrap();
        let (start, goal) = far_corners(&config);

        let a = build_obstacle_mask(&straight, &config, Fixed::ZERO, start, goal, ZonePolicy::Ignore);
        let b = build_obstacle_mask(&turned, &config, Fixed::ZERO, start, goal, ZonePolicy::Ignore);

        assert_eq!(blocked_extent(&a), (8, 2));
        assert_eq!(blocked_extent(&b), (2, 8));
    }

    #[test]
    fn test_zones_follow_policy() {
        let snapshot = snapshot(Fixed::ZERO);
        let config = build_grid(&snapshot, Fixed::from_millis(500)).unwrap();
        let (start, goal) = far_corners(&config);
        let zone_cell = GridCell::new(1, 17);

        let ignore = build_obstacle_mask(&snapshot, &config, Fixed::ZERO, start, goal, ZonePolicy::Ignore);
        assert!(!ignore.is_blocked(zone_cell));

        let avoid = build_obstacle_mask(&snapshot, &config, Fixed::ZERO, start, goal, ZonePolicy::Avoid { allowed: None });
        assert!(avoid.is_blocked(zone_cell));

        let allowed = build_obstacle_mask(
            &snapshot,
            &config,
            Fixed::ZERO,
            start,
            goal,
            ZonePolicy::Avoid { allowed: Some(5) },
        );
        assert_eq!(allowed, ignore);
    }

    #[test]
    fn test_start_and_goal_neighbourhoods_forced_open() {
        let snapshot = snapshot(Fixed::ZERO);
        let config = build_grid(&snapshot, Fixed::from_millis(500)).unwrap();
        let start = config.world_to_cell(Point2D::from_millis(5_000, 5_000));
        let (_, goal) = far_corners(&config);
        let grid = build_obstacle_mask(&snapshot, &config, Fixed::from_millis(250), start, goal, ZonePolicy::Ignore);

        for drow in -1..=1 {
            for dcol in -1..=1 {
                let cell = config.offset(start, dcol, drow).unwrap();
                assert!(!grid.is_blocked(cell), "{} should be open", cell);
            }
        }
        assert!(grid.is_blocked(GridCell::new(5, 10)));
    }

    #[test]
    fn test_pallet_outside_floor_is_ignored() {
        let layout = WarehouseLayout {
            id: 1,
            length: Fixed::from_int(4),
            width: Fixed::from_int(4),
            pallets: vec![PalletRecord {
                id: 1,
                length: Fixed::ONE,
                width: Fixed::ONE,
                position_x: Fixed::from_int(20),
                position_z: Fixed::from_int(20),
                ..Default::default()
            }],
            ..Default::default()
        };
        let snapshot = WarehouseSnapshot::build(&layout).unwrap();
        let config = build_grid(&snapshot, Fixed::ONE).unwrap();
        let grid = build_obstacle_mask(
            &snapshot,
            &config,
            Fixed::from_millis(250),
            GridCell::new(0, 0),
            GridCell::new(0, 0),
            ZonePolicy::Ignore,
        );
        assert_eq!(grid.blocked_count(), 0);
    }

    #[test]
    fn test_mask_is_deterministic() {
        let snapshot = snapshot(Fixed::from_micros(523_599));
        let config = build_grid(&snapshot, Fixed::from_millis(250)).unwrap();
        let (start, goal) = far_corners(&config);
        let first = build_obstacle_mask(&snapshot, &config, Fixed::from_millis(250), start, goal, ZonePolicy::Ignore);
        for _ in 0..5 {
            let again = build_obstacle_mask(&snapshot, &config, Fixed::from_millis(250), start, goal, ZonePolicy::Ignore);
            assert_eq!(again.as_slice(), first.as_slice());
        }
    }
}
