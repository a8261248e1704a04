//! A* search over an occupancy grid.
//!
//! Moves go to the four edge neighbours at cost `c` (the cell size) and, when
//! diagonals are allowed, to the four corner neighbours at cost `c·√2`. A step
//! whose direction differs from the step that reached the current cell pays
//! an extra turn penalty, which steers the search towards straight runs.
//!
//! Every per-cell array is sized to the grid and owned by one search call.

use std::fmt;

use stowpath_geometry::Fixed;
use tracing::debug;

use crate::map::grid::{GridCell, OccupancyGrid};
use crate::open_set::{MinHeap, OpenNode};
use crate::options::{PathOptions, PlannerTuning};
use crate::path;
use crate::result::PathResult;

/// Edge moves first, then corner moves.
const MOVES: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Search parameters derived from the request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Allow the four corner moves.
    pub allow_diagonals: bool,
    /// Upper bound on node expansions.
    pub max_iterations: usize,
    /// Extra cost of a change of direction (m).
    pub turn_penalty: Fixed,
}

impl SearchParams {
    /// Combines request options and planner tuning for a grid of `cell_size`.
    pub fn new(options: &PathOptions, tuning: &PlannerTuning) -> Self {
        SearchParams {
            allow_diagonals: options.allow_diagonals,
            max_iterations: options.max_iterations,
            turn_penalty: options.cell_size * tuning.turn_penalty_factor,
        }
    }
}

/// Raw outcome of a search, before post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The cells from start to goal, or `None` if the goal was not reached.
    pub cells: Option<Vec<GridCell>>,
    /// Accumulated cost of the path, turn penalties included.
    pub cost: Fixed,
    /// Number of expanded nodes.
    pub explored: usize,
}

impl SearchOutcome {
    /// Returns `true` if the goal was reached.
    pub fn is_success(&self) -> bool {
        self.cells.is_some()
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cells {
            Some(cells) => write!(
                f,
                "SearchOutcome {{ success: true, cells: {}, cost: {}, explored: {} }}",
                cells.len(),
                self.cost,
                self.explored
            ),
            None => write!(f, "SearchOutcome {{ success: false, explored: {} }}", self.explored),
        }
    }
}

/// Octile distance between two cells, scaled to metres.
fn octile(a: GridCell, b: GridCell, straight: Fixed, diagonal: Fixed) -> Fixed {
    let dx = a.col.abs_diff(b.col) as i64;
    let dz = a.row.abs_diff(b.row) as i64;
    let (lo, hi) = if dx < dz { (dx, dz) } else { (dz, dx) };
    diagonal.mul_int(lo) + straight.mul_int(hi - lo)
}

/// Runs A* from `start` to `goal` on `grid`.
///
/// Blocked cells are never entered; the rasterizer guarantees that the start
/// and goal neighbourhoods are open. Ties on `f` go to the entry nearer the
/// goal, then to the entry pushed first, so equal inputs give equal paths.
///
/// # Arguments
/// * `grid` - The occupancy grid to plan on
/// * `start` - Start cell
/// * `goal` - Goal cell
/// * `params` - Move set, expansion cap and turn penalty
///
/// # Returns
/// * `SearchOutcome` - The cell chain if the goal was reached, with the number
///   of expanded nodes either way
pub fn search(grid: &OccupancyGrid, start: GridCell, goal: GridCell, params: &SearchParams) -> SearchOutcome {
    let tree = expand(grid, start, goal, params);
    SearchOutcome {
        cells: tree
            .goal
            .map(|goal| path::reconstruct_cells(&tree.came_from, goal, grid.config())),
        cost: tree.cost,
        explored: tree.explored,
    }
}

/// Predecessor links left behind by one search.
struct SearchTree {
    came_from: Vec<Option<usize>>,
    /// Flat goal index, set only when the goal was reached.
    goal: Option<usize>,
    cost: Fixed,
    explored: usize,
}

fn expand(grid: &OccupancyGrid, start: GridCell, goal: GridCell, params: &SearchParams) -> SearchTree {
    let config = grid.config();
    let straight = config.cell_size();
    let diagonal = straight * Fixed::SQRT_2;
    let moves = if params.allow_diagonals { &MOVES[..] } else { &MOVES[..4] };

    let cell_count = config.len();
    let mut g_score = vec![Fixed::MAX; cell_count];
    let mut came_from: Vec<Option<usize>> = vec![None; cell_count];
    let mut heading: Vec<Option<u8>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];

    let start_index = config.index(start);
    let goal_index = config.index(goal);

    let mut open_set = MinHeap::with_capacity(cell_count.min(1 << 16));
    let mut seq = 0u64;
    let start_h = octile(start, goal, straight, diagonal);
    g_score[start_index] = Fixed::ZERO;
    open_set.push(OpenNode {
        f: start_h,
        h: start_h,
        seq,
        index: start_index,
    });

    let mut explored = 0usize;

    while let Some(node) = open_set.pop() {
        let current_index = node.index;
        if closed[current_index] {
            continue;
        }
        if explored >= params.max_iterations {
            debug!(explored, max_iterations = params.max_iterations, "iteration cap reached");
            return SearchTree {
                came_from,
                goal: None,
                cost: Fixed::ZERO,
                explored,
            };
        }
        explored += 1;

        if current_index == goal_index {
            debug!(explored, cost = %g_score[goal_index], "goal reached");
            return SearchTree {
                came_from,
                goal: Some(goal_index),
                cost: g_score[goal_index],
                explored,
            };
        }
        closed[current_index] = true;

        let current = config.cell(current_index);
        let current_g = g_score[current_index];

        for (direction, &(dcol, drow)) in moves.iter().enumerate() {
            let Some(next) = config.offset(current, dcol, drow) else {
                continue;
            };
            let next_index = config.index(next);
            if closed[next_index] || grid.is_blocked_index(next_index) {
                continue;
            }

            let direction = direction as u8;
            let mut step = if direction < 4 { straight } else { diagonal };
            if heading[current_index].is_some_and(|previous| previous != direction) {
                step += params.turn_penalty;
            }

            let tentative = current_g + step;
            if tentative < g_score[next_index] {
                g_score[next_index] = tentative;
                came_from[next_index] = Some(current_index);
                heading[next_index] = Some(direction);

                let h = octile(next, goal, straight, diagonal);
                seq += 1;
                open_set.push(OpenNode {
                    f: tentative + h,
                    h,
                    seq,
                    index: next_index,
                });
            }
        }
    }

    debug!(explored, "open set exhausted");
    SearchTree {
        came_from,
        goal: None,
        cost: Fixed::ZERO,
        explored,
    }
}

/// Searches from `start` to `goal` and post-processes the result into
/// compressed waypoints at cell centers.
///
/// A failed search yields `success = false` with `"No path found"`.
pub fn find_path(
    grid: &OccupancyGrid,
    start: GridCell,
    goal: GridCell,
    options: &PathOptions,
    tuning: &PlannerTuning,
) -> PathResult {
    let tree = expand(grid, start, goal, &SearchParams::new(options, tuning));
    match tree.goal {
        Some(goal) => {
            let centers = path::reconstruct(&tree.came_from, goal, grid.config());
            let points = path::compress(&centers);
            let distance = path::distance(&points);
            PathResult::found(points, distance, tree.explored)
        }
        None => PathResult::no_path(tree.explored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::grid::GridConfig;
    use crate::result::NO_PATH_MESSAGE;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;
    use stowpath_geometry::Point2D;

    fn open_grid(cols: i64, rows: i64) -> OccupancyGrid {
        let config = GridConfig::new(
            Fixed::from_millis(cols * 500),
            Fixed::from_millis(rows * 500),
            Fixed::from_millis(500),
        )
        .unwrap();
        OccupancyGrid::new(config)
    }

    fn params(allow_diagonals: bool, turn_penalty: Fixed) -> SearchParams {
        SearchParams {
            allow_diagonals,
            max_iterations: 1_000_000,
            turn_penalty,
        }
    }

    /// Plain Dijkstra over the same move set, without turn penalties.
    fn reference_cost(grid: &OccupancyGrid, start: GridCell, goal: GridCell, allow_diagonals: bool) -> Option<Fixed> {
        let config = grid.config();
        let straight = config.cell_size();
        let diagonal = straight * Fixed::SQRT_2;
        let moves = if allow_diagonals { &MOVES[..] } else { &MOVES[..4] };

        let mut best = vec![Fixed::MAX; config.len()];
        let mut heap = BinaryHeap::new();
        best[config.index(start)] = Fixed::ZERO;
        heap.push(Reverse((Fixed::ZERO, config.index(start))));

        while let Some(Reverse((cost, index))) = heap.pop() {
            if cost > best[index] {
                continue;
            }
            if index == config.index(goal) {
                return Some(cost);
            }
            let cell = config.cell(index);
            for (i, &(dcol, drow)) in moves.iter().enumerate() {
                let Some(next) = config.offset(cell, dcol, drow) else {
                    continue;
                };
                let next_index = config.index(next);
                if grid.is_blocked_index(next_index) {
                    continue;
                }
                let next_cost = cost + if i < 4 { straight } else { diagonal };
                if next_cost < best[next_index] {
                    best[next_index] = next_cost;
                    heap.push(Reverse((next_cost, next_index)));
                }
            }
        }
        None
    }

    fn random_grid(rng: &mut StdRng, cols: i64, rows: i64, density: f64) -> OccupancyGrid {
        let mut grid = open_grid(cols, rows);
        let config = *grid.config();
        for index in 0..config.len() {
            if rng.random_bool(density) {
                grid.block(config.cell(index));
            }
        }
        grid
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(5, 5);
        let cell = GridCell::new(2, 2);
        let outcome = search(&grid, cell, cell, &params(true, Fixed::ZERO));
        assert_eq!(outcome.cells, Some(vec![cell]));
        assert_eq!(outcome.cost, Fixed::ZERO);
        assert_eq!(outcome.explored, 1);
    }

    #[test]
    fn test_straight_line() {
        let grid = open_grid(10, 3);
        let result = find_path(
            &grid,
            GridCell::new(0, 1),
            GridCell::new(9, 1),
            &PathOptions::default(),
            &PlannerTuning::default(),
        );
        assert!(result.success);
        assert_eq!(result.points, vec![Point2D::from_millis(250, 750), Point2D::from_millis(4_750, 750)]);
        assert_eq!(result.distance, Fixed::from_millis(4_500));
    }

    #[test]
    fn test_turn_penalty_keeps_one_turn() {
        let grid = open_grid(8, 8);
        let penalty = Fixed::from_millis(750);
        let outcome = search(&grid, GridCell::new(0, 0), GridCell::new(4, 2), &params(false, penalty));

        // Six edge moves and exactly one change of direction.
        assert_eq!(outcome.cost, Fixed::from_millis(3_000) + penalty);

        let cells = outcome.cells.unwrap();
        let centers: Vec<_> = cells.iter().map(|&c| grid.config().cell_center(c)).collect();
        assert_eq!(path::compress(&centers).len(), 3);
    }

    #[test]
    fn test_wall_without_gap_fails() {
        let mut grid = open_grid(9, 9);
        for row in 0..9 {
            grid.block(GridCell::new(4, row));
        }
        let options = PathOptions {
            max_iterations: 500,
            ..Default::default()
        };
        let result = find_path(
            &grid,
            GridCell::new(0, 4),
            GridCell::new(8, 4),
            &options,
            &PlannerTuning::default(),
        );
        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some(NO_PATH_MESSAGE));
        assert!(result.explored_nodes > 0);
        assert!(result.explored_nodes <= 500);
        // Everything left of the wall gets explored.
        assert_eq!(result.explored_nodes, 4 * 9);
    }

    #[test]
    fn test_iteration_cap_stops_search() {
        let grid = open_grid(40, 40);
        let options = PathOptions {
            max_iterations: 10,
            ..Default::default()
        };
        let result = find_path(
            &grid,
            GridCell::new(0, 0),
            GridCell::new(39, 0),
            &PathOptions {
                allow_diagonals: false,
                ..options
            },
            &PlannerTuning::default(),
        );
        assert!(!result.success);
        assert_eq!(result.explored_nodes, 10);
    }

    #[test]
    fn test_matches_dijkstra_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(0x5709);
        for round in 0..150 {
            let allow_diagonals = round % 2 == 0;
            let grid = random_grid(&mut rng, 12, 9, 0.25);
            let config = *grid.config();
            let start = config.cell(rng.random_range(0..config.len()));
            let goal = config.cell(rng.random_range(0..config.len()));
            if grid.is_blocked(start) || grid.is_blocked(goal) {
                continue;
            }

            let expected = reference_cost(&grid, start, goal, allow_diagonals);
            let outcome = search(&grid, start, goal, &params(allow_diagonals, Fixed::ZERO));
            assert_eq!(
                outcome.cells.is_some(),
                expected.is_some(),
                "round {} reachability",
                round
            );
            if let Some(expected) = expected {
                assert_eq!(outcome.cost, expected, "round {} cost", round);
            }

            let penalized = search(&grid, start, goal, &params(allow_diagonals, Fixed::from_millis(750)));
            if let (Some(cells), Some(expected)) = (penalized.cells, expected) {
                assert!(penalized.cost >= expected, "round {}", round);
                let centers: Vec<_> = cells.iter().map(|&c| config.cell_center(c)).collect();
                assert!(path::distance(&centers) + Fixed::from_micros(cells.len() as i64) >= expected);
            }
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut grid = random_grid(&mut rng, 30, 30, 0.2);
        let start = GridCell::new(0, 0);
        let goal = GridCell::new(29, 29);
        grid.clear(start);
        grid.clear(goal);

        let first = find_path(&grid, start, goal, &PathOptions::default(), &PlannerTuning::default());
        for _ in 0..5 {
            let again = find_path(&grid, start, goal, &PathOptions::default(), &PlannerTuning::default());
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_find_path_follows_search_cells() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = random_grid(&mut rng, 20, 20, 0.25);
        let start = GridCell::new(1, 1);
        let goal = GridCell::new(18, 17);
        grid.clear(start);
        grid.clear(goal);

        let options = PathOptions::default();
        let tuning = PlannerTuning::default();
        let outcome = search(&grid, start, goal, &SearchParams::new(&options, &tuning));
        let result = find_path(&grid, start, goal, &options, &tuning);

        assert_eq!(result.success, outcome.is_success());
        assert_eq!(result.explored_nodes, outcome.explored);
        if let Some(cells) = outcome.cells {
            let centers: Vec<_> = cells.iter().map(|&c| grid.config().cell_center(c)).collect();
            assert_eq!(result.points, path::compress(&centers));
            assert_eq!(result.start(), Some(grid.config().cell_center(start)));
            assert_eq!(result.end(), Some(grid.config().cell_center(goal)));
        }
    }

    #[test]
    fn test_outcome_display() {
        let grid = open_grid(3, 3);
        let outcome = search(&grid, GridCell::new(0, 0), GridCell::new(2, 2), &params(true, Fixed::ZERO));
        assert!(outcome.is_success());
        assert!(format!("{}", outcome).contains("success: true"));
    }
}
