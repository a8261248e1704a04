//! Path post-processing: reconstruction, compression and length.

use stowpath_geometry::{Fixed, Point2D};

use crate::map::grid::{GridCell, GridConfig};

/// Walks predecessor links back from `goal` and returns the cells from start
/// to goal.
///
/// # Arguments
/// * `came_from` - Predecessor of every flat cell index, `None` for the start
///   and for cells never reached
/// * `goal` - Flat index of the goal cell
/// * `config` - The grid the indices belong to
pub fn reconstruct_cells(came_from: &[Option<usize>], goal: usize, config: &GridConfig) -> Vec<GridCell> {
    let mut cells = vec![config.cell(goal)];
    let mut current = goal;
    while let Some(previous) = came_from[current] {
        // Links form a tree rooted at the start; a longer chain means corruption.
        if cells.len() > came_from.len() {
            break;
        }
        cells.push(config.cell(previous));
        current = previous;
    }
    cells.reverse();
    cells
}

/// Like [`reconstruct_cells`], returning the world position of each cell center.
pub fn reconstruct(came_from: &[Option<usize>], goal: usize, config: &GridConfig) -> Vec<Point2D> {
    reconstruct_cells(came_from, goal, config)
        .into_iter()
        .map(|cell| config.cell_center(cell))
        .collect()
}

/// Keeps the first point, the last point and every point where the step
/// direction (sign of `dx`, sign of `dz`) changes. Repeated points collapse.
pub fn compress(points: &[Point2D]) -> Vec<Point2D> {
    let mut distinct = points.to_vec();
    distinct.dedup();

    if distinct.len() <= 2 {
        return distinct;
    }

    let direction = |a: Point2D, b: Point2D| ((b.x - a.x).signum(), (b.z - a.z).signum());

    let mut out = Vec::with_capacity(distinct.len());
    out.push(distinct[0]);
    for window in distinct.windows(3) {
        let [prev, curr, next] = [window[0], window[1], window[2]];
        if direction(prev, curr) != direction(curr, next) {
            out.push(curr);
        }
    }
    out.extend(distinct.last().copied());
    out
}

/// Sum of the Euclidean lengths of consecutive segments.
pub fn distance(points: &[Point2D]) -> Fixed {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}
