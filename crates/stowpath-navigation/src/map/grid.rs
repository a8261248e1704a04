//! Occupancy grid over the warehouse floor.
//!
//! The grid is anchored at the warehouse origin. Cell `(col, row)` covers
//! `[col·c, (col+1)·c) x [row·c, (row+1)·c)` for a cell size `c`, and cells
//! are stored row-major, so the flat index is `row * cols + col`.

#![warn(missing_docs)]

use std::fmt;
use std::ops::RangeInclusive;

use stowpath_geometry::{Fixed, Point2D};

use crate::error::PlannerError;

/// Largest number of cells a single search may allocate.
pub const MAX_GRID_CELLS: usize = 16_000_000;

/// A cell address: column along `x`, row along `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    /// Column index (along `x`).
    pub col: usize,
    /// Row index (along `z`).
    pub row: usize,
}

impl GridCell {
    /// Construct a new cell address.
    pub const fn new(col: usize, row: usize) -> Self {
        GridCell { col, row }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.col, self.row)
    }
}

/// Dimensions and resolution of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    cols: usize,
    rows: usize,
    cell_size: Fixed,
}

impl GridConfig {
    /// Creates a grid covering `length x width` with square cells.
    ///
    /// Each axis gets `ceil(extent / cell_size)` cells and never fewer than one.
    ///
    /// # Arguments
    /// * `length` - Extent along `x` (m)
    /// * `width` - Extent along `z` (m)
    /// * `cell_size` - Side of one cell (m)
    ///
    /// # Returns
    /// * `Result<Self, PlannerError>` - The grid, or an error if the cell size
    ///   is not positive or the grid would be too large
    pub fn new(length: Fixed, width: Fixed, cell_size: Fixed) -> Result<Self, PlannerError> {
        if !cell_size.is_positive() {
            return Err(PlannerError::InvalidRequest(
                "cell_size must be positive".to_string(),
            ));
        }

        let cells_along = |extent: Fixed| {
            usize::try_from(extent.ceil_div(cell_size).max(1)).map_err(|_| {
                PlannerError::InvalidRequest("grid dimensions out of range".to_string())
            })
        };
        let cols = cells_along(length)?;
        let rows = cells_along(width)?;

        match cols.checked_mul(rows) {
            Some(total) if total <= MAX_GRID_CELLS => Ok(GridConfig {
                cols,
                rows,
                cell_size,
            }),
            _ => Err(PlannerError::InvalidRequest(format!(
                "a {}x{} grid exceeds {} cells; use a larger cell_size",
                cols, rows, MAX_GRID_CELLS
            ))),
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Side of one cell (m).
    pub fn cell_size(&self) -> Fixed {
        self.cell_size
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Always `false`; a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flat row-major index of `cell`.
    pub fn index(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Cell address of a flat index.
    pub fn cell(&self, index: usize) -> GridCell {
        GridCell::new(index % self.cols, index / self.cols)
    }

    /// Returns the cell at a signed offset, or `None` outside the grid.
    pub fn offset(&self, cell: GridCell, dcol: i64, drow: i64) -> Option<GridCell> {
        let col = cell.col.checked_add_signed(dcol as isize)?;
        let row = cell.row.checked_add_signed(drow as isize)?;
        (col < self.cols && row < self.rows).then_some(GridCell::new(col, row))
    }

    /// Cell containing `point`. Points outside the grid map to the nearest
    /// edge cell.
    pub fn world_to_cell(&self, point: Point2D) -> GridCell {
        let clamp = |coord: Fixed, count: usize| {
            let i = coord.floor_div(self.cell_size).max(0) as usize;
            i.min(count - 1)
        };
        GridCell::new(clamp(point.x, self.cols), clamp(point.z, self.rows))
    }

    /// World position of the center of `cell`.
    pub fn cell_center(&self, cell: GridCell) -> Point2D {
        let half = self.cell_size.div_int(2);
        Point2D::new(
            self.cell_size.mul_int(cell.col as i64) + half,
            self.cell_size.mul_int(cell.row as i64) + half,
        )
    }

    /// Columns whose extent overlaps the open interval `(min, max)` on `x`.
    pub fn col_span(&self, min: Fixed, max: Fixed) -> Option<RangeInclusive<usize>> {
        self.span(min, max, self.cols)
    }

    /// Rows whose extent overlaps the open interval `(min, max)` on `z`.
    pub fn row_span(&self, min: Fixed, max: Fixed) -> Option<RangeInclusive<usize>> {
        self.span(min, max, self.rows)
    }

    fn span(&self, min: Fixed, max: Fixed, count: usize) -> Option<RangeInclusive<usize>> {
        let first = min.floor_div(self.cell_size).max(0);
        let last = (max.ceil_div(self.cell_size) - 1).min(count as i64 - 1);
        (first <= last).then(|| first as usize..=last as usize)
    }
}

/// Binary occupancy of every cell of a [`GridConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    config: GridConfig,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates a grid with every cell open.
    pub fn new(config: GridConfig) -> Self {
        OccupancyGrid {
            config,
            blocked: vec![false; config.len()],
        }
    }

    /// The grid geometry.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The mask as a flat row-major slice, `true` meaning blocked.
    pub fn as_slice(&self) -> &[bool] {
        &self.blocked
    }

    /// Returns `true` if `cell` is blocked.
    pub fn is_blocked(&self, cell: GridCell) -> bool {
        self.blocked[self.config.index(cell)]
    }

    /// Returns `true` if the cell at flat `index` is blocked.
    pub fn is_blocked_index(&self, index: usize) -> bool {
        self.blocked[index]
    }

    /// Marks `cell` as blocked.
    pub fn block(&mut self, cell: GridCell) {
        let index = self.config.index(cell);
        self.blocked[index] = true;
    }

    /// Marks `cell` as open.
    pub fn clear(&mut self, cell: GridCell) {
        let index = self.config.index(cell);
        self.blocked[index] = false;
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }

    /// Renders the grid with a path overlay: `S` start, `G` goal, `*` the
    /// cells in between. Rows are printed from the highest `z` down.
    pub fn render_with_path(&self, path: &[GridCell]) -> String {
        let mut glyphs: Vec<char> = self
            .blocked
            .iter()
            .map(|&b| if b { '#' } else { '.' })
            .collect();

        for cell in path {
            glyphs[self.config.index(*cell)] = '*';
        }
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            glyphs[self.config.index(*first)] = 'S';
            glyphs[self.config.index(*last)] = 'G';
        }

        let mut out = String::with_capacity((self.config.cols + 1) * self.config.rows);
        for row in (0..self.config.rows).rev() {
            let start = row * self.config.cols;
            out.extend(&glyphs[start..start + self.config.cols]);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_path(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GridConfig {
        GridConfig::new(Fixed::from_int(10), Fixed::from_int(5), Fixed::from_millis(500)).unwrap()
    }

    #[test]
    fn test_dimensions_round_up() {
        assert_eq!((config().cols(), config().rows()), (20, 10));
        let odd = GridConfig::new(
            Fixed::from_millis(10_100),
            Fixed::from_millis(4_900),
            Fixed::from_millis(500),
        )
        .unwrap();
        assert_eq!((odd.cols(), odd.rows()), (21, 10));
    }

    #[test]
    fn test_tiny_warehouse_has_one_cell() {
        let tiny = GridConfig::new(
            Fixed::from_millis(100),
            Fixed::from_millis(100),
            Fixed::from_int(1),
        )
        .unwrap();
        assert_eq!(tiny.len(), 1);
        assert_eq!(tiny.world_to_cell(Point2D::from_millis(50, 50)), GridCell::new(0, 0));
    }

    #[test]
    fn test_rejects_invalid_cell_size() {
        assert!(matches!(
            GridConfig::new(Fixed::ONE, Fixed::ONE, Fixed::ZERO),
            Err(PlannerError::InvalidRequest(_))
        ));
        assert!(GridConfig::new(
            Fixed::from_int(100_000),
            Fixed::from_int(100_000),
            Fixed::from_millis(1)
        )
        .is_err());
    }

    #[test]
    fn test_world_cell_conversions() {
        let config = config();
        assert_eq!(config.world_to_cell(Point2D::ORIGIN), GridCell::new(0, 0));
        assert_eq!(
            config.world_to_cell(Point2D::from_millis(2_499, 1_000)),
            GridCell::new(4, 2)
        );
        // Boundary and out-of-range points clamp to edge cells.
        assert_eq!(
            config.world_to_cell(Point2D::from_millis(10_000, 5_000)),
            GridCell::new(19, 9)
        );
        assert_eq!(
            config.world_to_cell(Point2D::from_millis(-3_000, 99_000)),
            GridCell::new(0, 9)
        );
        assert_eq!(
            config.cell_center(GridCell::new(4, 2)),
            Point2D::from_millis(2_250, 1_250)
        );
    }

    #[test]
    fn test_index_round_trip_and_offsets() {
        let config = config();
        let cell = GridCell::new(7, 3);
        assert_eq!(config.index(cell), 67);
        assert_eq!(config.cell(67), cell);
        assert_eq!(config.offset(cell, -1, 1), Some(GridCell::new(6, 4)));
        assert_eq!(config.offset(GridCell::new(0, 0), -1, 0), None);
        assert_eq!(config.offset(GridCell::new(19, 9), 0, 1), None);
    }

    #[test]
    fn test_spans() {
        let config = config();
        // Edges on grid lines do not spill into the neighbouring cell.
        assert_eq!(
            config.col_span(Fixed::from_millis(1_000), Fixed::from_millis(2_000)),
            Some(2..=3)
        );
        assert_eq!(
            config.col_span(Fixed::from_millis(900), Fixed::from_millis(2_100)),
            Some(1..=4)
        );
        assert_eq!(
            config.row_span(Fixed::from_int(-2), Fixed::from_int(20)),
            Some(0..=9)
        );
        assert_eq!(config.col_span(Fixed::from_int(-3), Fixed::from_int(-1)), None);
        assert_eq!(config.row_span(Fixed::from_int(6), Fixed::from_int(7)), None);
    }

    #[test]
    fn test_render() {
        let config = GridConfig::new(Fixed::from_int(3), Fixed::from_int(2), Fixed::ONE).unwrap();
        let mut grid = OccupancyGrid::new(config);
        grid.block(GridCell::new(1, 0));
        assert_eq!(grid.blocked_count(), 1);
        assert_eq!(grid.to_string(), "...\n.#.\n");

        let path = [GridCell::new(0, 0), GridCell::new(0, 1), GridCell::new(1, 1), GridCell::new(2, 1)];
        assert_eq!(grid.render_with_path(&path), "**G\nS#.\n");

        grid.clear(GridCell::new(1, 0));
        assert!(!grid.is_blocked(GridCell::new(1, 0)));
    }
}
