/// Per-board occupancy tracking at integer-cell granularity.
///
/// One boolean cell per unit of length. Real-valued probe coordinates are
/// truncated to the cell they fall in, so collision detection works at whole
/// units even when piece geometry is fractional; the reported placement keeps
/// its real-valued size. Probes outside the grid are vacuously free — board
/// bounds are enforced by the caller's scan limits, not here.
#[derive(Debug)]
pub(super) struct OccupancyGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// A degenerate usable extent (margin at or past half a board dimension)
    /// gets a zero-cell grid: allocation must not panic, and every subsequent
    /// placement attempt simply fails.
    pub fn new(usable_width: f64, usable_height: f64) -> Self {
        let cols = if usable_width > 0.0 {
            usable_width.ceil() as usize
        } else {
            0
        };
        let rows = if usable_height > 0.0 {
            usable_height.ceil() as usize
        } else {
            0
        };
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    /// True when every cell under `[x, x+width) × [y, y+height)` is free and,
    /// for a positive kerf, so is the one-cell-thick strip past the right and
    /// bottom edges. The strip is a single cell no matter how thick the kerf
    /// is, and only the trailing edges carry it: a candidate may sit flush
    /// against the left or top side of an occupied region.
    pub fn can_place(&self, x: f64, y: f64, width: f64, height: f64, cut_thickness: f64) -> bool {
        let w_cells = span(width);
        let h_cells = span(height);

        for i in 0..w_cells {
            for j in 0..h_cells {
                if self.occupied(cell(x + i as f64), cell(y + j as f64)) {
                    return false;
                }
            }
        }

        if cut_thickness > 0.0 {
            let right = cell(x + width);
            for j in 0..h_cells {
                if self.occupied(right, cell(y + j as f64)) {
                    return false;
                }
            }

            let bottom = cell(y + height);
            for i in 0..w_cells {
                if self.occupied(cell(x + i as f64), bottom) {
                    return false;
                }
            }
        }

        true
    }

    /// Claims the cells under the rectangle. The kerf strip stays unmarked:
    /// a later neighbor may occupy it, relying on its own trailing clearance
    /// (or the board edge) for separation.
    pub fn mark(&mut self, x: f64, y: f64, width: f64, height: f64) {
        for i in 0..span(width) {
            for j in 0..span(height) {
                self.set(cell(x + i as f64), cell(y + j as f64));
            }
        }
    }

    fn occupied(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return false;
        }
        self.cells[col * self.rows + row]
    }

    fn set(&mut self, col: i64, row: i64) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col < self.cols && row < self.rows {
            self.cells[col * self.rows + row] = true;
        }
    }
}

/// Number of unit cells an extent covers: one probe per integer `i < len`.
fn span(len: f64) -> usize {
    if len > 0.0 {
        len.ceil() as usize
    } else {
        0
    }
}

fn cell(coord: f64) -> i64 {
    coord.floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_cells_collide() {
        let mut grid = OccupancyGrid::new(100.0, 100.0);
        assert!(grid.can_place(0.0, 0.0, 10.0, 10.0, 0.0));
        grid.mark(0.0, 0.0, 10.0, 10.0);
        assert!(!grid.can_place(0.0, 0.0, 10.0, 10.0, 0.0));
        assert!(!grid.can_place(9.0, 9.0, 10.0, 10.0, 0.0));
        assert!(grid.can_place(10.0, 0.0, 10.0, 10.0, 0.0));
    }

    #[test]
    fn fractional_extents_claim_whole_cells() {
        let mut grid = OccupancyGrid::new(10.0, 10.0);
        grid.mark(0.0, 0.0, 2.5, 2.5);
        // 2.5 units cover cells 0..=2, so a piece starting inside cell 2
        // collides even though real-valued geometry would clear it.
        assert!(!grid.can_place(2.0, 0.0, 2.5, 2.5, 0.0));
        assert!(grid.can_place(3.0, 0.0, 2.5, 2.5, 0.0));
    }

    #[test]
    fn kerf_strip_blocks_trailing_edge_only() {
        let mut grid = OccupancyGrid::new(100.0, 100.0);
        grid.mark(50.0, 0.0, 10.0, 10.0);

        // Trailing (right) strip lands on the occupied block: rejected.
        assert!(!grid.can_place(30.0, 0.0, 20.0, 10.0, 0.5));
        // One unit further left the strip is clear again.
        assert!(grid.can_place(29.0, 0.0, 20.0, 10.0, 0.5));
        // Without a kerf the flush fit is fine.
        assert!(grid.can_place(30.0, 0.0, 20.0, 10.0, 0.0));
        // Leading edge carries no clearance: flush against the block's right
        // side is accepted, reusing the block's trailing strip.
        assert!(grid.can_place(60.0, 0.0, 10.0, 10.0, 0.5));
    }

    #[test]
    fn kerf_strip_blocks_below() {
        let mut grid = OccupancyGrid::new(20.0, 100.0);
        grid.mark(0.0, 50.0, 10.0, 10.0);
        assert!(!grid.can_place(0.0, 30.0, 10.0, 20.0, 0.5));
        assert!(grid.can_place(0.0, 29.0, 10.0, 20.0, 0.5));
    }

    #[test]
    fn strip_outside_the_grid_needs_no_clearance() {
        let mut grid = OccupancyGrid::new(100.0, 10.0);
        grid.mark(0.0, 0.0, 50.0, 10.0);
        // Right strip at column 100 and bottom strip at row 10 both fall
        // outside the grid; the flush tail placement is accepted.
        assert!(grid.can_place(50.0, 0.0, 50.0, 10.0, 3.0));
    }

    #[test]
    fn zero_sized_grid_allocates() {
        let grid = OccupancyGrid::new(-20.0, 0.0);
        assert_eq!(grid.cols, 0);
        assert_eq!(grid.rows, 0);
    }
}
