use crate::types::*;
use std::cmp::Ordering;

mod grid;
mod summary;

pub use summary::{summarize, PieceUsage, PlanReport, PlanSummary};

use grid::OccupancyGrid;

/// One copy of a piece awaiting placement.
#[derive(Debug, Clone)]
struct InstanceRequest {
    piece_id: String,
    width: f64,
    height: f64,
}

impl InstanceRequest {
    fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Places piece copies on boards with a largest-first, row-major first-fit
/// scan over a per-board occupancy grid.
///
/// The run is pure and deterministic: identical inputs (including input
/// order) always produce identical results. Copies that fit nowhere are
/// simply absent from the output; nothing is ever raised.
pub struct Planner {
    boards: Vec<Board>,
    pieces: Vec<Piece>,
    params: SimulatorParams,
    probe_budget: Option<u64>,
}

impl Planner {
    pub fn new(boards: Vec<Board>, pieces: Vec<Piece>, params: SimulatorParams) -> Self {
        Self {
            boards,
            pieces,
            params,
            probe_budget: None,
        }
    }

    /// Caps the number of candidate positions tested across the whole run.
    /// Once spent, remaining copies stay unplaced and every board still being
    /// processed reports `truncated` instead of blocking on a huge scan.
    pub fn with_probe_budget(mut self, limit: u64) -> Self {
        self.probe_budget = Some(limit);
        self
    }

    /// Runs the full plan: one `CutResult` per board, in board input order.
    pub fn plan(&self) -> Vec<CutResult> {
        let mut pool = self.expand_pieces();
        pool.sort_by(|a, b| {
            let area_a = a.area();
            let area_b = b.area();
            area_b.partial_cmp(&area_a).unwrap_or(Ordering::Equal)
        });

        let mut probes = ProbeBudget::new(self.probe_budget);
        let mut results = Vec::with_capacity(self.boards.len());
        for board in &self.boards {
            results.push(self.plan_board(board, &mut pool, &mut probes));
        }
        results
    }

    /// Duplicates every piece into `quantity` independent copies. The pool is
    /// built once per run, so a copy placed on an earlier board is never
    /// offered to a later one.
    fn expand_pieces(&self) -> Vec<InstanceRequest> {
        let mut pool = Vec::new();
        for piece in &self.pieces {
            for _ in 0..piece.quantity {
                pool.push(InstanceRequest {
                    piece_id: piece.id.clone(),
                    width: piece.width,
                    height: piece.height,
                });
            }
        }
        pool
    }

    /// Attempts every still-unplaced copy on one board and removes the
    /// successful ones from the pool.
    fn plan_board(
        &self,
        board: &Board,
        pool: &mut Vec<InstanceRequest>,
        probes: &mut ProbeBudget,
    ) -> CutResult {
        let margin = self.params.margin;
        let usable_width = board.width - 2.0 * margin;
        let usable_height = board.height - 2.0 * margin;
        let mut grid = OccupancyGrid::new(usable_width, usable_height);

        let mut placements = Vec::new();
        let mut placed = vec![false; pool.len()];

        for (idx, request) in pool.iter().enumerate() {
            if probes.is_spent() {
                break;
            }
            if let Some(placement) =
                self.place_copy(request, &mut grid, usable_width, usable_height, probes)
            {
                placements.push(placement);
                placed[idx] = true;
            }
        }

        let mut idx = 0;
        pool.retain(|_| {
            let keep = !placed[idx];
            idx += 1;
            keep
        });

        // Waste is measured against the nominal board area, not the
        // margin-reduced usable rectangle. Zero-area boards report zero waste
        // so the result stays serializable.
        let used_area: f64 = placements.iter().map(Placement::area).sum();
        let total_area = board.area();
        let (waste_percentage, unused_area) = if total_area > 0.0 {
            (
                (total_area - used_area) / total_area * 100.0,
                total_area - used_area,
            )
        } else {
            (0.0, 0.0)
        };

        CutResult {
            board_id: board.id.clone(),
            placements,
            waste_percentage,
            unused_area,
            truncated: probes.is_spent(),
        }
    }

    /// Tries the copy in its natural orientation, then rotated 90° when the
    /// parameters allow it and the copy is not square.
    fn place_copy(
        &self,
        request: &InstanceRequest,
        grid: &mut OccupancyGrid,
        usable_width: f64,
        usable_height: f64,
        probes: &mut ProbeBudget,
    ) -> Option<Placement> {
        if let Some((x, y)) = self.scan(grid, usable_width, usable_height, request.width, request.height, probes) {
            grid.mark(x, y, request.width, request.height);
            return Some(Placement {
                piece_id: request.piece_id.clone(),
                x,
                y,
                width: request.width,
                height: request.height,
                rotated: false,
            });
        }

        if self.params.allow_rotation && request.width != request.height {
            if let Some((x, y)) = self.scan(grid, usable_width, usable_height, request.height, request.width, probes) {
                grid.mark(x, y, request.height, request.width);
                return Some(Placement {
                    piece_id: request.piece_id.clone(),
                    x,
                    y,
                    width: request.height,
                    height: request.width,
                    rotated: true,
                });
            }
        }

        None
    }

    /// Row-major first-fit: candidate rows top-to-bottom, columns
    /// left-to-right, in steps of exactly one unit starting at the margin
    /// inset. The first clear position wins; there is no better-fit search.
    fn scan(
        &self,
        grid: &OccupancyGrid,
        usable_width: f64,
        usable_height: f64,
        width: f64,
        height: f64,
        probes: &mut ProbeBudget,
    ) -> Option<(f64, f64)> {
        let margin = self.params.margin;
        let mut y = margin;
        while y <= usable_height - height {
            let mut x = margin;
            while x <= usable_width - width {
                if !probes.take() {
                    return None;
                }
                if grid.can_place(x, y, width, height, self.params.cut_thickness) {
                    return Some((x, y));
                }
                x += 1.0;
            }
            y += 1.0;
        }
        None
    }
}

/// Computes a full cut plan for the given inputs.
pub fn plan_cuts(boards: &[Board], pieces: &[Piece], params: &SimulatorParams) -> Vec<CutResult> {
    Planner::new(boards.to_vec(), pieces.to_vec(), params.clone()).plan()
}

/// Run-wide cap on scanned candidate positions. `None` means unlimited.
struct ProbeBudget {
    remaining: Option<u64>,
    spent: bool,
}

impl ProbeBudget {
    fn new(limit: Option<u64>) -> Self {
        Self {
            remaining: limit,
            spent: false,
        }
    }

    /// Consumes one probe; false once the budget is gone.
    fn take(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => {
                self.spent = true;
                false
            }
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

    fn is_spent(&self) -> bool {
        self.spent
    }
}
