use crate::types::{CutResult, Piece};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized output of one run: the per-board results plus derived totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub results: Vec<CutResult>,
    pub summary: PlanSummary,
}

/// How much of one piece's requested quantity actually found a home.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceUsage {
    pub piece_id: String,
    pub requested: u32,
    pub placed: u32,
}

impl PieceUsage {
    /// Copies that fit nowhere in the run.
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.placed)
    }
}

/// Aggregate statistics across every board of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_area: f64,
    pub used_area: f64,
    pub waste_area: f64,
    pub waste_percentage: f64,
    pub total_placements: u32,
    pub piece_usage: Vec<PieceUsage>,
}

impl PlanSummary {
    /// True when every requested copy was placed.
    pub fn is_fulfilled(&self) -> bool {
        self.piece_usage.iter().all(|usage| usage.shortfall() == 0)
    }
}

/// Derives the run summary from the results alone; `pieces` only supplies
/// the requested quantities the placement counts are compared against.
pub fn summarize(pieces: &[Piece], results: &[CutResult]) -> PlanSummary {
    let mut placed_by_piece: HashMap<&str, u32> = HashMap::new();
    let mut total_area = 0.0;
    let mut used_area = 0.0;
    let mut total_placements = 0u32;

    for result in results {
        let board_used = result.used_area();
        used_area += board_used;
        total_area += board_used + result.unused_area;
        for placement in &result.placements {
            total_placements += 1;
            *placed_by_piece.entry(placement.piece_id.as_str()).or_insert(0) += 1;
        }
    }

    let piece_usage = pieces
        .iter()
        .map(|piece| PieceUsage {
            piece_id: piece.id.clone(),
            requested: piece.quantity,
            placed: placed_by_piece.get(piece.id.as_str()).copied().unwrap_or(0),
        })
        .collect();

    let waste_area = total_area - used_area;
    let waste_percentage = if total_area > 0.0 {
        waste_area / total_area * 100.0
    } else {
        0.0
    };

    PlanSummary {
        total_area,
        used_area,
        waste_area,
        waste_percentage,
        total_placements,
        piece_usage,
    }
}
