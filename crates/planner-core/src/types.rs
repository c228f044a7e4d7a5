use serde::{Deserialize, Serialize};

/// Fallback colors for pieces saved without one, assigned round-robin.
pub const PIECE_PALETTE: [&str; 10] = [
    "#76b5c5", "#9bc995", "#e6a57a", "#c9a1d9", "#f5c3b8", "#a1c9c9", "#d9c3a1", "#c9a1a1",
    "#a1a1c9", "#c9c9a1",
];

/// Rectangular stock unit pieces are cut from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default = "default_board_width")]
    pub width: f64,
    #[serde(default = "default_board_height")]
    pub height: f64,
    /// Display name; empty means "show the id".
    #[serde(default)]
    pub name: String,
}

impl Board {
    /// The name shown in summaries and rendered output.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Rectangular cut specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub id: String,
    #[serde(default = "default_piece_width")]
    pub width: f64,
    #[serde(default = "default_piece_height")]
    pub height: f64,
    /// Copies required across all boards.
    #[serde(default = "default_piece_quantity")]
    pub quantity: u32,
    /// Cosmetic only; the engine never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Piece {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Run configuration for a planning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorParams {
    /// Kerf: clearance reserved on the trailing edges of a placed piece.
    #[serde(default = "default_cut_thickness")]
    pub cut_thickness: f64,
    /// Uniform inset from every board edge where nothing may be placed.
    #[serde(default)]
    pub margin: f64,
    /// Permit a 90° rotation when the natural orientation does not fit.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
}

impl Default for SimulatorParams {
    fn default() -> Self {
        Self {
            cut_thickness: default_cut_thickness(),
            margin: 0.0,
            allow_rotation: true,
        }
    }
}

/// One placed copy of a piece on a board.
///
/// `width`/`height` are the occupied extents: swapped from the piece's
/// nominal dimensions when `rotated` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub piece_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl Placement {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Per-board outcome of a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutResult {
    pub board_id: String,
    /// In placement order, not spatial order.
    pub placements: Vec<Placement>,
    pub waste_percentage: f64,
    pub unused_area: f64,
    /// Set when the probe budget ran out before this board was fully tried.
    #[serde(default)]
    pub truncated: bool,
}

impl CutResult {
    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(Placement::area).sum()
    }
}

fn default_board_width() -> f64 {
    240.0
}

fn default_board_height() -> f64 {
    180.0
}

fn default_piece_width() -> f64 {
    50.0
}

fn default_piece_height() -> f64 {
    30.0
}

fn default_piece_quantity() -> u32 {
    1
}

fn default_cut_thickness() -> f64 {
    0.3
}

fn default_allow_rotation() -> bool {
    true
}
