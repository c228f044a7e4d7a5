use crate::planner::plan_cuts;
use crate::types::{Board, CutResult, Piece, SimulatorParams, PIECE_PALETTE};
use serde::{Deserialize, Serialize};

/// Error type for project mutations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("An entry with id '{0}' already exists")]
    DuplicateId(String),

    #[error("No entry with id '{0}'")]
    UnknownId(String),
}

pub type Result<T> = std::result::Result<T, ProjectError>;

/// The owned aggregate of a planning session and the persisted snapshot
/// shape: `{ pieces, boards, params }`. Missing fields deserialize to the
/// documented defaults; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub params: SimulatorParams,
}

impl Project {
    /// Adds a piece, assigning the next palette color when it has none.
    /// Identifiers must be unique across the piece list.
    pub fn add_piece(&mut self, mut piece: Piece) -> Result<()> {
        if self.pieces.iter().any(|p| p.id == piece.id) {
            return Err(ProjectError::DuplicateId(piece.id));
        }
        if piece.color.is_none() {
            piece.color = Some(PIECE_PALETTE[self.pieces.len() % PIECE_PALETTE.len()].to_string());
        }
        self.pieces.push(piece);
        Ok(())
    }

    /// Replaces the piece stored under `old_id`, which may rename it as long
    /// as the new identifier is not already taken by another piece.
    pub fn update_piece(&mut self, old_id: &str, piece: Piece) -> Result<()> {
        if piece.id != old_id && self.pieces.iter().any(|p| p.id == piece.id) {
            return Err(ProjectError::DuplicateId(piece.id));
        }
        let slot = self
            .pieces
            .iter_mut()
            .find(|p| p.id == old_id)
            .ok_or_else(|| ProjectError::UnknownId(old_id.to_string()))?;
        *slot = piece;
        Ok(())
    }

    pub fn remove_piece(&mut self, id: &str) -> Result<Piece> {
        let idx = self
            .pieces
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ProjectError::UnknownId(id.to_string()))?;
        Ok(self.pieces.remove(idx))
    }

    pub fn add_board(&mut self, board: Board) -> Result<()> {
        if self.boards.iter().any(|b| b.id == board.id) {
            return Err(ProjectError::DuplicateId(board.id));
        }
        self.boards.push(board);
        Ok(())
    }

    pub fn update_board(&mut self, old_id: &str, board: Board) -> Result<()> {
        if board.id != old_id && self.boards.iter().any(|b| b.id == board.id) {
            return Err(ProjectError::DuplicateId(board.id));
        }
        let slot = self
            .boards
            .iter_mut()
            .find(|b| b.id == old_id)
            .ok_or_else(|| ProjectError::UnknownId(old_id.to_string()))?;
        *slot = board;
        Ok(())
    }

    pub fn remove_board(&mut self, id: &str) -> Result<Board> {
        let idx = self
            .boards
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ProjectError::UnknownId(id.to_string()))?;
        Ok(self.boards.remove(idx))
    }

    pub fn find_piece(&self, id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn find_board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// Runs the planner over the project's current state.
    pub fn plan(&self) -> Vec<CutResult> {
        plan_cuts(&self.boards, &self.pieces, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: &str) -> Piece {
        Piece {
            id: id.into(),
            width: 50.0,
            height: 30.0,
            quantity: 1,
            color: None,
        }
    }

    #[test]
    fn add_piece_rejects_duplicate_id() {
        let mut project = Project::default();
        project.add_piece(piece("p1")).unwrap();
        assert!(matches!(
            project.add_piece(piece("p1")),
            Err(ProjectError::DuplicateId(_))
        ));
    }

    #[test]
    fn added_pieces_cycle_through_the_palette() {
        let mut project = Project::default();
        project.add_piece(piece("p1")).unwrap();
        project.add_piece(piece("p2")).unwrap();
        assert_eq!(project.pieces[0].color.as_deref(), Some(PIECE_PALETTE[0]));
        assert_eq!(project.pieces[1].color.as_deref(), Some(PIECE_PALETTE[1]));

        let mut explicit = piece("p3");
        explicit.color = Some("#123456".into());
        project.add_piece(explicit).unwrap();
        assert_eq!(project.pieces[2].color.as_deref(), Some("#123456"));
    }

    #[test]
    fn update_piece_may_rename_but_not_collide() {
        let mut project = Project::default();
        project.add_piece(piece("p1")).unwrap();
        project.add_piece(piece("p2")).unwrap();

        let mut renamed = piece("p3");
        renamed.color = Some("#000000".into());
        project.update_piece("p1", renamed).unwrap();
        assert!(project.find_piece("p3").is_some());
        assert!(project.find_piece("p1").is_none());

        assert!(matches!(
            project.update_piece("p3", piece("p2")),
            Err(ProjectError::DuplicateId(_))
        ));
        assert!(matches!(
            project.update_piece("ghost", piece("p9")),
            Err(ProjectError::UnknownId(_))
        ));
    }

    #[test]
    fn remove_unknown_board_errors() {
        let mut project = Project::default();
        assert!(matches!(
            project.remove_board("b1"),
            Err(ProjectError::UnknownId(_))
        ));
    }

    #[test]
    fn snapshot_fields_fall_back_to_defaults() {
        let project: Project = serde_json::from_str(
            r#"{
                "pieces": [{ "id": "p1" }],
                "boards": [{ "id": "b1", "ignored_field": true }]
            }"#,
        )
        .unwrap();

        let p = &project.pieces[0];
        assert_eq!(p.width, 50.0);
        assert_eq!(p.height, 30.0);
        assert_eq!(p.quantity, 1);
        assert!(p.color.is_none());

        let b = &project.boards[0];
        assert_eq!(b.width, 240.0);
        assert_eq!(b.height, 180.0);
        assert_eq!(b.label(), "b1");

        assert_eq!(project.params.cut_thickness, 0.3);
        assert_eq!(project.params.margin, 0.0);
        assert!(project.params.allow_rotation);
    }

    #[test]
    fn empty_snapshot_parses() {
        let project: Project = serde_json::from_str("{}").unwrap();
        assert!(project.pieces.is_empty());
        assert!(project.boards.is_empty());
    }
}
