//! First-class action types for Reversi.
//!
//! A move is a player's intent. It is validated against a board
//! snapshot and either yields a new board or is rejected without
//! touching the original.

use super::{Board, Color, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A move in Reversi: a color placing a disc at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The color placing the disc.
    pub color: Color,
    /// Where the disc goes.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(color: Color, position: Position) -> Self {
        Self { color, position }
    }

    /// Returns the color making this move.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.color, self.position)
    }
}

/// Why the engine refused a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RejectReason {
    /// The cell already holds a disc.
    #[display("Cell {} is already occupied", _0)]
    Occupied(Position),

    /// The placement outflanks nothing.
    #[display("Placing at {} flips no discs", _0)]
    NoFlips(Position),
}

/// Result of asking the engine to apply a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was legal; `board` is the new position.
    Applied {
        /// Board after placement and flips.
        board: Board,
        /// Discs converted to the mover's color.
        flipped: Vec<Position>,
    },
    /// The move was illegal; nothing changed.
    Rejected(RejectReason),
}

impl MoveOutcome {
    /// Returns true when the move was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }

    /// Returns the new board for an applied move.
    pub fn board(&self) -> Option<&Board> {
        match self {
            MoveOutcome::Applied { board, .. } => Some(board),
            MoveOutcome::Rejected(_) => None,
        }
    }
}
