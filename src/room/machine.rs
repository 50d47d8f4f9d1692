//! Room state machine: `matching -> playing -> end`.
//!
//! Transitions are computed against a decoded snapshot and returned as
//! [`RoomPatch`] values. The caller commits each patch with a single
//! store update, so board, turn and status always change together.

use super::{RoomDocument, RoomId, RoomPatch, RoomStatus};
use crate::games::reversi::{
    Board, BoardError, Color, Move, MoveOutcome, Outcome, Position, RejectReason, rules,
};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// Error raised by a room transition.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RoomError {
    /// Joining a room that is no longer matching.
    #[display("Room is {}, not accepting players", _0)]
    NotMatching(RoomStatus),

    /// Acting in a room that has not started.
    #[display("Room is {}, not in play", _0)]
    NotPlaying(RoomStatus),

    /// Acting in a room that has ended.
    #[display("Game is already over")]
    GameOver,

    /// Acting out of turn.
    #[display("It's {}'s turn, not {}", expected, actual)]
    NotYourTurn {
        /// Color to move.
        expected: Color,
        /// Color that tried to act.
        actual: Color,
    },

    /// The stored document does not decode.
    #[display("Invalid room document: {}", _0)]
    InvalidDocument(BoardError),
}

impl std::error::Error for RoomError {}

impl From<BoardError> for RoomError {
    fn from(err: BoardError) -> Self {
        RoomError::InvalidDocument(err)
    }
}

/// Result of a placement attempt against a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The move is legal; commit `patch`.
    Commit {
        /// Board, turn and possibly status to write.
        patch: RoomPatch,
        /// Discs flipped by the move.
        flipped: Vec<Position>,
        /// Set when the move ends the game.
        outcome: Option<Outcome>,
    },
    /// The engine refused the placement. Nothing is written.
    Rejected(RejectReason),
}

/// Decoded view of one match.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Room {
    id: RoomId,
    board: Board,
    turn: Color,
    status: RoomStatus,
    num_people: u8,
}

impl Room {
    /// Decodes a stored document.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidDocument`] if the board does not reshape.
    #[instrument(skip(doc), fields(room_id = %id))]
    pub fn from_document(id: RoomId, doc: &RoomDocument) -> Result<Self, RoomError> {
        let board = Board::from_flat(&doc.board).inspect_err(|e| {
            warn!(error = %e, "Stored board does not decode");
        })?;
        Ok(Self {
            id,
            board,
            turn: doc.turn,
            status: doc.status,
            num_people: doc.num_people,
        })
    }

    /// Encodes back to the stored form.
    pub fn to_document(&self) -> RoomDocument {
        RoomDocument {
            board: self.board.flatten().to_vec(),
            num_people: self.num_people,
            status: self.status,
            turn: self.turn,
        }
    }

    /// A participant joins.
    ///
    /// The count is incremented from the snapshot. Reaching two starts
    /// play with white to move and seats the joiner as black; any other
    /// count leaves the room matching and the joiner on the white side.
    /// Concurrent joins against the same snapshot both succeed.
    #[instrument(skip(self), fields(room_id = %self.id, num_people = self.num_people))]
    pub fn join(&self) -> Result<(RoomPatch, Color), RoomError> {
        if self.status != RoomStatus::Matching {
            warn!(status = %self.status, "Join refused");
            return Err(RoomError::NotMatching(self.status));
        }

        let num_people = self.num_people.saturating_add(1);
        let patch = RoomPatch::new().with_num_people(num_people);

        if num_people == 2 {
            info!("Second participant joined, starting play");
            Ok((
                patch
                    .with_status(RoomStatus::Playing)
                    .with_turn(Color::White),
                Color::Black,
            ))
        } else {
            warn!(num_people, "Joined without completing the pair");
            Ok((patch.with_status(RoomStatus::Matching), Color::White))
        }
    }

    /// Places a disc for `mv.color`.
    ///
    /// The turn flips on success. When the resulting board is terminal
    /// the same patch moves the room to `end`.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn play(&self, mv: Move) -> Result<Transition, RoomError> {
        self.check_turn(mv.color)?;

        match rules::apply_move(&self.board, mv.position, mv.color) {
            MoveOutcome::Rejected(reason) => {
                debug!(%reason, "Move rejected");
                Ok(Transition::Rejected(reason))
            }
            MoveOutcome::Applied { board, flipped } => {
                let mut patch = RoomPatch::new()
                    .with_board(board.flatten().to_vec())
                    .with_turn(mv.color.opponent());

                let outcome = rules::winner(&board);
                if let Some(outcome) = outcome {
                    info!(%outcome, "Game over");
                    patch = patch.with_status(RoomStatus::End);
                }

                debug!(flipped = flipped.len(), "Move accepted");
                Ok(Transition::Commit {
                    patch,
                    flipped,
                    outcome,
                })
            }
        }
    }

    /// Hands the turn to the opponent without touching the board.
    ///
    /// Passing is not checked for legality: a player may pass even
    /// with legal moves available.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn pass(&self, color: Color) -> Result<RoomPatch, RoomError> {
        self.check_turn(color)?;
        if rules::has_legal_move(&self.board, color) {
            debug!("Passing with legal moves available");
        }
        Ok(RoomPatch::new().with_turn(color.opponent()))
    }

    /// Result of the game, once the room has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.status == RoomStatus::End {
            rules::winner(&self.board)
        } else {
            None
        }
    }

    fn check_turn(&self, color: Color) -> Result<(), RoomError> {
        match self.status {
            RoomStatus::Playing => {}
            RoomStatus::End => return Err(RoomError::GameOver),
            status => return Err(RoomError::NotPlaying(status)),
        }
        if self.turn != color {
            warn!(expected = %self.turn, actual = %color, "Out of turn");
            return Err(RoomError::NotYourTurn {
                expected: self.turn,
                actual: color,
            });
        }
        Ok(())
    }
}
