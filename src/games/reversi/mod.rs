//! Reversi (Othello) board engine.

mod action;
mod phases;
pub mod rules;
mod types;

pub use action::{Move, MoveOutcome, RejectReason};
pub use phases::Outcome;
pub use rules::{apply_move, has_legal_move, is_terminal, legal_flips, legal_moves, winner};
pub use types::{BOARD_SIZE, Board, BoardError, Cell, Color, NUM_CELLS, Position};
