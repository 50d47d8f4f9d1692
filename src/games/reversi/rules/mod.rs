//! Game rules for Reversi.
//!
//! Pure, deterministic functions over a [`Board`](super::Board).
//! Nothing here performs I/O or mutates its input.

pub mod end;
pub mod flips;

pub use end::{is_terminal, winner};
pub use flips::{apply_move, has_legal_move, legal_flips, legal_moves};
