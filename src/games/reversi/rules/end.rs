//! End-of-game detection.

use super::super::{Board, Color, Outcome};
use tracing::instrument;

/// Returns true when either color has no discs or no cell is empty.
#[instrument(level = "trace", skip(board))]
pub fn is_terminal(board: &Board) -> bool {
    board.count(Color::White) == 0 || board.count(Color::Black) == 0 || board.empty_count() == 0
}

/// Determines the result of a terminal board.
///
/// Returns `None` while the game can continue. An eliminated color
/// loses regardless of empty cells; a full board goes to the majority.
/// A board with no discs at all counts as a draw.
#[instrument(level = "trace", skip(board))]
pub fn winner(board: &Board) -> Option<Outcome> {
    if !is_terminal(board) {
        return None;
    }

    let white = board.count(Color::White);
    let black = board.count(Color::Black);

    let outcome = match (white, black) {
        (0, 0) => Outcome::Draw,
        (0, _) => Outcome::Winner(Color::Black),
        (_, 0) => Outcome::Winner(Color::White),
        (w, b) if w > b => Outcome::Winner(Color::White),
        (w, b) if w < b => Outcome::Winner(Color::Black),
        _ => Outcome::Draw,
    };
    Some(outcome)
}
