//! Outflanking and disc-flipping.

use super::super::{Board, Cell, Color, MoveOutcome, Position, RejectReason};
use tracing::{instrument, trace};

/// The eight scan directions as `(d_row, d_col)`.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Returns the opponent discs a `color` disc at `pos` would outflank.
///
/// Each direction contributes its run of opponent discs only when the
/// run is closed by a `color` disc. A run ending at an empty cell or
/// at the edge contributes nothing. Emptiness of `pos` itself is not
/// checked here; see [`apply_move`].
#[instrument(level = "trace", skip(board))]
pub fn legal_flips(board: &Board, pos: Position, color: Color) -> Vec<Position> {
    let opponent = Cell::Disc(color.opponent());
    let mut flips = Vec::new();

    for (d_row, d_col) in DIRECTIONS {
        let mut run = Vec::new();
        let mut cursor = pos.offset(d_row, d_col);

        while let Some(next) = cursor {
            let cell = board.get(next);
            if cell == opponent {
                run.push(next);
                cursor = next.offset(d_row, d_col);
            } else {
                if cell == Cell::Disc(color) {
                    flips.append(&mut run);
                }
                break;
            }
        }
    }

    flips
}

/// Places a `color` disc at `pos` and flips every outflanked disc.
///
/// The input board is left untouched. Occupied cells and placements
/// with no flips are rejected.
#[instrument(level = "debug", skip(board))]
pub fn apply_move(board: &Board, pos: Position, color: Color) -> MoveOutcome {
    if !board.is_empty(pos) {
        trace!(%pos, "Cell occupied");
        return MoveOutcome::Rejected(RejectReason::Occupied(pos));
    }

    let flipped = legal_flips(board, pos, color);
    if flipped.is_empty() {
        trace!(%pos, "Nothing to flip");
        return MoveOutcome::Rejected(RejectReason::NoFlips(pos));
    }

    let mut next = board.clone();
    next.set(pos, Cell::Disc(color));
    for &flip in &flipped {
        next.set(flip, Cell::Disc(color));
    }

    MoveOutcome::Applied {
        board: next,
        flipped,
    }
}

/// Lists every empty cell where `color` has a legal placement.
#[instrument(level = "trace", skip(board))]
pub fn legal_moves(board: &Board, color: Color) -> Vec<Position> {
    Position::all()
        .filter(|&pos| board.is_empty(pos) && !legal_flips(board, pos, color).is_empty())
        .collect()
}

/// Returns true if `color` has at least one legal placement.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    Position::all().any(|pos| board.is_empty(pos) && !legal_flips(board, pos, color).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_opening_black_moves() {
        let board = Board::new();
        let moves = legal_moves(&board, Color::Black);
        assert_eq!(moves, vec![at(2, 3), at(3, 2), at(4, 5), at(5, 4)]);
    }

    #[test]
    fn test_opening_white_moves() {
        let board = Board::new();
        let moves = legal_moves(&board, Color::White);
        assert_eq!(moves, vec![at(2, 4), at(3, 5), at(4, 2), at(5, 3)]);
    }

    #[test]
    fn test_run_ending_at_edge_is_discarded() {
        let mut board = Board::empty();
        board.set(at(0, 1), Cell::Disc(Color::White));
        board.set(at(0, 0), Cell::Disc(Color::White));
        // Black at (0, 2) scans left over two whites and falls off the edge.
        assert!(legal_flips(&board, at(0, 2), Color::Black).is_empty());
    }

    #[test]
    fn test_run_ending_at_empty_is_discarded() {
        let mut board = Board::empty();
        board.set(at(4, 4), Cell::Disc(Color::White));
        board.set(at(4, 5), Cell::Disc(Color::White));
        assert!(legal_flips(&board, at(4, 3), Color::Black).is_empty());
    }

    #[test]
    fn test_adjacent_own_disc_yields_nothing() {
        let mut board = Board::empty();
        board.set(at(4, 4), Cell::Disc(Color::Black));
        board.set(at(4, 5), Cell::Disc(Color::White));
        board.set(at(4, 6), Cell::Disc(Color::Black));
        assert!(legal_flips(&board, at(4, 3), Color::Black).is_empty());
    }

    #[test]
    fn test_flips_union_across_directions() {
        let mut board = Board::empty();
        // Horizontal run of two, vertical run of one, diagonal open.
        board.set(at(3, 4), Cell::Disc(Color::White));
        board.set(at(3, 5), Cell::Disc(Color::White));
        board.set(at(3, 6), Cell::Disc(Color::Black));
        board.set(at(4, 3), Cell::Disc(Color::White));
        board.set(at(5, 3), Cell::Disc(Color::Black));
        board.set(at(4, 4), Cell::Disc(Color::White));

        let mut flips = legal_flips(&board, at(3, 3), Color::Black);
        flips.sort();
        assert_eq!(flips, vec![at(3, 4), at(3, 5), at(4, 3)]);
    }

    #[test]
    fn test_apply_move_rejects_without_mutation() {
        let board = Board::new();
        let before = board.clone();

        assert_eq!(
            apply_move(&board, at(3, 3), Color::Black),
            MoveOutcome::Rejected(RejectReason::Occupied(at(3, 3)))
        );
        assert_eq!(
            apply_move(&board, at(0, 0), Color::Black),
            MoveOutcome::Rejected(RejectReason::NoFlips(at(0, 0)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_has_legal_move_on_blocked_board() {
        let mut board = Board::empty();
        board.set(at(0, 0), Cell::Disc(Color::White));
        assert!(!has_legal_move(&board, Color::White));
        assert!(!has_legal_move(&board, Color::Black));
        assert!(has_legal_move(&Board::new(), Color::White));
    }
}
