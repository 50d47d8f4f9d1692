//! Tests for the Reversi board engine.

use proptest::prelude::*;
use reversi_online::{
    Board, Cell, Color, MoveOutcome, NUM_CELLS, Outcome, Position, RejectReason, apply_move,
    is_terminal, legal_flips, legal_moves, winner,
};

fn at(row: u8, col: u8) -> Position {
    Position::new(row, col).expect("on board")
}

fn arb_board() -> impl Strategy<Value = Board> {
    prop::collection::vec(0u8..3, NUM_CELLS)
        .prop_map(|flat| Board::from_flat(&flat).expect("valid codes"))
}

fn arb_position() -> impl Strategy<Value = Position> {
    (0u8..8, 0u8..8).prop_map(|(row, col)| at(row, col))
}

fn arb_color() -> impl Strategy<Value = Color> {
    prop_oneof![Just(Color::White), Just(Color::Black)]
}

/// Straightforward per-direction scan over the flat form.
fn reference_flips(flat: &[u8; NUM_CELLS], row: i32, col: i32, me: u8) -> Vec<usize> {
    let opp = if me == 1 { 2 } else { 1 };
    let mut out = Vec::new();
    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let mut run = Vec::new();
            let (mut r, mut c) = (row + dr, col + dc);
            while (0..8).contains(&r) && (0..8).contains(&c) {
                let idx = (r * 8 + c) as usize;
                if flat[idx] == opp {
                    run.push(idx);
                } else {
                    if flat[idx] == me {
                        out.extend(run.iter().copied());
                    }
                    break;
                }
                r += dr;
                c += dc;
            }
        }
    }
    out.sort_unstable();
    out
}

#[test]
fn test_opening_flip_scenario() {
    let board = Board::new();
    let outcome = apply_move(&board, at(2, 3), Color::Black);

    let MoveOutcome::Applied { board: next, flipped } = outcome else {
        panic!("opening move should be legal");
    };
    assert_eq!(flipped, vec![at(3, 3)]);
    assert_eq!(next.count(Color::White), 1);
    assert_eq!(next.count(Color::Black), 4);
    assert_eq!(next.get(at(2, 3)), Cell::Disc(Color::Black));
    assert_eq!(next.get(at(3, 3)), Cell::Disc(Color::Black));
    assert_eq!(next.get(at(4, 4)), Cell::Disc(Color::White));
}

#[test]
fn test_white_opening_flip() {
    let board = Board::new();
    let next = apply_move(&board, at(2, 4), Color::White);
    let next = next.board().expect("legal");
    assert_eq!(next.get(at(3, 4)), Cell::Disc(Color::White));
    assert_eq!(next.count(Color::White), 4);
    assert_eq!(next.count(Color::Black), 1);
}

#[test]
fn test_full_board_draw_scenario() {
    let mut board = Board::empty();
    for pos in Position::all() {
        let color = if (pos.row + pos.col) % 2 == 0 {
            Color::White
        } else {
            Color::Black
        };
        board.set(pos, Cell::Disc(color));
    }
    assert_eq!(board.count(Color::White), 32);
    assert_eq!(board.count(Color::Black), 32);
    assert!(is_terminal(&board));
    assert_eq!(winner(&board), Some(Outcome::Draw));
}

#[test]
fn test_early_elimination_scenario() {
    let mut board = Board::empty();
    board.set(at(0, 0), Cell::Disc(Color::White));
    board.set(at(5, 5), Cell::Disc(Color::White));
    assert!(board.empty_count() > 0);
    assert!(is_terminal(&board));
    assert_eq!(winner(&board), Some(Outcome::Winner(Color::White)));
}

#[test]
fn test_rejections_name_the_reason() {
    let board = Board::new();
    assert_eq!(
        apply_move(&board, at(4, 4), Color::White),
        MoveOutcome::Rejected(RejectReason::Occupied(at(4, 4)))
    );
    assert_eq!(
        apply_move(&board, at(7, 7), Color::White),
        MoveOutcome::Rejected(RejectReason::NoFlips(at(7, 7)))
    );
}

#[test]
fn test_every_opening_reply_is_legal() {
    let board = Board::new();
    for pos in legal_moves(&board, Color::White) {
        assert!(apply_move(&board, pos, Color::White).is_applied(), "{pos}");
    }
}

proptest! {
    #[test]
    fn prop_flips_match_reference(board in arb_board(), pos in arb_position(), color in arb_color()) {
        let mut flips: Vec<usize> = legal_flips(&board, pos, color)
            .into_iter()
            .map(Position::index)
            .collect();
        flips.sort_unstable();
        let expected = reference_flips(&board.flatten(), pos.row as i32, pos.col as i32, color.code());
        prop_assert_eq!(flips, expected);
    }

    #[test]
    fn prop_flipped_cells_were_opponent_discs(board in arb_board(), pos in arb_position(), color in arb_color()) {
        for flip in legal_flips(&board, pos, color) {
            prop_assert_eq!(board.get(flip), Cell::Disc(color.opponent()));
        }
    }

    #[test]
    fn prop_rejected_move_leaves_board_unchanged(board in arb_board(), pos in arb_position(), color in arb_color()) {
        let before = board.clone();
        if let MoveOutcome::Rejected(_) = apply_move(&board, pos, color) {
            prop_assert!(!board.is_empty(pos) || legal_flips(&board, pos, color).is_empty());
        }
        prop_assert_eq!(board, before);
    }

    #[test]
    fn prop_applied_move_adds_exactly_one_disc(board in arb_board(), pos in arb_position(), color in arb_color()) {
        let discs_before = board.count(Color::White) + board.count(Color::Black);
        if let MoveOutcome::Applied { board: next, flipped } = apply_move(&board, pos, color) {
            let discs_after = next.count(Color::White) + next.count(Color::Black);
            prop_assert_eq!(discs_after, discs_before + 1);
            prop_assert_eq!(next.count(color), board.count(color) + flipped.len() + 1);
        }
    }

    #[test]
    fn prop_terminal_iff_a_count_is_zero(board in arb_board()) {
        let white = board.count(Color::White);
        let black = board.count(Color::Black);
        let empty = board.empty_count();
        prop_assert_eq!(is_terminal(&board), white == 0 || black == 0 || empty == 0);

        match winner(&board) {
            None => {
                prop_assert!(!is_terminal(&board));
            }
            Some(Outcome::Draw) => {
                prop_assert_eq!(white, black);
            }
            Some(Outcome::Winner(Color::White)) => {
                prop_assert!(black == 0 || (empty == 0 && white > black));
            }
            Some(Outcome::Winner(Color::Black)) => {
                prop_assert!(white == 0 || (empty == 0 && black > white));
            }
        }
    }

    #[test]
    fn prop_flatten_reshape_round_trip(board in arb_board()) {
        let flat = board.flatten();
        prop_assert_eq!(Board::from_flat(&flat), Ok(board.clone()));
        for pos in Position::all() {
            prop_assert_eq!(flat[pos.row as usize * 8 + pos.col as usize], board.get(pos).code());
        }
    }
}
