//! Property-based tests for board evaluation.

use luffarschack_engine::rules::{LINES, winning_mark};
use luffarschack_engine::{Board, GameState, GameStatus, Mark, Square, evaluate};
use proptest::prelude::*;

fn arb_mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::Player), Just(Mark::Opponent)]
}

fn arb_square() -> impl Strategy<Value = Square> {
    prop_oneof![
        Just(Square::Empty),
        Just(Square::Occupied(Mark::Player)),
        Just(Square::Occupied(Mark::Opponent)),
    ]
}

/// Board where `mark` owns the line at `line`, other cells arbitrary.
fn arb_board_with_line() -> impl Strategy<Value = (Board, Mark)> {
    (0usize..LINES.len(), arb_mark(), prop::array::uniform9(arb_square())).prop_map(
        |(line, mark, mut squares)| {
            for i in LINES[line] {
                squares[i] = Square::Occupied(mark);
            }
            (Board::from_squares(squares), mark)
        },
    )
}

/// Plays a sequence of attempted cells, skipping the illegal ones.
fn play(attempts: &[usize]) -> GameState {
    attempts
        .iter()
        .fold(GameState::new(), |game, &cell| game.place(cell).unwrap_or(game))
}

fn other_mark_has_line(board: &Board, mark: Mark) -> bool {
    let other = Square::Occupied(mark.opponent());
    LINES
        .iter()
        .any(|line| line.iter().all(|&i| board.get(i) == Some(other)))
}

proptest! {
    #[test]
    fn completed_line_wins_for_its_mark((board, mark) in arb_board_with_line()) {
        prop_assume!(!other_mark_has_line(&board, mark));
        prop_assert_eq!(evaluate(&board), GameStatus::Won(mark));
    }

    #[test]
    fn evaluate_is_idempotent(squares in prop::array::uniform9(arb_square())) {
        let board = Board::from_squares(squares);
        let first = evaluate(&board);
        prop_assert_eq!(evaluate(&board), first);
    }

    #[test]
    fn legal_play_keeps_mark_counts_balanced(attempts in prop::collection::vec(0usize..12, 0..20)) {
        let game = play(&attempts);
        let x = game.board().count(Mark::Player);
        let o = game.board().count(Mark::Opponent);
        prop_assert!(x == o || x == o + 1, "x={} o={}", x, o);
        prop_assert_eq!(evaluate(game.board()), game.status());
    }

    #[test]
    fn terminal_status_is_stable(attempts in prop::collection::vec(0usize..9, 0..30)) {
        let game = play(&attempts);
        if game.status().is_terminal() {
            let status = game.status();
            prop_assert_eq!(evaluate(game.board()), status);
            prop_assert_eq!(evaluate(game.board()), status);
            prop_assert!(game.place(0).is_err());
        }
    }
}

#[test]
fn every_full_board_without_a_line_is_tied() {
    // All 2^9 assignments of X/O to a full board.
    let mut tied = 0;
    for bits in 0u32..512 {
        let mut squares = [Square::Empty; 9];
        for (i, square) in squares.iter_mut().enumerate() {
            let mark = if bits & (1 << i) != 0 { Mark::Player } else { Mark::Opponent };
            *square = Square::Occupied(mark);
        }
        let board = Board::from_squares(squares);
        if winning_mark(&board).is_none() {
            assert_eq!(evaluate(&board), GameStatus::Tied);
            tied += 1;
        }
    }
    assert!(tied > 0);
}

#[test]
fn empty_board_is_in_progress() {
    assert_eq!(evaluate(&Board::new()), GameStatus::InProgress);
}
