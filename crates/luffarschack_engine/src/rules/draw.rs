//! Full-board detection.

use crate::types::{Board, Square};
use tracing::instrument;

/// Checks if every cell holds a mark.
///
/// A full board with no winner is a tie.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mark;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = Board::new().with_mark(4, Mark::Player).unwrap();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board() {
        let board = Board::from_squares([Square::Occupied(Mark::Opponent); 9]);
        assert!(is_full(&board));
    }
}
