//! Win detection.

use crate::types::{Board, Mark, Square};
use tracing::instrument;

/// The 8 winning lines as index triples.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

/// Returns the mark that owns a complete line, if any.
///
/// Lines are scanned in table order and the first complete one wins. Under
/// alternating play at most one mark can own a line, so the order never
/// changes the answer for reachable boards.
#[instrument(skip(board))]
pub fn winning_mark(board: &Board) -> Option<Mark> {
    let squares = board.squares();
    LINES.iter().find_map(|&[a, b, c]| match squares[a] {
        Square::Occupied(mark) if squares[b] == squares[a] && squares[c] == squares[a] => {
            Some(mark)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn board_with(cells: &[(usize, Mark)]) -> Board {
        cells
            .iter()
            .try_fold(Board::new(), |board, &(i, mark)| board.with_mark(i, mark))
            .unwrap()
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(winning_mark(&Board::new()), None);
    }

    #[test]
    fn test_every_line_wins_for_both_marks() {
        for mark in Mark::iter() {
            for line in LINES {
                let board = board_with(&line.map(|i| (i, mark)));
                assert_eq!(winning_mark(&board), Some(mark), "line {:?}", line);
            }
        }
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(&[(0, Mark::Player), (1, Mark::Player), (2, Mark::Opponent)]);
        assert_eq!(winning_mark(&board), None);
    }
}
