//! Core domain types for the board.

use serde::{Deserialize, Serialize};

use crate::action::MoveError;

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// Which side owns a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Mark {
    /// The human player (X, always moves first).
    Player,
    /// The computer opponent (O).
    Opponent,
}

impl Mark {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Player => Mark::Opponent,
            Mark::Opponent => Mark::Player,
        }
    }

    /// Returns the symbol drawn for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Opponent => 'O',
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 board, row-major.
///
/// ```text
/// 0 | 1 | 2
/// ---------
/// 3 | 4 | 5
/// ---------
/// 6 | 7 | 8
/// ```
///
/// Boards are values: [`Board::with_mark`] returns a new board and leaves
/// the original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; CELLS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELLS],
        }
    }

    /// Builds a board from raw squares.
    pub fn from_squares(squares: [Square; CELLS]) -> Self {
        Self { squares }
    }

    /// Gets the square at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELLS] {
        &self.squares
    }

    /// Returns a copy of this board with `mark` written at `index`.
    ///
    /// Only range is checked here; occupancy and game status are the
    /// state machine's business (see [`crate::apply_move`]).
    pub fn with_mark(&self, index: usize, mark: Mark) -> Result<Self, MoveError> {
        if index >= CELLS {
            return Err(MoveError::OutOfRange(index));
        }
        let mut next = *self;
        next.squares[index] = Square::Occupied(mark);
        Ok(next)
    }

    /// Indices of empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, square)| **square == Square::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    /// Counts the cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares
            .iter()
            .filter(|square| **square == Square::Occupied(mark))
            .count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based key so the text doubles as a key map.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.squares[index] {
                    Square::Empty => char::from_digit((index + 1) as u32, 10).unwrap_or('?'),
                    Square::Occupied(mark) => mark.symbol(),
                };
                result.push(symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// A side completed a line.
    Won(Mark),
    /// Board is full with no winning line.
    Tied,
}

impl GameStatus {
    /// Returns true once the game has been decided.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            GameStatus::Won(mark) => Some(mark),
            _ => None,
        }
    }

    /// Banner text shown when the game ends.
    pub fn banner(self) -> Option<String> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won(mark) => Some(format!("{} Wins!", mark)),
            GameStatus::Tied => Some("It's a tie!".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_mark_leaves_original_untouched() {
        let board = Board::new();
        let next = board.with_mark(4, Mark::Player).unwrap();
        assert_eq!(board.get(4), Some(Square::Empty));
        assert_eq!(next.get(4), Some(Square::Occupied(Mark::Player)));
    }

    #[test]
    fn test_winner_only_for_won_games() {
        assert_eq!(GameStatus::Won(Mark::Opponent).winner(), Some(Mark::Opponent));
        assert_eq!(GameStatus::Tied.winner(), None);
        assert_eq!(GameStatus::InProgress.winner(), None);
    }

    #[test]
    fn test_with_mark_out_of_range() {
        let board = Board::new();
        assert_eq!(board.with_mark(9, Mark::Player), Err(MoveError::OutOfRange(9)));
    }

    #[test]
    fn test_empty_cells_ascending() {
        let board = Board::new()
            .with_mark(0, Mark::Player)
            .and_then(|b| b.with_mark(4, Mark::Opponent))
            .unwrap();
        assert_eq!(board.empty_cells(), vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(board.count(Mark::Player), 1);
        assert_eq!(board.count(Mark::Opponent), 1);
    }

    #[test]
    fn test_display_shows_keys_for_empty_cells() {
        let board = Board::new().with_mark(0, Mark::Player).unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|5|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_banner() {
        assert_eq!(GameStatus::Won(Mark::Player).banner().as_deref(), Some("X Wins!"));
        assert_eq!(GameStatus::Won(Mark::Opponent).banner().as_deref(), Some("O Wins!"));
        assert_eq!(GameStatus::Tied.banner().as_deref(), Some("It's a tie!"));
        assert_eq!(GameStatus::InProgress.banner(), None);
    }
}
