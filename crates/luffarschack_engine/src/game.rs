//! Game state machine: move validation, evaluation and reset.
//!
//! ```text
//! InProgress ──move──▶ InProgress
//!      │
//!      └──────move──▶ Won(Player) | Won(Opponent) | Tied   (terminal)
//!
//! any state ──reset──▶ InProgress (empty board, Player to move)
//! ```
//!
//! The free functions are the primitive operations. [`GameState`] bundles
//! board, turn and status and uses them to advance a game.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::action::MoveError;
use crate::rules::{is_full, winning_mark};
use crate::types::{Board, GameStatus, Mark, Square};

/// Places `mark` at `cell` and returns the resulting board.
///
/// Fails when `status` is terminal, `cell` is outside `0..9` or the cell is
/// taken. The input board is not modified, and turn and status are left for
/// the caller to re-evaluate.
#[instrument(skip(board))]
pub fn apply_move(
    board: &Board,
    status: GameStatus,
    cell: usize,
    mark: Mark,
) -> Result<Board, MoveError> {
    if status.is_terminal() {
        return Err(MoveError::GameOver);
    }
    match board.get(cell) {
        None => Err(MoveError::OutOfRange(cell)),
        Some(Square::Occupied(_)) => Err(MoveError::CellOccupied(cell)),
        Some(Square::Empty) => board.with_mark(cell, mark),
    }
}

/// Classifies a board.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some(mark) = winning_mark(board) {
        GameStatus::Won(mark)
    } else if is_full(board) {
        GameStatus::Tied
    } else {
        GameStatus::InProgress
    }
}

/// A fresh game: empty board, Player to move.
pub fn reset() -> GameState {
    GameState::new()
}

/// Board, turn and status of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    turn: Mark,
    status: GameStatus,
}

impl GameState {
    /// Creates a new game with the player to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Mark::Player,
            status: GameStatus::InProgress,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Plays `cell` for the side to move.
    ///
    /// On success the board is updated, the status re-evaluated and, if the
    /// game continues, the turn passes to the other side.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn place(self, cell: usize) -> Result<Self, MoveError> {
        let board = apply_move(&self.board, self.status, cell, self.turn)?;
        let status = evaluate(&board);
        let turn = if status.is_terminal() {
            self.turn
        } else {
            self.turn.opponent()
        };
        debug!(cell, ?status, "Move applied");
        Ok(Self {
            board,
            turn,
            status,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
