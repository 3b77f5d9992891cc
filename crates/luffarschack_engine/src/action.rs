//! Actions that drive a game session, and the errors they can raise.
//!
//! Actions are domain events: they carry intent and are validated by the
//! reducer before anything changes.

use serde::{Deserialize, Serialize};

/// Identifies one scheduled opponent turn.
///
/// A ticket is issued every time the opponent is scheduled. Resetting the
/// game invalidates the outstanding ticket, so a late callback carrying it
/// is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("ticket#{_0}")]
pub struct Ticket(pub u64);

/// Input to [`crate::reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// The human clicked a cell.
    PlayerMove {
        /// Cell index, expected in `0..9`.
        cell: usize,
    },
    /// The scheduled opponent turn fired and the selector chose `cell`.
    OpponentMove {
        /// Ticket the turn was scheduled with.
        ticket: Ticket,
        /// Cell picked by the selector.
        cell: usize,
    },
    /// Start a fresh game. Lifetime stats are kept.
    Reset,
}

/// Why a move was rejected.
///
/// Every variant is recoverable: the move is ignored and nothing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Index outside `0..9`.
    #[display("Cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(#[error(not(source))] usize),

    /// Target cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(#[error(not(source))] usize),

    /// The game is already decided.
    #[display("Game is already over")]
    GameOver,

    /// The opponent is thinking, so the player cannot move.
    #[display("It's not the player's turn")]
    NotPlayersTurn,
}

/// Failure of the opponent move selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SelectError {
    /// Selector was invoked on a full board.
    #[display("No moves available: board is full")]
    NoMovesAvailable,
}
