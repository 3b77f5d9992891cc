//! Computer opponent move selection.
//!
//! A greedy one-ply heuristic, tried tier by tier:
//!
//! 1. **Win now** - the first empty cell (ascending) where an opponent mark
//!    completes a line.
//! 2. **Block** - the first empty cell (ascending) where a player mark would
//!    complete a line.
//! 3. **Random** - uniform over the empty cells.
//!
//! It does not look further ahead and does not see forks. That is the
//! game's difficulty level; keep it as is.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::action::SelectError;
use crate::rules::winning_mark;
use crate::types::{Board, Mark};

/// Heuristic tier that produced a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Tier {
    /// Completes an opponent line.
    #[display("win")]
    WinNow,
    /// Occupies the cell the player needs.
    #[display("block")]
    Block,
    /// Nothing urgent, picked at random.
    #[display("random")]
    Random,
}

/// A selected cell plus the tier that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Cell index in `0..9`.
    pub cell: usize,
    /// Tier that produced the cell.
    pub tier: Tier,
}

/// First empty cell (ascending) where `mark` would complete a line.
fn completing_cell(board: &Board, empty: &[usize], mark: Mark) -> Option<usize> {
    empty.iter().copied().find(|&cell| {
        board
            .with_mark(cell, mark)
            .map(|hypothetical| winning_mark(&hypothetical) == Some(mark))
            .unwrap_or(false)
    })
}

/// Picks a cell for the opponent and reports which tier chose it.
#[instrument(skip(board, rng))]
pub fn choose<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<Choice, SelectError> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return Err(SelectError::NoMovesAvailable);
    }

    let choice = if let Some(cell) = completing_cell(board, &empty, Mark::Opponent) {
        Choice {
            cell,
            tier: Tier::WinNow,
        }
    } else if let Some(cell) = completing_cell(board, &empty, Mark::Player) {
        Choice {
            cell,
            tier: Tier::Block,
        }
    } else {
        let cell = *empty.choose(rng).ok_or(SelectError::NoMovesAvailable)?;
        Choice {
            cell,
            tier: Tier::Random,
        }
    };

    debug!(cell = choice.cell, tier = %choice.tier, "Opponent chose cell");
    Ok(choice)
}

/// Picks a cell for the opponent.
pub fn select_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<usize, SelectError> {
    choose(board, rng).map(|choice| choice.cell)
}

/// Opponent with its own random source.
///
/// Production code uses [`Opponent::from_entropy`]; tests and `--seed` runs
/// inject a seeded generator for reproducible random-tier picks.
#[derive(Debug, Clone)]
pub struct Opponent<R = StdRng> {
    rng: R,
}

impl Opponent<StdRng> {
    /// Opponent seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Opponent with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Opponent<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Picks a cell on `board`.
    pub fn choose(&mut self, board: &Board) -> Result<Choice, SelectError> {
        choose(board, &mut self.rng)
    }

    /// Picks a cell on `board`, discarding the tier.
    pub fn select_move(&mut self, board: &Board) -> Result<usize, SelectError> {
        select_move(board, &mut self.rng)
    }
}
