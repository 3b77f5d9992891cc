//! Luffarschack engine - tic-tac-toe rules, opponent heuristic and session reducer.
//!
//! Everything here is pure: no clocks, no threads, no storage. The
//! application crate owns those and feeds this crate actions.
//!
//! # Example
//!
//! ```
//! use luffarschack_engine::{Action, Effect, Opponent, SessionState, reduce};
//!
//! let state = SessionState::default();
//! let t = reduce(&state, Action::PlayerMove { cell: 4 }).unwrap();
//! let Some(Effect::ScheduleOpponent(ticket)) = t.effects.first().copied() else {
//!     unreachable!("a non-terminal player move schedules the opponent");
//! };
//!
//! let mut opponent = Opponent::seeded(7);
//! let cell = opponent.select_move(t.state.board()).unwrap();
//! let t = reduce(&t.state, Action::OpponentMove { ticket, cell }).unwrap();
//! assert!(t.state.accepts_player_input());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod opponent;
mod position;
mod reducer;
pub mod rules;
mod stats;
mod store;
mod types;

pub use action::{Action, MoveError, SelectError, Ticket};
pub use game::{GameState, apply_move, evaluate, reset};
pub use opponent::{Choice, Opponent, Tier, choose, select_move};
pub use position::Position;
pub use reducer::{Effect, SessionState, Transition, reduce};
pub use stats::LifetimeStats;
pub use store::{MemoryStatsStore, StatsStore, StoreError};
pub use types::{Board, CELLS, GameStatus, Mark, Square};
