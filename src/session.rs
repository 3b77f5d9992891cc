//! The single owner of a live game.
//!
//! [`GameSession`] applies the engine reducer, writes stats to the store on
//! every finished game, and hands timer effects back to its driver (see
//! [`crate::runner`]). It is synchronous: the driver decides when things
//! happen, the session decides what happens.

use derive_getters::Getters;
use derive_more::{Display, Error, From};
use luffarschack_engine::{
    Action, Board, Effect, GameStatus, LifetimeStats, Mark, MoveError, Opponent, SessionState,
    StatsStore, StoreError, Ticket, reduce,
};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// Immutable read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct Snapshot {
    board: Board,
    turn: Mark,
    status: GameStatus,
    stats: LifetimeStats,
    thinking: bool,
    /// Last persistence failure, cleared by the next successful save.
    persistence_error: Option<String>,
    /// Internal invariant violation, if one was hit.
    fault: Option<String>,
}

impl Snapshot {
    /// True when the board accepts a click.
    pub fn accepts_player_input(&self) -> bool {
        !self.status.is_terminal() && self.turn == Mark::Player && !self.thinking
    }
}

/// Failures the session cannot absorb on its own.
#[derive(Debug, Clone, Display, Error, From)]
pub enum SessionError {
    /// A move was rejected.
    #[display("Invalid move: {}", _0)]
    Move(MoveError),

    /// Engine state that should be impossible.
    #[display("Invariant violation: {}", _0)]
    #[from(ignore)]
    Invariant(#[error(not(source))] String),
}

/// Game state, stats store and opponent for one player.
#[derive(Debug)]
pub struct GameSession<S, R = StdRng> {
    state: SessionState,
    store: S,
    opponent: Opponent<R>,
    unsaved: bool,
    persistence_error: Option<String>,
    fault: Option<String>,
}

impl<S: StatsStore, R: Rng> GameSession<S, R> {
    /// Loads lifetime stats from `store` and starts a fresh game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored stats cannot be read.
    #[instrument(skip(store, opponent))]
    pub fn open(store: S, opponent: Opponent<R>) -> Result<Self, StoreError> {
        let stats = store.load()?;
        info!(?stats, "Session opened");
        Ok(Self {
            state: SessionState::new(stats),
            store,
            opponent,
            unsaved: false,
            persistence_error: None,
            fault: None,
        })
    }

    /// Current engine state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True when the last stats write failed and has not been retried yet.
    pub fn has_unsaved_stats(&self) -> bool {
        self.unsaved
    }

    /// Builds the read model.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: *self.state.board(),
            turn: self.state.turn(),
            status: self.state.status(),
            stats: self.state.stats(),
            thinking: self.state.is_thinking(),
            persistence_error: self.persistence_error.clone(),
            fault: self.fault.clone(),
        }
    }

    /// Plays the player's mark at `cell`.
    ///
    /// Returns the timer effects the driver must carry out.
    #[instrument(skip(self))]
    pub fn handle_player_move(&mut self, cell: usize) -> Result<Vec<Effect>, MoveError> {
        self.dispatch(Action::PlayerMove { cell })
    }

    /// Starts a new game. Lifetime stats are kept and any recorded fault
    /// is cleared.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) -> Vec<Effect> {
        self.fault = None;
        // Reset is accepted in every state.
        self.dispatch(Action::Reset).unwrap_or_default()
    }

    /// Runs the opponent turn scheduled under `ticket`.
    ///
    /// A ticket that is no longer pending is ignored. A selector failure is
    /// an invariant violation: it is logged, recorded in the snapshot and
    /// returned, and no substitute move is made.
    #[instrument(skip(self))]
    pub fn play_opponent(&mut self, ticket: Ticket) -> Result<Vec<Effect>, SessionError> {
        if self.state.pending() != Some(ticket) {
            debug!(%ticket, "Opponent turn no longer pending");
            return Ok(Vec::new());
        }

        let choice = match self.opponent.choose(self.state.board()) {
            Ok(choice) => choice,
            Err(e) => return Err(self.invariant_violation(e.to_string())),
        };
        info!(cell = choice.cell, tier = %choice.tier, "Opponent plays");

        match self.dispatch(Action::OpponentMove {
            ticket,
            cell: choice.cell,
        }) {
            Ok(effects) => Ok(effects),
            Err(e) => Err(self.invariant_violation(format!("opponent move rejected: {}", e))),
        }
    }

    /// Retries a failed stats write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails again.
    #[instrument(skip(self))]
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.unsaved {
            return Ok(());
        }
        let stats = self.state.stats();
        self.save(&stats)
    }

    fn dispatch(&mut self, action: Action) -> Result<Vec<Effect>, MoveError> {
        let transition = reduce(&self.state, action).inspect_err(|e| {
            debug!(error = %e, ?action, "Action rejected");
        })?;
        self.state = transition.state;

        let mut timers = Vec::new();
        for effect in transition.effects {
            match effect {
                Effect::PersistStats(stats) => {
                    // Failure is recorded and retried later; play goes on.
                    let _ = self.save(&stats);
                }
                other => timers.push(other),
            }
        }
        Ok(timers)
    }

    fn save(&mut self, stats: &LifetimeStats) -> Result<(), StoreError> {
        match self.store.save(stats) {
            Ok(()) => {
                self.unsaved = false;
                self.persistence_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, ?stats, "Failed to persist stats, keeping them in memory");
                self.unsaved = true;
                self.persistence_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn invariant_violation(&mut self, message: String) -> SessionError {
        error!(%message, board = %self.state.board(), "Opponent invariant violated");
        self.fault = Some(message.clone());
        SessionError::Invariant(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luffarschack_engine::MemoryStatsStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> GameSession<MemoryStatsStore, ChaCha8Rng> {
        GameSession::open(
            MemoryStatsStore::new(),
            Opponent::new(ChaCha8Rng::seed_from_u64(11)),
        )
        .unwrap()
    }

    fn ticket(effects: &[Effect]) -> Ticket {
        match effects {
            [Effect::ScheduleOpponent(ticket)] => *ticket,
            other => panic!("expected a schedule, got {:?}", other),
        }
    }

    #[test]
    fn test_player_move_then_opponent() {
        let mut session = session();
        let effects = session.handle_player_move(0).unwrap();
        assert!(*session.snapshot().thinking());

        let effects = session.play_opponent(ticket(&effects)).unwrap();
        assert!(effects.is_empty());
        let snapshot = session.snapshot();
        assert!(snapshot.accepts_player_input());
        assert_eq!(snapshot.board().count(Mark::Opponent), 1);
        assert!(!snapshot.board().is_empty(0));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = session();
        let effects = session.handle_player_move(4).unwrap();
        let stale = ticket(&effects);
        assert_eq!(session.reset_game(), vec![Effect::CancelOpponent(stale)]);

        assert!(session.play_opponent(stale).unwrap().is_empty());
        assert_eq!(session.snapshot().board(), &Board::new());
    }

    #[test]
    fn test_reset_clears_fault() {
        let mut session = session();
        session.fault = Some("no moves available".to_string());
        assert!(session.snapshot().fault().is_some());

        session.reset_game();
        assert!(session.snapshot().fault().is_none());
        assert!(session.snapshot().accepts_player_input());
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut session = session();
        let before = session.snapshot();
        assert_eq!(session.handle_player_move(12), Err(MoveError::OutOfRange(12)));
        assert_eq!(session.snapshot(), before);
    }
}
