//! Session state and its pure reducer.
//!
//! [`reduce`] takes the current [`SessionState`] and an [`Action`] and
//! returns the next state plus the [`Effect`]s the owner must carry out
//! (schedule the opponent, cancel it, persist stats). It does no I/O and
//! keeps no clock, so every transition can be checked in isolation.
//!
//! Turn discipline:
//!
//! - The player may move only when the game is in progress, it is the
//!   player's turn and no opponent turn is pending.
//! - A legal non-terminal player move hands the turn to the opponent and
//!   issues a fresh [`Ticket`]. While that ticket is pending the board is
//!   read-only for the player.
//! - An opponent move is accepted only with the pending ticket. Anything
//!   else is stale (typically scheduled before a reset) and is dropped.
//! - The stats are bumped exactly once, on the move that ends the game.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::action::{Action, MoveError, Ticket};
use crate::game::{self, GameState};
use crate::stats::LifetimeStats;
use crate::types::{Board, GameStatus, Mark};

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Run the opponent after the thinking delay, then dispatch
    /// [`Action::OpponentMove`] with this ticket.
    ScheduleOpponent(Ticket),
    /// The scheduled opponent turn is void; abort it if still pending.
    CancelOpponent(Ticket),
    /// A game just ended; write these counters to the store.
    PersistStats(LifetimeStats),
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    game: GameState,
    stats: LifetimeStats,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl SessionState {
    /// Starts a session from previously loaded stats.
    pub fn new(stats: LifetimeStats) -> Self {
        Self {
            game: GameState::new(),
            stats,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Side to move.
    pub fn turn(&self) -> Mark {
        self.game.turn()
    }

    /// Game status.
    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Lifetime counters, including the current session.
    pub fn stats(&self) -> LifetimeStats {
        self.stats
    }

    /// Ticket of the scheduled opponent turn, if one is pending.
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// True while the opponent is "thinking".
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// True when a player move would be considered at all.
    pub fn accepts_player_input(&self) -> bool {
        !self.status().is_terminal() && self.turn() == Mark::Player && self.pending.is_none()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(LifetimeStats::default())
    }
}

/// Result of a successful [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the action.
    pub state: SessionState,
    /// Effects to carry out, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &SessionState) -> Self {
        Self {
            state: *state,
            effects: Vec::new(),
        }
    }
}

/// Applies `action` to `state`.
///
/// Rejected moves return a [`MoveError`] and the caller keeps the old state.
#[instrument(skip(state), fields(status = ?state.status(), pending = ?state.pending))]
pub fn reduce(state: &SessionState, action: Action) -> Result<Transition, MoveError> {
    match action {
        Action::PlayerMove { cell } => player_move(state, cell),
        Action::OpponentMove { ticket, cell } => opponent_move(state, ticket, cell),
        Action::Reset => Ok(reset(state)),
    }
}

fn player_move(state: &SessionState, cell: usize) -> Result<Transition, MoveError> {
    if state.status().is_terminal() {
        return Err(MoveError::GameOver);
    }
    if !state.accepts_player_input() {
        return Err(MoveError::NotPlayersTurn);
    }

    let game = state.game.place(cell)?;
    let mut next = SessionState { game, ..*state };

    if game.status().is_terminal() {
        return Ok(finish(next));
    }

    let ticket = Ticket(next.next_ticket);
    next.next_ticket += 1;
    next.pending = Some(ticket);
    debug!(cell, %ticket, "Player moved, opponent scheduled");
    Ok(Transition {
        state: next,
        effects: vec![Effect::ScheduleOpponent(ticket)],
    })
}

fn opponent_move(state: &SessionState, ticket: Ticket, cell: usize) -> Result<Transition, MoveError> {
    if state.pending != Some(ticket) {
        debug!(%ticket, "Ignoring stale opponent turn");
        return Ok(Transition::unchanged(state));
    }

    let game = state.game.place(cell)?;
    let next = SessionState {
        game,
        pending: None,
        ..*state
    };
    debug!(cell, %ticket, "Opponent moved");

    if game.status().is_terminal() {
        Ok(finish(next))
    } else {
        Ok(Transition {
            state: next,
            effects: Vec::new(),
        })
    }
}

fn finish(mut state: SessionState) -> Transition {
    let status = state.status();
    state.stats = state.stats.record(status);
    info!(?status, stats = ?state.stats, "Game finished");
    Transition {
        state,
        effects: vec![Effect::PersistStats(state.stats)],
    }
}

fn reset(state: &SessionState) -> Transition {
    let effects = state
        .pending
        .map(|ticket| vec![Effect::CancelOpponent(ticket)])
        .unwrap_or_default();
    let next = SessionState {
        game: game::reset(),
        pending: None,
        ..*state
    };
    debug!(cancelled = effects.len(), "Game reset");
    Transition {
        state: next,
        effects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(transition: &Transition) -> Ticket {
        match transition.effects.as_slice() {
            [Effect::ScheduleOpponent(ticket)] => *ticket,
            other => panic!("expected a schedule, got {:?}", other),
        }
    }

    #[test]
    fn test_player_move_schedules_opponent() {
        let state = SessionState::default();
        let t = reduce(&state, Action::PlayerMove { cell: 0 }).unwrap();
        let ticket = scheduled(&t);
        assert!(t.state.is_thinking());
        assert_eq!(t.state.turn(), Mark::Opponent);
        assert!(!t.state.accepts_player_input());
        assert_eq!(t.state.pending(), Some(ticket));
    }

    #[test]
    fn test_player_rejected_while_thinking() {
        let state = SessionState::default();
        let t = reduce(&state, Action::PlayerMove { cell: 0 }).unwrap();
        assert_eq!(
            reduce(&t.state, Action::PlayerMove { cell: 1 }),
            Err(MoveError::NotPlayersTurn)
        );
    }

    #[test]
    fn test_opponent_move_returns_turn() {
        let state = SessionState::default();
        let t = reduce(&state, Action::PlayerMove { cell: 0 }).unwrap();
        let ticket = scheduled(&t);
        let t = reduce(&t.state, Action::OpponentMove { ticket, cell: 4 }).unwrap();
        assert!(t.effects.is_empty());
        assert!(t.state.accepts_player_input());
        assert_eq!(t.state.board().count(Mark::Opponent), 1);
    }

    #[test]
    fn test_stale_ticket_after_reset_is_ignored() {
        let state = SessionState::default();
        let t = reduce(&state, Action::PlayerMove { cell: 0 }).unwrap();
        let ticket = scheduled(&t);

        let reset = reduce(&t.state, Action::Reset).unwrap();
        assert_eq!(reset.effects, vec![Effect::CancelOpponent(ticket)]);

        let late = reduce(&reset.state, Action::OpponentMove { ticket, cell: 4 }).unwrap();
        assert_eq!(late.state, reset.state);
        assert!(late.effects.is_empty());
        assert_eq!(late.state.board(), &Board::new());
    }

    #[test]
    fn test_tickets_are_never_reused() {
        let state = SessionState::default();
        let first = reduce(&state, Action::PlayerMove { cell: 0 }).unwrap();
        let reset = reduce(&first.state, Action::Reset).unwrap();
        let second = reduce(&reset.state, Action::PlayerMove { cell: 0 }).unwrap();
        assert_ne!(scheduled(&first), scheduled(&second));

        // The first ticket must not drive the second game.
        let late = reduce(
            &second.state,
            Action::OpponentMove {
                ticket: scheduled(&first),
                cell: 4,
            },
        )
        .unwrap();
        assert!(late.state.is_thinking());
    }

    #[test]
    fn test_win_persists_once() {
        // X: 0, 1, 2   O: 3, 4
        let mut state = SessionState::default();
        let mut persisted = Vec::new();
        for (player_cell, opponent_cell) in [(0, 3), (1, 4)] {
            let t = reduce(&state, Action::PlayerMove { cell: player_cell }).unwrap();
            let ticket = scheduled(&t);
            let t = reduce(&t.state, Action::OpponentMove { ticket, cell: opponent_cell }).unwrap();
            state = t.state;
        }
        let t = reduce(&state, Action::PlayerMove { cell: 2 }).unwrap();
        persisted.extend(t.effects.iter().copied());
        state = t.state;

        assert_eq!(state.status(), GameStatus::Won(Mark::Player));
        assert_eq!(persisted, vec![Effect::PersistStats(LifetimeStats::new(1, 0, 0))]);
        assert_eq!(
            reduce(&state, Action::PlayerMove { cell: 8 }),
            Err(MoveError::GameOver)
        );
    }

    /// Plays `cells` alternately for player and opponent from a fresh session.
    fn play_script(cells: &[usize]) -> SessionState {
        cells.iter().fold(SessionState::default(), |state, &cell| {
            let action = match state.pending() {
                Some(ticket) => Action::OpponentMove { ticket, cell },
                None => Action::PlayerMove { cell },
            };
            reduce(&state, action).unwrap().state
        })
    }

    fn assert_fresh_game(state: &SessionState) {
        assert_eq!(state.board(), &Board::new());
        assert_eq!(state.turn(), Mark::Player);
        assert_eq!(state.status(), GameStatus::InProgress);
        assert!(state.accepts_player_input());
    }

    #[test]
    fn test_reset_after_player_win() {
        let won = play_script(&[0, 3, 1, 4, 2]);
        assert_eq!(won.status(), GameStatus::Won(Mark::Player));

        let t = reduce(&won, Action::Reset).unwrap();
        assert!(t.effects.is_empty());
        assert_fresh_game(&t.state);
        assert_eq!(t.state.stats(), LifetimeStats::new(1, 0, 0));
    }

    #[test]
    fn test_reset_after_opponent_win() {
        let lost = play_script(&[0, 3, 1, 4, 8, 5]);
        assert_eq!(lost.status(), GameStatus::Won(Mark::Opponent));
        // The turn stays with the winner until the reset.
        assert_eq!(lost.turn(), Mark::Opponent);

        let t = reduce(&lost, Action::Reset).unwrap();
        assert_fresh_game(&t.state);
        assert_eq!(t.state.stats(), LifetimeStats::new(0, 1, 0));
    }

    #[test]
    fn test_reset_after_tie() {
        // X O X / X O O / O X X
        let tied = play_script(&[0, 4, 2, 1, 7, 5, 3, 6, 8]);
        assert_eq!(tied.status(), GameStatus::Tied);

        let t = reduce(&tied, Action::Reset).unwrap();
        assert_fresh_game(&t.state);
        assert_eq!(t.state.stats(), LifetimeStats::new(0, 0, 1));
    }

    #[test]
    fn test_reset_keeps_stats() {
        let state = SessionState::new(LifetimeStats::new(2, 1, 0));
        let t = reduce(&state, Action::Reset).unwrap();
        assert!(t.effects.is_empty());
        assert_eq!(t.state.stats(), LifetimeStats::new(2, 1, 0));
        assert_eq!(t.state.turn(), Mark::Player);
        assert_eq!(t.state.status(), GameStatus::InProgress);
    }
}
