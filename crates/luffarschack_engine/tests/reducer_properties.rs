//! Property-based tests for the session reducer over reachable sessions.

use luffarschack_engine::{Action, Board, Effect, GameStatus, Mark, SessionState, reduce};
use proptest::prelude::*;

/// Feeds attempted cells to the reducer, alternating player and opponent.
/// Rejected moves are skipped, so every returned state is reachable.
fn play(attempts: &[usize]) -> SessionState {
    attempts.iter().fold(SessionState::default(), |state, &cell| {
        let action = match state.pending() {
            Some(ticket) => Action::OpponentMove { ticket, cell },
            None => Action::PlayerMove { cell },
        };
        reduce(&state, action).map(|t| t.state).unwrap_or(state)
    })
}

proptest! {
    #[test]
    fn reset_always_starts_a_fresh_game(attempts in prop::collection::vec(0usize..9, 0..30)) {
        let state = play(&attempts);
        let t = reduce(&state, Action::Reset).expect("reset is always accepted");

        prop_assert_eq!(t.state.board(), &Board::new());
        prop_assert_eq!(t.state.turn(), Mark::Player);
        prop_assert_eq!(t.state.status(), GameStatus::InProgress);
        prop_assert!(!t.state.is_thinking());
        prop_assert_eq!(t.state.stats(), state.stats());

        let cancelled: Vec<Effect> = state.pending().map(Effect::CancelOpponent).into_iter().collect();
        prop_assert_eq!(t.effects, cancelled);
    }

    #[test]
    fn finished_games_count_exactly_once(attempts in prop::collection::vec(0usize..9, 0..30)) {
        let state = play(&attempts);
        let expected = u64::from(state.status().is_terminal());
        prop_assert_eq!(state.stats().total(), expected);

        // Further moves on a finished board change nothing.
        if state.status().is_terminal() {
            let result = reduce(&state, Action::PlayerMove { cell: 0 });
            prop_assert!(result.is_err());
        }
    }
}

#[test]
fn reset_after_each_outcome_starts_fresh() {
    let scripts: [(&[usize], GameStatus); 3] = [
        (&[0, 3, 1, 4, 2], GameStatus::Won(Mark::Player)),
        (&[0, 3, 1, 4, 8, 5], GameStatus::Won(Mark::Opponent)),
        (&[0, 4, 2, 1, 7, 5, 3, 6, 8], GameStatus::Tied),
    ];
    for (cells, outcome) in scripts {
        let finished = play(cells);
        assert_eq!(finished.status(), outcome);

        let fresh = reduce(&finished, Action::Reset).unwrap().state;
        assert_eq!(fresh.board(), &Board::new());
        assert_eq!(fresh.turn(), Mark::Player);
        assert_eq!(fresh.status(), GameStatus::InProgress);
    }
}
