//! Lifetime win/loss/tie counters.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::{GameStatus, Mark};

/// Cumulative results across games and restarts.
///
/// Counters only ever grow; each finished game bumps exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    /// Games the human won.
    pub player_wins: u32,
    /// Games the computer won.
    pub computer_wins: u32,
    /// Games that filled the board without a winner.
    pub ties: u32,
}

impl LifetimeStats {
    /// Creates stats from raw counters.
    pub fn new(player_wins: u32, computer_wins: u32, ties: u32) -> Self {
        Self {
            player_wins,
            computer_wins,
            ties,
        }
    }

    /// Returns stats with the counter for `status` incremented.
    ///
    /// `InProgress` leaves the counters unchanged.
    #[instrument]
    pub fn record(self, status: GameStatus) -> Self {
        let mut next = self;
        match status {
            GameStatus::Won(Mark::Player) => next.player_wins = next.player_wins.saturating_add(1),
            GameStatus::Won(Mark::Opponent) => {
                next.computer_wins = next.computer_wins.saturating_add(1)
            }
            GameStatus::Tied => next.ties = next.ties.saturating_add(1),
            GameStatus::InProgress => {}
        }
        next
    }

    /// Total finished games.
    pub fn total(&self) -> u64 {
        u64::from(self.player_wins) + u64::from(self.computer_wins) + u64::from(self.ties)
    }

    /// Player wins divided by computer wins.
    ///
    /// With no computer wins yet this is just the player's win count.
    pub fn win_loss_ratio(&self) -> f64 {
        if self.computer_wins > 0 {
            f64::from(self.player_wins) / f64::from(self.computer_wins)
        } else {
            f64::from(self.player_wins)
        }
    }

    /// Share of ties among all games, as a percentage (0.0-100.0).
    pub fn tie_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            f64::from(self.ties) / total as f64 * 100.0
        }
    }
}

impl std::fmt::Display for LifetimeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player Wins: {}  Computer Wins: {}  Ties: {}  W/L: {:.2}  Tie %: {:.0}%",
            self.player_wins,
            self.computer_wins,
            self.ties,
            self.win_loss_ratio(),
            self.tie_percentage()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_each_outcome() {
        let stats = LifetimeStats::default()
            .record(GameStatus::Won(Mark::Player))
            .record(GameStatus::Won(Mark::Opponent))
            .record(GameStatus::Won(Mark::Opponent))
            .record(GameStatus::Tied)
            .record(GameStatus::InProgress);
        assert_eq!(stats, LifetimeStats::new(1, 2, 1));
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_ratio_without_computer_wins() {
        let stats = LifetimeStats::new(3, 0, 1);
        assert_eq!(stats.win_loss_ratio(), 3.0);
    }

    #[test]
    fn test_ratio_and_tie_percentage() {
        let stats = LifetimeStats::new(1, 2, 1);
        assert_eq!(stats.win_loss_ratio(), 0.5);
        assert_eq!(stats.tie_percentage(), 25.0);
        assert_eq!(LifetimeStats::default().tie_percentage(), 0.0);
    }

    #[test]
    fn test_display_labels_each_field_once() {
        let text = LifetimeStats::new(1, 2, 1).to_string();
        assert_eq!(
            text,
            "Player Wins: 1  Computer Wins: 2  Ties: 1  W/L: 0.50  Tie %: 25%"
        );
        assert_eq!(text.matches("Ties:").count(), 1);
    }
}
