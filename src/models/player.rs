//! PlayerRanking: one row of the standings table.

use serde::{Deserialize, Serialize};

/// Points every roster player starts the league with.
pub const STARTING_POINTS: f64 = 1000.0;

/// A player's standing. `name` is the identity key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
    pub name: String,
    /// Never negative.
    pub points: f64,
    /// Always `wins + losses`.
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerRanking {
    /// Create a player at the starting points with an empty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: STARTING_POINTS,
            matches_played: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// Record a win for this player.
    pub fn add_win(&mut self) {
        self.wins += 1;
        self.matches_played += 1;
    }

    /// Record a loss for this player.
    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.matches_played += 1;
    }
}

/// Standings row for display: rank (1-based, table order) plus the record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub rank: usize,
    #[serde(flatten)]
    pub player: PlayerRanking,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_and_loss_keep_matches_played_in_sync() {
        let mut p = PlayerRanking::new("Poch");
        p.add_win();
        p.add_loss();
        p.add_win();
        assert_eq!(p.wins, 2);
        assert_eq!(p.losses, 1);
        assert_eq!(p.matches_played, p.wins + p.losses);
        assert_eq!(p.points, STARTING_POINTS);
    }
}
