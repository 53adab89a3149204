//! MatchRecord and SetScore: the append-only match history.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum number of sets stored per match.
pub const MAX_SETS: usize = 5;

/// Maximum games one side can take in a set (7-5 / 7-6).
pub const MAX_GAMES_PER_SET: u8 = 7;

/// Games won by each side in one set. 0-0 means the set was not played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub winner_games: u8,
    pub loser_games: u8,
}

impl SetScore {
    pub fn new(winner_games: u8, loser_games: u8) -> Self {
        Self {
            winner_games,
            loser_games,
        }
    }

    /// A set counts as played when either side took at least one game.
    pub fn is_played(&self) -> bool {
        self.winner_games > 0 || self.loser_games > 0
    }
}

/// One recorded match. Immutable once appended to the history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// When the result was recorded, not when it was played.
    #[serde(with = "crate::models::timestamp")]
    pub date: NaiveDateTime,
    pub winner: String,
    pub loser: String,
    /// Rounded to 2 decimals.
    pub points_exchanged: f64,
    pub sets: [SetScore; MAX_SETS],
}

impl MatchRecord {
    /// Tennis-style score of the played sets, e.g. `"6-4 3-6 7-5"`.
    pub fn score(&self) -> String {
        crate::logic::format_score(&self.sets)
    }
}

/// History row for display, with the derived score column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(with = "crate::models::timestamp")]
    pub date: NaiveDateTime,
    pub winner: String,
    pub loser: String,
    pub score: String,
    pub points_exchanged: f64,
}

impl From<&MatchRecord> for HistoryEntry {
    fn from(m: &MatchRecord) -> Self {
        Self {
            date: m.date,
            winner: m.winner.clone(),
            loser: m.loser.clone(),
            score: m.score(),
            points_exchanged: m.points_exchanged,
        }
    }
}
