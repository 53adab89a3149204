//! Derived score column for the history view.

use crate::models::SetScore;

/// Played sets as `"W-L"` joined by spaces. Unplayed 0-0 sets are skipped.
pub fn format_score(sets: &[SetScore]) -> String {
    sets.iter()
        .filter(|s| s.is_played())
        .map(|s| format!("{}-{}", s.winner_games, s.loser_games))
        .collect::<Vec<_>>()
        .join(" ")
}
