//! Ranking engine: point exchange and standings update after a recorded match.

use crate::models::{League, LeagueError, MatchRecord, SetScore, MAX_GAMES_PER_SET, MAX_SETS};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the point exchange.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingRules {
    /// Fixed part of every exchange.
    pub base_points: f64,
    /// Applied when the winner had strictly fewer points than the loser.
    pub upset_multiplier: f64,
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            base_points: 50.0,
            upset_multiplier: 1.5,
        }
    }
}

impl RankingRules {
    /// Finite and not negative.
    pub fn accepts_base_points(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }

    /// Finite and at least 1.
    pub fn accepts_upset_multiplier(value: f64) -> bool {
        value.is_finite() && value >= 1.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !Self::accepts_base_points(self.base_points) {
            return Err(format!("base points must be a number >= 0 (got {})", self.base_points));
        }
        if !Self::accepts_upset_multiplier(self.upset_multiplier) {
            return Err(format!(
                "upset multiplier must be a number >= 1 (got {})",
                self.upset_multiplier
            ));
        }
        Ok(())
    }
}

/// Share of the loser's points added to the base.
const LOSER_POINTS_SHARE: f64 = 0.05;

/// Points moved from loser to winner: `base + 5% of loser`, times the upset
/// multiplier when `winner_points < loser_points`. Equal points are not an upset.
pub fn points_exchanged(winner_points: f64, loser_points: f64, rules: &RankingRules) -> f64 {
    let mut exchanged = rules.base_points + LOSER_POINTS_SHARE * loser_points;
    if winner_points < loser_points {
        exchanged *= rules.upset_multiplier;
    }
    exchanged
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Reject the match before anything is touched.
fn validate_match(
    league: &League,
    winner: &str,
    loser: &str,
    sets: &[SetScore],
    rules: &RankingRules,
) -> Result<(), LeagueError> {
    rules.validate().map_err(LeagueError::InvalidMatchInput)?;
    if winner == loser {
        return Err(LeagueError::InvalidMatchInput(
            "winner and loser cannot be the same person".to_string(),
        ));
    }
    for name in [winner, loser] {
        if !league.has_player(name) {
            return Err(LeagueError::InvalidMatchInput(format!(
                "{} is not in the rankings",
                name
            )));
        }
    }
    if sets.len() > MAX_SETS {
        return Err(LeagueError::InvalidMatchInput(format!(
            "at most {} sets can be recorded (got {})",
            MAX_SETS,
            sets.len()
        )));
    }
    if let Some((i, _)) = sets.iter().enumerate().find(|(_, s)| {
        s.winner_games > MAX_GAMES_PER_SET || s.loser_games > MAX_GAMES_PER_SET
    }) {
        return Err(LeagueError::InvalidMatchInput(format!(
            "set {} has more than {} games for one side",
            i + 1,
            MAX_GAMES_PER_SET
        )));
    }
    Ok(())
}

/// Record `winner` beating `loser` and update the standings.
///
/// 1. Compute the exchange from the pre-match points.
/// 2. Winner gains it; loser loses it, clamped at 0.
/// 3. Re-sort standings descending by points (stable: ties keep their previous order).
/// 4. Update wins / losses / matches played.
/// 5. Append the match (exchange rounded to 2 decimals, missing sets as 0-0).
///
/// Returns the appended record. Persisting is left to the caller.
pub fn record_match(
    league: &mut League,
    winner: &str,
    loser: &str,
    sets: &[SetScore],
    rules: &RankingRules,
    now: NaiveDateTime,
) -> Result<MatchRecord, LeagueError> {
    validate_match(league, winner, loser, sets, rules)?;

    let winner_points = league.player(winner).map(|p| p.points).unwrap_or_default();
    let loser_points = league.player(loser).map(|p| p.points).unwrap_or_default();
    let exchanged = points_exchanged(winner_points, loser_points, rules);

    if let Some(w) = league.get_player_mut(winner) {
        w.points += exchanged;
        w.add_win();
    }
    if let Some(l) = league.get_player_mut(loser) {
        l.points = (l.points - exchanged).max(0.0);
        l.add_loss();
    }
    league
        .rankings
        .sort_by(|a, b| b.points.total_cmp(&a.points));

    let mut played = [SetScore::default(); MAX_SETS];
    played[..sets.len()].copy_from_slice(sets);

    let record = MatchRecord {
        date: now,
        winner: winner.to_string(),
        loser: loser.to_string(),
        points_exchanged: round2(exchanged),
        sets: played,
    };
    league.history.push(record.clone());
    Ok(record)
}
