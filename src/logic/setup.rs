//! Setup: the starting roster and seeding of an empty standings table.

use crate::models::{League, PlayerRanking};

/// Roster used when none is configured.
pub const DEFAULT_ROSTER: &[&str] = &[
    "Marinkovic",
    "Joseto",
    "Hernan",
    "Pavez",
    "Bozzo",
    "Hederra",
    "Poch",
    "Gonzalo Bezanilla",
];

/// Names in first-seen order with repeats dropped. The name is the player's identity.
pub fn unique_roster<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut roster: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if roster.contains(&name) {
            log::warn!("Player {:?} is listed more than once, keeping the first", name);
            continue;
        }
        roster.push(name);
    }
    roster
}

/// Fill empty standings with the roster at starting points. Returns true if it seeded.
/// Existing standings are never touched.
pub fn seed_rankings(league: &mut League, roster: &[String]) -> bool {
    if !league.rankings.is_empty() {
        return false;
    }
    league.rankings = unique_roster(roster.iter().map(String::as_str))
        .into_iter()
        .map(PlayerRanking::new)
        .collect();
    true
}
