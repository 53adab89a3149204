//! Data structures for the tennis league: standings, match history, invitations.

mod game;
mod invitation;
mod league;
mod player;

pub use game::{HistoryEntry, MatchRecord, SetScore, MAX_GAMES_PER_SET, MAX_SETS};
pub use invitation::{Invitation, InvitationId, InvitationStatus};
pub use league::{League, LeagueError};
pub use player::{PlayerRanking, RankedPlayer, STARTING_POINTS};

/// Timestamps are stored and shown as `YYYY-MM-DD HH:MM:SS` (local time, no zone).
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn format(ts: &NaiveDateTime) -> String {
        ts.format(FORMAT).to_string()
    }

    pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s.trim(), FORMAT)
    }

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}
