//! Invitation and InvitationStatus: open "looking for a match" requests.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Invitation id: positive, assigned as `max + 1`.
pub type InvitationId = u32;

/// Lifecycle of an invitation. `Claimed` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum InvitationStatus {
    #[default]
    Open,
    Claimed,
}

impl InvitationStatus {
    /// Name as stored in the Invitations table.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Open => "Open",
            InvitationStatus::Claimed => "Claimed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Open" => Some(InvitationStatus::Open),
            "Claimed" => Some(InvitationStatus::Claimed),
            _ => None,
        }
    }
}

/// An open request for a match, claimable by exactly one other player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub created_by: String,
    #[serde(with = "crate::models::timestamp")]
    pub created_at: NaiveDateTime,
    pub match_date: NaiveDate,
    /// Free text as typed, e.g. "19:30".
    pub match_time: String,
    pub location: String,
    pub status: InvitationStatus,
    /// Set only once the invitation is claimed.
    pub claimed_by: Option<String>,
}

impl Invitation {
    pub fn is_open(&self) -> bool {
        self.status == InvitationStatus::Open
    }
}
