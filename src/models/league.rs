//! League: the in-memory working copy of all three tables, and LeagueError.

use crate::models::game::{HistoryEntry, MatchRecord};
use crate::models::invitation::{Invitation, InvitationId};
use crate::models::player::{PlayerRanking, RankedPlayer};
use crate::store::StoreError;

/// Errors that can occur during league operations.
#[derive(Debug)]
pub enum LeagueError {
    /// Winner equals loser, a player is not in the standings, or a set score is out of range.
    InvalidMatchInput(String),
    /// Name is not on the roster.
    UnknownPlayer(String),
    /// Invitation form input rejected (empty location, self-claim, ...).
    InvalidInvitation(String),
    /// No invitation with this id.
    InvitationNotFound(InvitationId),
    /// Invitation is no longer open.
    InvitationAlreadyClaimed {
        id: InvitationId,
        claimed_by: Option<String>,
    },
    /// Storage backend failed; the working copy may now disagree with storage.
    Persistence(StoreError),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InvalidMatchInput(reason) => write!(f, "Invalid match: {}", reason),
            LeagueError::UnknownPlayer(name) => write!(f, "Unknown player: {}", name),
            LeagueError::InvalidInvitation(reason) => write!(f, "Invalid invitation: {}", reason),
            LeagueError::InvitationNotFound(id) => write!(f, "Invitation #{} not found", id),
            LeagueError::InvitationAlreadyClaimed { id, claimed_by } => match claimed_by {
                Some(by) => write!(f, "Invitation #{} was already accepted by {}", id, by),
                None => write!(f, "Invitation #{} is no longer open", id),
            },
            LeagueError::Persistence(e) => write!(f, "Could not save to storage: {}", e),
        }
    }
}

impl std::error::Error for LeagueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeagueError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for LeagueError {
    fn from(e: StoreError) -> Self {
        LeagueError::Persistence(e)
    }
}

/// Full league state: standings (ranked order), match history, invitations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct League {
    /// Sorted descending by points after every recorded match.
    pub rankings: Vec<PlayerRanking>,
    /// Append-only, oldest first.
    pub history: Vec<MatchRecord>,
    /// Table order, oldest first.
    pub invitations: Vec<Invitation>,
}

impl League {
    /// A fresh league: every roster player (repeats dropped) at the starting points, no history.
    pub fn with_roster<I, S>(roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rankings: crate::logic::unique_roster(roster)
                .into_iter()
                .map(PlayerRanking::new)
                .collect(),
            ..Self::default()
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRanking> {
        self.rankings.iter().find(|p| p.name == name)
    }

    pub fn get_player_mut(&mut self, name: &str) -> Option<&mut PlayerRanking> {
        self.rankings.iter_mut().find(|p| p.name == name)
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.player(name).is_some()
    }

    /// Player names in standings order.
    pub fn player_names(&self) -> Vec<String> {
        self.rankings.iter().map(|p| p.name.clone()).collect()
    }

    /// Standings with a 1-based rank column. Read-only.
    pub fn standings(&self) -> Vec<RankedPlayer> {
        self.rankings
            .iter()
            .enumerate()
            .map(|(i, p)| RankedPlayer {
                rank: i + 1,
                player: p.clone(),
            })
            .collect()
    }

    /// Match history with the derived score column.
    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.iter().map(HistoryEntry::from).collect()
    }

    pub fn invitation(&self, id: InvitationId) -> Option<&Invitation> {
        self.invitations.iter().find(|i| i.id == id)
    }

    pub fn get_invitation_mut(&mut self, id: InvitationId) -> Option<&mut Invitation> {
        self.invitations.iter_mut().find(|i| i.id == id)
    }
}
