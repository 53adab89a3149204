//! Invitation lifecycle: create (Open), list open, claim (Open -> Claimed, terminal).

use crate::models::{Invitation, InvitationId, InvitationStatus, League, LeagueError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Form input for a new invitation.
#[derive(Clone, Debug, Deserialize)]
pub struct NewInvitation {
    pub created_by: String,
    pub match_date: NaiveDate,
    pub match_time: String,
    pub location: String,
}

/// 1 for an empty table, else the highest existing id + 1. Ids are never reused.
pub fn next_invitation_id(invitations: &[Invitation]) -> InvitationId {
    invitations.iter().map(|i| i.id).max().map_or(1, |max| max + 1)
}

/// Append a new Open invitation and return it. Persisting and notifying are left to the caller.
pub fn create_invitation(
    league: &mut League,
    new: NewInvitation,
    now: NaiveDateTime,
) -> Result<Invitation, LeagueError> {
    let created_by = new.created_by.trim();
    if !league.has_player(created_by) {
        return Err(LeagueError::UnknownPlayer(created_by.to_string()));
    }
    let match_time = new.match_time.trim();
    if match_time.is_empty() {
        return Err(LeagueError::InvalidInvitation("match time is required".to_string()));
    }
    let location = new.location.trim();
    if location.is_empty() {
        return Err(LeagueError::InvalidInvitation("location is required".to_string()));
    }

    let invitation = Invitation {
        id: next_invitation_id(&league.invitations),
        created_by: created_by.to_string(),
        created_at: now,
        match_date: new.match_date,
        match_time: match_time.to_string(),
        location: location.to_string(),
        status: InvitationStatus::Open,
        claimed_by: None,
    };
    league.invitations.push(invitation.clone());
    Ok(invitation)
}

/// Open invitations in table order.
pub fn list_open_invitations(league: &League) -> Vec<Invitation> {
    league
        .invitations
        .iter()
        .filter(|i| i.is_open())
        .cloned()
        .collect()
}

/// Mark invitation `id` as claimed by `claimer` and return the updated record.
/// Only an Open invitation can be claimed, and not by its creator.
pub fn claim_invitation(
    league: &mut League,
    id: InvitationId,
    claimer: &str,
) -> Result<Invitation, LeagueError> {
    let claimer = claimer.trim();
    let known_claimer = league.has_player(claimer);
    let invitation = league
        .get_invitation_mut(id)
        .ok_or(LeagueError::InvitationNotFound(id))?;
    if !invitation.is_open() {
        return Err(LeagueError::InvitationAlreadyClaimed {
            id,
            claimed_by: invitation.claimed_by.clone(),
        });
    }
    if !known_claimer {
        return Err(LeagueError::UnknownPlayer(claimer.to_string()));
    }
    if invitation.created_by == claimer {
        return Err(LeagueError::InvalidInvitation(
            "you cannot accept your own invitation".to_string(),
        ));
    }
    invitation.status = InvitationStatus::Claimed;
    invitation.claimed_by = Some(claimer.to_string());
    Ok(invitation.clone())
}
