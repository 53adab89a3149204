//! League business logic: ranking engine, invitation lifecycle, setup, history display.

mod history;
mod invitations;
mod ranking;
mod setup;

pub use history::format_score;
pub use invitations::{
    claim_invitation, create_invitation, list_open_invitations, next_invitation_id, NewInvitation,
};
pub use ranking::{points_exchanged, record_match, RankingRules};
pub use setup::{seed_rankings, unique_roster, DEFAULT_ROSTER};
