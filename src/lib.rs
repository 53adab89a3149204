//! Tennis league ranking tracker: library with models, business logic, storage and notifications.

pub mod config;
pub mod logic;
pub mod models;
pub mod notify;
pub mod service;
pub mod store;
pub mod web;

pub use config::AppConfig;
pub use logic::{
    claim_invitation, create_invitation, format_score, list_open_invitations, points_exchanged,
    record_match, NewInvitation, RankingRules,
};
pub use models::{
    HistoryEntry, Invitation, InvitationId, InvitationStatus, League, LeagueError, MatchRecord,
    PlayerRanking, RankedPlayer, SetScore, STARTING_POINTS,
};
pub use notify::{
    Delivery, EmailMessage, LogNotifier, MailSettings, Notifier, NotifyError, OutboxNotifier,
    SmtpNotifier, SmtpSettings,
};
pub use service::{LeagueService, LeagueSettings};
pub use store::{CsvTableStore, MemoryTableStore, Row, StoreError, Table, TableStore};
