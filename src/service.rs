//! LeagueService: the application state object every action goes through.
//!
//! Each action runs in phases: validate and mutate the working copy, overwrite the
//! affected tables, then (for invitations) notify. The working copy is the writable
//! copy; storage is only read at startup and on `reload`.

use crate::logic::{self, NewInvitation, RankingRules};
use crate::models::{
    HistoryEntry, Invitation, InvitationId, League, LeagueError, MatchRecord, RankedPlayer, SetScore,
};
use crate::notify::{Delivery, EmailMessage, MailSettings, Notifier};
use crate::store::{self, StoreError, Table, TableStore};
use chrono::NaiveDateTime;

/// League-level settings: who plays, how points move, who gets emails.
#[derive(Clone, Debug, PartialEq)]
pub struct LeagueSettings {
    /// Seeded into an empty standings table.
    pub roster: Vec<String>,
    pub rules: RankingRules,
    pub mail: MailSettings,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            roster: logic::DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
            rules: RankingRules::default(),
            mail: MailSettings::default(),
        }
    }
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub struct LeagueService {
    league: League,
    store: Box<dyn TableStore>,
    notifier: Box<dyn Notifier>,
    settings: LeagueSettings,
    clock: Clock,
}

impl LeagueService {
    /// Load all tables, seeding empty ones, and build the working copy.
    pub fn open(
        store: Box<dyn TableStore>,
        notifier: Box<dyn Notifier>,
        settings: LeagueSettings,
    ) -> Result<Self, StoreError> {
        let league = load_league(store.as_ref(), &settings.roster)?;
        Ok(Self {
            league,
            store,
            notifier,
            settings,
            clock: Box::new(local_now),
        })
    }

    /// Replace the wall clock used for timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    /// Discard the working copy and read everything from storage again.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.league = load_league(self.store.as_ref(), &self.settings.roster)?;
        log::info!("Reloaded league from storage");
        Ok(())
    }

    pub fn players(&self) -> Vec<String> {
        self.league.player_names()
    }

    pub fn standings(&self) -> Vec<RankedPlayer> {
        self.league.standings()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.league.history_entries()
    }

    pub fn open_invitations(&self) -> Vec<Invitation> {
        logic::list_open_invitations(&self.league)
    }

    /// Record a result, then overwrite Rankings and Match History.
    pub fn record_match(
        &mut self,
        winner: &str,
        loser: &str,
        sets: &[SetScore],
    ) -> Result<MatchRecord, LeagueError> {
        let now = (self.clock)();
        let record = logic::record_match(&mut self.league, winner, loser, sets, &self.settings.rules, now)?;
        self.save(Table::Rankings)?;
        self.save(Table::MatchHistory)?;
        log::info!(
            "Match recorded: {} defeated {} ({} points exchanged)",
            record.winner,
            record.loser,
            record.points_exchanged
        );
        Ok(record)
    }

    /// Create an Open invitation, overwrite Invitations, then announce it.
    pub fn create_invitation(&mut self, new: NewInvitation) -> Result<(Invitation, Delivery), LeagueError> {
        let now = (self.clock)();
        let invitation = logic::create_invitation(&mut self.league, new, now)?;
        self.save(Table::Invitations)?;
        log::info!("Invitation #{} created by {}", invitation.id, invitation.created_by);
        let delivery = self.notify(EmailMessage::invitation_opened(&self.settings.mail, &invitation));
        Ok((invitation, delivery))
    }

    /// Claim an Open invitation, overwrite Invitations, then confirm to everyone.
    pub fn claim_invitation(
        &mut self,
        id: InvitationId,
        claimer: &str,
    ) -> Result<(Invitation, Delivery), LeagueError> {
        let invitation = logic::claim_invitation(&mut self.league, id, claimer)?;
        self.save(Table::Invitations)?;
        log::info!("Invitation #{} accepted by {}", id, claimer.trim());
        let delivery = self.notify(EmailMessage::invitation_claimed(&self.settings.mail, &invitation));
        Ok((invitation, delivery))
    }

    fn save(&self, table: Table) -> Result<(), LeagueError> {
        let rows = match table {
            Table::Rankings => store::rankings_to_rows(&self.league.rankings),
            Table::MatchHistory => store::history_to_rows(&self.league.history),
            Table::Invitations => store::invitations_to_rows(&self.league.invitations),
        };
        self.store.save_table(table, &rows).map_err(|e| {
            log::error!("Saving {} failed, working copy is ahead of storage: {}", table, e);
            LeagueError::Persistence(e)
        })
    }

    fn notify(&self, message: EmailMessage) -> Delivery {
        if message.bcc.is_empty() {
            log::debug!("No recipients configured, not sending \"{}\"", message.subject);
            return Delivery::Skipped;
        }
        match self.notifier.send(&message) {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                log::warn!("{} (\"{}\")", e, message.subject);
                Delivery::Failed(e.to_string())
            }
        }
    }
}

/// Read the three tables. An empty Rankings table is seeded with `roster` and written
/// back; an empty Match History or Invitations table gets its header row.
fn load_league(backend: &dyn TableStore, roster: &[String]) -> Result<League, StoreError> {
    let ranking_rows = backend.load_table(Table::Rankings)?;
    let history_rows = backend.load_table(Table::MatchHistory)?;
    let invitation_rows = backend.load_table(Table::Invitations)?;

    let mut league = League {
        rankings: store::rankings_from_rows(&ranking_rows)?,
        history: store::history_from_rows(&history_rows)?,
        invitations: store::invitations_from_rows(&invitation_rows)?,
    };

    if logic::seed_rankings(&mut league, roster) {
        log::info!("Rankings empty, seeding {} player(s)", league.rankings.len());
        backend.save_table(Table::Rankings, &store::rankings_to_rows(&league.rankings))?;
    }
    if history_rows.is_empty() {
        backend.save_table(Table::MatchHistory, &store::history_to_rows(&[]))?;
    }
    if invitation_rows.is_empty() {
        backend.save_table(Table::Invitations, &store::invitations_to_rows(&[]))?;
    }
    log::debug!(
        "Loaded {} player(s), {} match(es), {} invitation(s)",
        league.rankings.len(),
        league.history.len(),
        league.invitations.len()
    );
    Ok(league)
}
