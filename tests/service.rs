//! Integration tests for LeagueService: seeding, persistence after each action, notifications.

mod common;

use common::{assert_close, at, match_day, FailingNotifier, RecordingNotifier};
use tennis_ladder::store::{HISTORY_HEADERS, INVITATION_HEADERS, RANKING_HEADERS};
use tennis_ladder::{
    CsvTableStore, Delivery, LeagueError, LeagueService, LeagueSettings, LogNotifier, MailSettings,
    MemoryTableStore, NewInvitation, Notifier, Row, SetScore, StoreError, Table, TableStore,
};

fn settings() -> LeagueSettings {
    LeagueSettings {
        roster: vec!["Poch".to_string(), "Bozzo".to_string(), "Hederra".to_string()],
        mail: MailSettings {
            sender: "league@example.com".to_string(),
            recipients: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            app_url: None,
        },
        ..LeagueSettings::default()
    }
}

fn open(store: impl TableStore + 'static, notifier: impl Notifier + 'static) -> LeagueService {
    LeagueService::open(Box::new(store), Box::new(notifier), settings())
        .unwrap()
        .with_clock(|| at(12))
}

fn invitation(created_by: &str) -> NewInvitation {
    NewInvitation {
        created_by: created_by.to_string(),
        match_date: match_day(),
        match_time: "19:30".to_string(),
        location: "Club".to_string(),
    }
}

/// Store that reads fine but rejects every write once `broken` is set.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: MemoryTableStore,
    broken: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl FlakyStore {
    fn break_writes(&self) {
        self.broken.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

impl TableStore for FlakyStore {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        self.inner.load_table(table)
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        if self.broken.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "sheet is read-only",
            )));
        }
        self.inner.save_table(table, rows)
    }
}

#[test]
fn empty_storage_is_seeded_with_roster_and_headers() {
    let store = MemoryTableStore::new();
    let service = open(store.clone(), LogNotifier);

    assert_eq!(service.players(), vec!["Poch", "Bozzo", "Hederra"]);
    let rankings = store.rows(Table::Rankings);
    assert_eq!(rankings[0], RANKING_HEADERS.map(String::from).to_vec());
    assert_eq!(rankings[1], vec!["Poch", "1000", "0", "0", "0"]);
    assert_eq!(store.rows(Table::MatchHistory), vec![HISTORY_HEADERS.map(String::from).to_vec()]);
    assert_eq!(store.rows(Table::Invitations), vec![INVITATION_HEADERS.map(String::from).to_vec()]);
}

#[test]
fn existing_standings_are_not_reseeded() {
    let store = MemoryTableStore::new();
    let mut service = open(store.clone(), LogNotifier);
    service.record_match("Bozzo", "Poch", &[]).unwrap();

    let reopened = open(store, LogNotifier);
    assert_eq!(reopened.league(), service.league());
    assert_eq!(reopened.standings()[0].player.name, "Bozzo");
}

#[test]
fn recorded_match_is_written_to_both_tables() {
    let store = MemoryTableStore::new();
    let mut service = open(store.clone(), LogNotifier);
    let sets = [SetScore::new(6, 3), SetScore::new(6, 4)];
    service.record_match("Hederra", "Bozzo", &sets).unwrap();

    let rankings = store.rows(Table::Rankings);
    assert_eq!(rankings[1], vec!["Hederra", "1100", "1", "1", "0"]);
    let history = store.rows(Table::MatchHistory);
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[1],
        vec![
            "2024-03-01 12:00:00", "Hederra", "Bozzo", "100", "6", "6", "0", "0", "0", "3", "4", "0",
            "0", "0",
        ]
    );
    let entries = service.history();
    assert_eq!(entries[0].score, "6-3 6-4");
}

#[test]
fn invalid_match_writes_nothing() {
    let store = MemoryTableStore::new();
    let mut service = open(store.clone(), LogNotifier);
    let before = store.rows(Table::Rankings);
    assert!(matches!(
        service.record_match("Poch", "Poch", &[]),
        Err(LeagueError::InvalidMatchInput(_))
    ));
    assert_eq!(store.rows(Table::Rankings), before);
    assert_eq!(store.rows(Table::MatchHistory).len(), 1);
}

#[test]
fn viewing_standings_changes_nothing() {
    let store = MemoryTableStore::new();
    let mut service = open(store.clone(), LogNotifier);
    service.record_match("Poch", "Bozzo", &[]).unwrap();
    let league = service.league().clone();
    let rows = store.rows(Table::Rankings);

    for _ in 0..3 {
        service.standings();
        service.history();
        service.open_invitations();
    }
    assert_eq!(service.league(), &league);
    assert_eq!(store.rows(Table::Rankings), rows);
}

#[test]
fn created_invitation_is_saved_then_announced() {
    let store = MemoryTableStore::new();
    let notifier = RecordingNotifier::default();
    let mut service = open(store.clone(), notifier.clone());

    let (inv, delivery) = service.create_invitation(invitation("Poch")).unwrap();
    assert_eq!(delivery, Delivery::Sent);
    assert_eq!(inv.id, 1);

    let rows = store.rows(Table::Invitations);
    assert_eq!(
        rows[1],
        vec!["1", "Poch", "2024-03-01 12:00:00", "2024-03-09", "19:30", "Club", "Open", ""]
    );
    let sent = notifier.messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].bcc, vec!["a@example.com", "b@example.com"]);
    assert!(sent[0].body.contains("Poch is looking for a match"));
}

#[test]
fn claim_is_saved_then_confirmed() {
    let store = MemoryTableStore::new();
    let notifier = RecordingNotifier::default();
    let mut service = open(store.clone(), notifier.clone());
    service.create_invitation(invitation("Poch")).unwrap();

    let (inv, delivery) = service.claim_invitation(1, "Bozzo").unwrap();
    assert_eq!(delivery, Delivery::Sent);
    assert_eq!(inv.claimed_by.as_deref(), Some("Bozzo"));
    assert_eq!(store.rows(Table::Invitations)[1][6..], ["Claimed", "Bozzo"]);
    assert!(service.open_invitations().is_empty());

    let sent = notifier.messages();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].body.contains("Poch will play against Bozzo"));
}

#[test]
fn failed_notification_keeps_the_record() {
    let store = MemoryTableStore::new();
    let mut service = open(store.clone(), FailingNotifier);

    let (inv, delivery) = service.create_invitation(invitation("Poch")).unwrap();
    assert!(matches!(delivery, Delivery::Failed(ref reason) if reason.contains("refused")));
    assert_eq!(store.rows(Table::Invitations).len(), 2);

    let (_, delivery) = service.claim_invitation(inv.id, "Hederra").unwrap();
    assert!(matches!(delivery, Delivery::Failed(_)));
    assert_eq!(store.rows(Table::Invitations)[1][6], "Claimed");
}

#[test]
fn no_recipients_skips_notification() {
    let notifier = RecordingNotifier::default();
    let mut service = LeagueService::open(
        Box::new(MemoryTableStore::new()),
        Box::new(notifier.clone()),
        LeagueSettings::default(),
    )
    .unwrap();
    let (_, delivery) = service.create_invitation(invitation("Poch")).unwrap();
    assert_eq!(delivery, Delivery::Skipped);
    assert!(notifier.messages().is_empty());
}

#[test]
fn persistence_failure_surfaces_and_reload_resyncs() {
    let store = FlakyStore::default();
    let mut service = open(store.clone(), LogNotifier);
    store.break_writes();

    assert!(matches!(
        service.record_match("Poch", "Bozzo", &[]),
        Err(LeagueError::Persistence(_))
    ));
    // The working copy already moved ahead of storage.
    assert_eq!(service.league().history.len(), 1);

    service.reload().unwrap();
    assert!(service.league().history.is_empty());
    assert_close(service.league().player("Poch").unwrap().points, 1000.0);
}

#[test]
fn csv_files_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = RecordingNotifier::default();
    {
        let mut service = open(CsvTableStore::new(dir.path()), notifier.clone());
        service
            .record_match("Bozzo", "Poch", &[SetScore::new(7, 6), SetScore::new(6, 7), SetScore::new(6, 2)])
            .unwrap();
        service.create_invitation(invitation("Hederra")).unwrap();
        service.claim_invitation(1, "Poch").unwrap();
        service.create_invitation(invitation("Bozzo")).unwrap();
    }
    for table in Table::ALL {
        assert!(dir.path().join(table.file_name()).exists(), "{table}");
    }

    let service = open(CsvTableStore::new(dir.path()), notifier);
    let standings = service.standings();
    assert_eq!(standings[0].player.name, "Bozzo");
    assert_close(standings[0].player.points, 1100.0);
    assert_eq!(service.history()[0].score, "7-6 6-7 6-2");
    let open_ids: Vec<u32> = service.open_invitations().iter().map(|i| i.id).collect();
    assert_eq!(open_ids, vec![2]);
}

#[test]
fn repeated_roster_name_is_seeded_once() {
    let store = MemoryTableStore::new();
    let settings = LeagueSettings {
        roster: vec!["Poch".to_string(), "Bozzo".to_string(), "Poch".to_string()],
        ..LeagueSettings::default()
    };
    let mut service = LeagueService::open(Box::new(store.clone()), Box::new(LogNotifier), settings).unwrap();

    assert_eq!(service.players(), vec!["Poch", "Bozzo"]);
    assert_eq!(store.rows(Table::Rankings).len(), 3);
    service.record_match("Bozzo", "Poch", &[]).unwrap();
    assert_eq!(service.standings().len(), 2);
}

#[test]
fn stored_table_with_repeated_player_fails_to_load() {
    let store = MemoryTableStore::new();
    let header: Row = RANKING_HEADERS.map(String::from).to_vec();
    let poch: Row = ["Poch", "1000", "0", "0", "0"].map(String::from).to_vec();
    store
        .save_table(Table::Rankings, &[header, poch.clone(), poch])
        .unwrap();

    let result = LeagueService::open(Box::new(store), Box::new(LogNotifier), settings());
    assert!(matches!(
        result,
        Err(StoreError::MalformedRow { table: Table::Rankings, line: 3, .. })
    ));
}
