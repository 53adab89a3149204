//! Conversion between league records and header-keyed table rows.
//!
//! Columns are looked up by header name, so column order in storage does not matter
//! and history rows written before set scores existed still load (as 0-0 sets).

use super::{Row, StoreError, Table};
use crate::models::{
    timestamp, Invitation, InvitationStatus, MatchRecord, PlayerRanking, SetScore, MAX_SETS,
};
use chrono::NaiveDate;
use std::collections::HashMap;

pub const RANKING_HEADERS: [&str; 5] = ["Player", "Points", "Matches Played", "Wins", "Losses"];

pub const HISTORY_HEADERS: [&str; 14] = [
    "Date",
    "Winner",
    "Loser",
    "Points Exchanged",
    "W_Set1",
    "W_Set2",
    "W_Set3",
    "W_Set4",
    "W_Set5",
    "L_Set1",
    "L_Set2",
    "L_Set3",
    "L_Set4",
    "L_Set5",
];

pub const INVITATION_HEADERS: [&str; 8] = [
    "ID",
    "Created By",
    "Created At",
    "Match Date",
    "Match Time",
    "Location",
    "Status",
    "Claimed By",
];

const MATCH_DATE_FORMAT: &str = "%Y-%m-%d";

fn header_row(headers: &[&str]) -> Row {
    headers.iter().map(|h| h.to_string()).collect()
}

/// Column lookup for one table, built from its header row.
struct Columns {
    table: Table,
    index: HashMap<String, usize>,
}

impl Columns {
    fn new(table: Table, header: &Row) -> Self {
        let index = header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        Self { table, index }
    }

    fn malformed(&self, line: usize, reason: impl Into<String>) -> StoreError {
        StoreError::MalformedRow {
            table: self.table,
            line,
            reason: reason.into(),
        }
    }

    /// Cell value, or "" when the column or cell is missing.
    fn cell<'a>(&self, row: &'a Row, name: &str) -> &'a str {
        self.index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn required<'a>(&self, row: &'a Row, line: usize, name: &str) -> Result<&'a str, StoreError> {
        match self.cell(row, name) {
            "" => Err(self.malformed(line, format!("missing {}", name))),
            value => Ok(value),
        }
    }

    fn float(&self, row: &Row, line: usize, name: &str) -> Result<f64, StoreError> {
        let raw = self.required(row, line, name)?;
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| self.malformed(line, format!("{} is not a non-negative number: {:?}", name, raw)))
    }

    /// Non-negative integer; spreadsheets sometimes hand back "3.0".
    fn count(&self, row: &Row, line: usize, name: &str) -> Result<u32, StoreError> {
        let raw = self.required(row, line, name)?;
        parse_count(raw)
            .ok_or_else(|| self.malformed(line, format!("{} is not a count: {:?}", name, raw)))
    }

    /// Games in a set; blank or missing means an unplayed set.
    fn games(&self, row: &Row, line: usize, name: &str) -> Result<u8, StoreError> {
        match self.cell(row, name) {
            "" => Ok(0),
            raw => parse_count(raw)
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| self.malformed(line, format!("{} is not a game count: {:?}", name, raw))),
        }
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

/// Data rows with their 1-based line numbers. None when the table has no data.
fn data_rows(table: Table, rows: &[Row]) -> Option<(Columns, impl Iterator<Item = (usize, &Row)>)> {
    let (header, data) = rows.split_first()?;
    let columns = Columns::new(table, header);
    let data = data
        .iter()
        .enumerate()
        .map(|(i, row)| (i + 2, row))
        .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()));
    Some((columns, data))
}

pub fn rankings_to_rows(rankings: &[PlayerRanking]) -> Vec<Row> {
    let mut rows = vec![header_row(&RANKING_HEADERS)];
    rows.extend(rankings.iter().map(|p| {
        vec![
            p.name.clone(),
            p.points.to_string(),
            p.matches_played.to_string(),
            p.wins.to_string(),
            p.losses.to_string(),
        ]
    }));
    rows
}

pub fn rankings_from_rows(rows: &[Row]) -> Result<Vec<PlayerRanking>, StoreError> {
    let Some((cols, data)) = data_rows(Table::Rankings, rows) else {
        return Ok(Vec::new());
    };
    let mut rankings: Vec<PlayerRanking> = Vec::new();
    for (line, row) in data {
        let player = PlayerRanking {
            name: cols.required(row, line, "Player")?.to_string(),
            points: cols.float(row, line, "Points")?,
            matches_played: cols.count(row, line, "Matches Played")?,
            wins: cols.count(row, line, "Wins")?,
            losses: cols.count(row, line, "Losses")?,
        };
        if rankings.iter().any(|p| p.name == player.name) {
            return Err(cols.malformed(line, format!("Player {:?} appears more than once", player.name)));
        }
        if player.wins.checked_add(player.losses) != Some(player.matches_played) {
            return Err(cols.malformed(
                line,
                format!(
                    "Matches Played ({}) is not Wins ({}) + Losses ({})",
                    player.matches_played, player.wins, player.losses
                ),
            ));
        }
        rankings.push(player);
    }
    Ok(rankings)
}

pub fn history_to_rows(history: &[MatchRecord]) -> Vec<Row> {
    let mut rows = vec![header_row(&HISTORY_HEADERS)];
    rows.extend(history.iter().map(|m| {
        let mut row = vec![
            timestamp::format(&m.date),
            m.winner.clone(),
            m.loser.clone(),
            m.points_exchanged.to_string(),
        ];
        row.extend(m.sets.iter().map(|s| s.winner_games.to_string()));
        row.extend(m.sets.iter().map(|s| s.loser_games.to_string()));
        row
    }));
    rows
}

pub fn history_from_rows(rows: &[Row]) -> Result<Vec<MatchRecord>, StoreError> {
    let Some((cols, data)) = data_rows(Table::MatchHistory, rows) else {
        return Ok(Vec::new());
    };
    let mut history = Vec::new();
    for (line, row) in data {
        let raw_date = cols.required(row, line, "Date")?;
        let date = timestamp::parse(raw_date)
            .map_err(|e| cols.malformed(line, format!("bad Date {:?}: {}", raw_date, e)))?;
        let mut sets = [SetScore::default(); MAX_SETS];
        for (i, set) in sets.iter_mut().enumerate() {
            set.winner_games = cols.games(row, line, &format!("W_Set{}", i + 1))?;
            set.loser_games = cols.games(row, line, &format!("L_Set{}", i + 1))?;
        }
        history.push(MatchRecord {
            date,
            winner: cols.required(row, line, "Winner")?.to_string(),
            loser: cols.required(row, line, "Loser")?.to_string(),
            points_exchanged: cols.float(row, line, "Points Exchanged")?,
            sets,
        });
    }
    Ok(history)
}

pub fn invitations_to_rows(invitations: &[Invitation]) -> Vec<Row> {
    let mut rows = vec![header_row(&INVITATION_HEADERS)];
    rows.extend(invitations.iter().map(|i| {
        vec![
            i.id.to_string(),
            i.created_by.clone(),
            timestamp::format(&i.created_at),
            i.match_date.format(MATCH_DATE_FORMAT).to_string(),
            i.match_time.clone(),
            i.location.clone(),
            i.status.as_str().to_string(),
            i.claimed_by.clone().unwrap_or_default(),
        ]
    }));
    rows
}

pub fn invitations_from_rows(rows: &[Row]) -> Result<Vec<Invitation>, StoreError> {
    let Some((cols, data)) = data_rows(Table::Invitations, rows) else {
        return Ok(Vec::new());
    };
    let mut invitations = Vec::new();
    for (line, row) in data {
        let id = cols.count(row, line, "ID")?;
        if id == 0 {
            return Err(cols.malformed(line, "ID must be positive"));
        }
        let raw_created = cols.required(row, line, "Created At")?;
        let created_at = timestamp::parse(raw_created)
            .map_err(|e| cols.malformed(line, format!("bad Created At {:?}: {}", raw_created, e)))?;
        let raw_date = cols.required(row, line, "Match Date")?;
        let match_date = NaiveDate::parse_from_str(raw_date, MATCH_DATE_FORMAT)
            .map_err(|e| cols.malformed(line, format!("bad Match Date {:?}: {}", raw_date, e)))?;
        let raw_status = cols.required(row, line, "Status")?;
        let status = InvitationStatus::parse(raw_status)
            .ok_or_else(|| cols.malformed(line, format!("unknown Status {:?}", raw_status)))?;
        let claimed_by = match cols.cell(row, "Claimed By") {
            "" => None,
            name => Some(name.to_string()),
        };
        invitations.push(Invitation {
            id,
            created_by: cols.required(row, line, "Created By")?.to_string(),
            created_at,
            match_date,
            match_time: cols.cell(row, "Match Time").to_string(),
            location: cols.cell(row, "Location").to_string(),
            status,
            claimed_by,
        });
    }
    Ok(invitations)
}
