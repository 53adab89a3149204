//! Persistence gateway: three named tables with read-all / overwrite-all semantics.
//!
//! Rows are plain strings; the first row of a non-empty table holds the column headers.
//! There is no append and no cross-table transaction: appending is read-modify-overwrite.

mod csv_store;
mod memory;
mod rows;

pub use csv_store::CsvTableStore;
pub use memory::MemoryTableStore;
pub use rows::{
    history_from_rows, history_to_rows, invitations_from_rows, invitations_to_rows,
    rankings_from_rows, rankings_to_rows, HISTORY_HEADERS, INVITATION_HEADERS, RANKING_HEADERS,
};

/// One table row (header or data).
pub type Row = Vec<String>;

/// The three tables of the league.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Table {
    Rankings,
    MatchHistory,
    Invitations,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Rankings, Table::MatchHistory, Table::Invitations];

    /// Display name, as the sheet was titled.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Rankings => "Rankings",
            Table::MatchHistory => "Match History",
            Table::Invitations => "Invitations",
        }
    }

    /// File name used by file-backed stores.
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Rankings => "rankings.csv",
            Table::MatchHistory => "match_history.csv",
            Table::Invitations => "invitations.csv",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors talking to the storage backend or decoding its rows.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// `line` is 1-based and counts the header row.
    MalformedRow {
        table: Table,
        line: usize,
        reason: String,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Csv(e) => write!(f, "CSV error: {}", e),
            StoreError::MalformedRow { table, line, reason } => {
                write!(f, "{} line {}: {}", table, line, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Csv(e) => Some(e),
            StoreError::MalformedRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

/// Storage backend for the league tables.
pub trait TableStore: Send + Sync {
    /// All rows of `table`, header first. Empty if the table does not exist yet.
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError>;

    /// Replace the whole content of `table` with `rows`.
    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError>;
}
