//! File-backed table store: one CSV file per table in a data directory.

use super::{Row, StoreError, Table, TableStore};
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvTableStore {
    dir: PathBuf,
}

impl CsvTableStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }
}

impl TableStore for CsvTableStore {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        let path = self.path(table);
        if !path.exists() {
            log::debug!("{} not found, treating {} as empty", path.display(), table);
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        log::debug!("Loaded {} row(s) from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Writes a sibling temp file, then renames it over the table. A failed write
    /// leaves the previous content in place.
    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(table);
        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&tmp)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        log::debug!("Saved {} row(s) to {}", rows.len(), path.display());
        Ok(())
    }
}
