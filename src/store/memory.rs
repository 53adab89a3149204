//! In-memory table store for tests and throwaway runs.

use super::{Row, StoreError, Table, TableStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Clones share the same tables, so a test can keep a handle after moving one into a service.
#[derive(Clone, Default)]
pub struct MemoryTableStore {
    tables: Arc<Mutex<HashMap<Table, Vec<Row>>>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw rows of `table` (header included), for inspection.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.get(&table).cloned().unwrap_or_default()
    }
}

impl TableStore for MemoryTableStore {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        Ok(self.rows(table))
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.insert(table, rows.to_vec());
        Ok(())
    }
}
