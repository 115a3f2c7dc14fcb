//! Tabular "sheet" datastore.
//!
//! A store holds named sheets. Each sheet has a header (column names) and an
//! ordered list of data rows; every row has a stable id so it can be updated
//! or deleted on its own.

pub mod log;
pub mod migrate;
pub mod pool;
pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::errors::AppResult;
use serde::Serialize;

pub type RowId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub id: RowId,
    pub cells: Vec<String>,
}

impl SheetRow {
    /// Cell at `column`, or "" when the row is shorter than the header.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Header plus data rows of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// First of `names` present in the header.
    pub fn first_column(&self, names: &[&str]) -> Option<(usize, String)> {
        names
            .iter()
            .find_map(|n| self.column(n).map(|idx| (idx, n.to_string())))
    }
}

/// One line of the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub trait SheetStore: Send + Sync {
    /// Names of every sheet, in creation order.
    fn sheet_names(&self) -> AppResult<Vec<String>>;

    fn sheet_exists(&self, name: &str) -> AppResult<bool>;

    /// Create the sheet with `header` unless it already exists.
    /// Returns `true` when this call created it.
    fn get_or_create_sheet(&self, name: &str, header: &[&str]) -> AppResult<bool>;

    /// `None` when the sheet does not exist.
    fn header(&self, name: &str) -> AppResult<Option<Vec<String>>>;

    fn append_row(&self, name: &str, cells: &[String]) -> AppResult<RowId>;

    /// Data rows in insertion order.
    fn read_rows(&self, name: &str) -> AppResult<Vec<SheetRow>>;

    /// Returns `false` when the row does not exist.
    fn update_cell(&self, name: &str, row: RowId, column: usize, value: &str) -> AppResult<bool>;

    /// Delete the given rows atomically. Returns how many were removed.
    fn delete_rows(&self, name: &str, rows: &[RowId]) -> AppResult<usize>;

    /// Remove every data row, keeping the sheet and its header.
    fn clear_sheet(&self, name: &str) -> AppResult<usize>;

    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()>;

    fn audit_log(&self) -> AppResult<Vec<AuditEntry>>;

    /// Header and rows together, `None` when the sheet does not exist.
    fn read_table(&self, name: &str) -> AppResult<Option<Table>> {
        let Some(header) = self.header(name)? else {
            return Ok(None);
        };
        let rows = self.read_rows(name)?;
        Ok(Some(Table { header, rows }))
    }
}
