//! SQLite-backed sheet store.
//!
//! `sheets(name, header)` holds one row per sheet, `sheet_rows(id, sheet,
//! cells)` one row per data row. Cells are a JSON array of strings.

use super::migrate::run_pending_migrations;
use super::pool::DbPool;
use super::{AuditEntry, RowId, SheetRow, SheetStore, log};
use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open (or create) the database file and bring the schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        Self::init(DbPool::new(path)?)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::init(DbPool::in_memory()?)
    }

    fn init(pool: DbPool) -> AppResult<Self> {
        pool.with_conn(|conn| run_pending_migrations(conn))
            .map_err(|e| AppError::Migration(e.to_string()))?;
        Ok(Self { pool })
    }
}

fn encode(cells: &[String]) -> AppResult<String> {
    Ok(serde_json::to_string(cells)?)
}

fn decode(raw: &str) -> AppResult<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

fn exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM sheets WHERE name = ?1", [name], |r| r.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn require_sheet(conn: &Connection, name: &str) -> AppResult<()> {
    if exists(conn, name)? {
        Ok(())
    } else {
        Err(AppError::SheetNotFound(name.to_string()))
    }
}

impl SheetStore for SqliteStore {
    fn sheet_names(&self) -> AppResult<Vec<String>> {
        self.pool.with_conn(|conn| {
            let mut stmt = conn.prepare_cached("SELECT name FROM sheets ORDER BY rowid ASC")?;
            let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    fn sheet_exists(&self, name: &str) -> AppResult<bool> {
        self.pool.with_conn(|conn| exists(conn, name))
    }

    fn get_or_create_sheet(&self, name: &str, header: &[&str]) -> AppResult<bool> {
        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        let header = encode(&header)?;

        self.pool.with_conn(|conn| {
            // A single INSERT OR IGNORE: concurrent first writers converge on one sheet.
            let created = conn.execute(
                "INSERT OR IGNORE INTO sheets (name, header, created_at) VALUES (?1, ?2, ?3)",
                params![name, header, Local::now().to_rfc3339()],
            )?;
            Ok(created == 1)
        })
    }

    fn header(&self, name: &str) -> AppResult<Option<Vec<String>>> {
        self.pool.with_conn(|conn| {
            let raw: Option<String> = conn
                .query_row("SELECT header FROM sheets WHERE name = ?1", [name], |r| {
                    r.get(0)
                })
                .optional()?;
            raw.as_deref().map(decode).transpose()
        })
    }

    fn append_row(&self, name: &str, cells: &[String]) -> AppResult<RowId> {
        let encoded = encode(cells)?;

        self.pool.with_conn(|conn| {
            require_sheet(conn, name)?;
            conn.execute(
                "INSERT INTO sheet_rows (sheet, cells, created_at) VALUES (?1, ?2, ?3)",
                params![name, encoded, Local::now().to_rfc3339()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn read_rows(&self, name: &str) -> AppResult<Vec<SheetRow>> {
        self.pool.with_conn(|conn| {
            require_sheet(conn, name)?;

            let mut stmt = conn
                .prepare_cached("SELECT id, cells FROM sheet_rows WHERE sheet = ?1 ORDER BY id ASC")?;
            let rows = stmt.query_map([name], |r| {
                Ok((r.get::<_, RowId>(0)?, r.get::<_, String>(1)?))
            })?;

            let mut out = Vec::new();
            for r in rows {
                let (id, raw) = r?;
                out.push(SheetRow {
                    id,
                    cells: decode(&raw)?,
                });
            }
            Ok(out)
        })
    }

    fn update_cell(&self, name: &str, row: RowId, column: usize, value: &str) -> AppResult<bool> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;

            let raw: Option<String> = tx
                .query_row(
                    "SELECT cells FROM sheet_rows WHERE sheet = ?1 AND id = ?2",
                    params![name, row],
                    |r| r.get(0),
                )
                .optional()?;

            let Some(raw) = raw else {
                return Ok(false);
            };

            let mut cells = decode(&raw)?;
            if cells.len() <= column {
                cells.resize(column + 1, String::new());
            }
            cells[column] = value.to_string();

            tx.execute(
                "UPDATE sheet_rows SET cells = ?1 WHERE id = ?2",
                params![encode(&cells)?, row],
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    fn delete_rows(&self, name: &str, rows: &[RowId]) -> AppResult<usize> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut removed = 0;
            {
                let mut stmt =
                    tx.prepare_cached("DELETE FROM sheet_rows WHERE sheet = ?1 AND id = ?2")?;
                for id in rows {
                    removed += stmt.execute(params![name, id])?;
                }
            }
            tx.commit()?;
            Ok(removed)
        })
    }

    fn clear_sheet(&self, name: &str) -> AppResult<usize> {
        self.pool.with_conn(|conn| {
            require_sheet(conn, name)?;
            Ok(conn.execute("DELETE FROM sheet_rows WHERE sheet = ?1", [name])?)
        })
    }

    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.pool
            .with_conn(|conn| log::ttlog(conn, operation, target, message))
    }

    fn audit_log(&self) -> AppResult<Vec<AuditEntry>> {
        self.pool.with_conn(|conn| log::load_log(conn))
    }
}
