//! Credential store adapter: the `users_login` sheet as an account map.

use super::cache::TtlCache;
use super::password::SecretHasher;
use crate::errors::{AppError, AppResult};
use crate::models::user::{
    Role, USER_HEADER, UserMap, UserRecord, enabled_from_db_str,
};
use crate::store::{SheetRow, SheetStore, Table};
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// Column positions resolved from the sheet header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UserColumns {
    pub account: usize,
    pub credential: usize,
    pub role: usize,
    pub enabled: usize,
}

impl UserColumns {
    pub(crate) fn resolve(table: &Table) -> AppResult<Self> {
        let find = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| AppError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            account: find(USER_HEADER[0])?,
            credential: find(USER_HEADER[1])?,
            role: find(USER_HEADER[2])?,
            enabled: find(USER_HEADER[3])?,
        })
    }
}

pub struct Credentials {
    pub(crate) store: Arc<dyn SheetStore>,
    pub(crate) sheet: String,
    pub(crate) hasher: SecretHasher,
    cache: TtlCache<Arc<UserMap>>,
}

impl Credentials {
    pub fn new(
        store: Arc<dyn SheetStore>,
        sheet: &str,
        cache_ttl: Duration,
        hasher: SecretHasher,
    ) -> AppResult<Self> {
        store.get_or_create_sheet(sheet, &USER_HEADER)?;
        Ok(Self {
            store,
            sheet: sheet.to_string(),
            hasher,
            cache: TtlCache::new(cache_ttl),
        })
    }

    /// account → {credential, role, enabled}, served from the cache when fresh.
    pub fn load_users(&self) -> AppResult<Arc<UserMap>> {
        self.cache
            .get_or_try_load(|| self.read_users().map(|(_, users)| Arc::new(users)))
    }

    /// Drop the cached map so the next read goes to the store.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub(crate) fn read_table(&self) -> AppResult<Table> {
        self.store
            .read_table(&self.sheet)?
            .ok_or_else(|| AppError::SheetNotFound(self.sheet.clone()))
    }

    /// Uncached read. The first row for an account wins.
    pub(crate) fn read_users(&self) -> AppResult<(Table, UserMap)> {
        let table = self.read_table()?;
        let cols = UserColumns::resolve(&table)?;

        let mut users = UserMap::new();
        for row in &table.rows {
            let account = row.cell(cols.account).trim();
            if account.is_empty() {
                warn!("Skipping credential row {} with an empty account", row.id);
                continue;
            }
            users
                .entry(account.to_string())
                .or_insert_with(|| to_record(row, &cols));
        }

        Ok((table, users))
    }
}

fn to_record(row: &SheetRow, cols: &UserColumns) -> UserRecord {
    UserRecord {
        credential: row.cell(cols.credential).to_string(),
        role: Role::from_db_str(row.cell(cols.role)),
        enabled: enabled_from_db_str(row.cell(cols.enabled)),
    }
}
