//! Admin account manager.

use super::credentials::{Credentials, UserColumns};
use crate::errors::{AppError, AppResult};
use crate::models::user::{Role, UserSummary, enabled_from_db_str, enabled_to_db_str};
use log::info;

/// Input of `add_user`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub account: String,
    pub secret: String,
    pub role: Role,
    pub enabled: bool,
}

impl Credentials {
    /// Append a new account. The secret is stored hashed.
    pub fn add_user(&self, new_user: &NewUser) -> AppResult<()> {
        let account = new_user.account.trim();

        if account.is_empty() {
            return Err(AppError::MissingField("account"));
        }
        if new_user.secret.is_empty() {
            return Err(AppError::MissingField("password"));
        }

        // Fresh read, not the cache: the uniqueness check must see recent writes.
        let (_, users) = self.read_users()?;
        if users.contains_key(account) {
            return Err(AppError::DuplicateAccount(account.to_string()));
        }

        let credential = self.hasher.hash(&new_user.secret)?;
        self.store.append_row(
            &self.sheet,
            &[
                account.to_string(),
                credential,
                new_user.role.to_db_str().to_string(),
                enabled_to_db_str(new_user.enabled).to_string(),
            ],
        )?;
        self.invalidate();

        info!(
            "Account added: {account} ({}, enabled={})",
            new_user.role.to_db_str(),
            new_user.enabled
        );
        self.audit(
            "user_add",
            account,
            &format!("role={} enabled={}", new_user.role.to_db_str(), new_user.enabled),
        );
        Ok(())
    }

    /// Flip the enabled flag of the first row for `account`.
    /// Returns `false`, changing nothing, when the account does not exist.
    pub fn set_enabled(&self, account: &str, enabled: bool) -> AppResult<bool> {
        let account = account.trim();
        let table = self.read_table()?;
        let cols = UserColumns::resolve(&table)?;

        let Some(row) = table
            .rows
            .iter()
            .find(|r| r.cell(cols.account).trim() == account)
        else {
            info!("set_enabled: no account named {account}");
            return Ok(false);
        };

        let updated = self.store.update_cell(
            &self.sheet,
            row.id,
            cols.enabled,
            enabled_to_db_str(enabled),
        )?;
        self.invalidate();

        if updated {
            let op = if enabled { "user_enable" } else { "user_disable" };
            info!("Account {account}: enabled={enabled}");
            self.audit(op, account, &format!("enabled={enabled}"));
        }
        Ok(updated)
    }

    /// Remove every row for `account`. Other rows and the header stay as they are.
    pub fn delete_user(&self, account: &str) -> AppResult<usize> {
        let account = account.trim();
        let table = self.read_table()?;
        let cols = UserColumns::resolve(&table)?;

        let ids: Vec<_> = table
            .rows
            .iter()
            .filter(|r| r.cell(cols.account).trim() == account)
            .map(|r| r.id)
            .collect();

        if ids.is_empty() {
            return Ok(0);
        }

        let removed = self.store.delete_rows(&self.sheet, &ids)?;
        self.invalidate();

        info!("Account deleted: {account} ({removed} row(s))");
        self.audit("user_del", account, &format!("{removed} row(s) removed"));
        Ok(removed)
    }

    /// Every row of the credential sheet, without credentials, in sheet order.
    pub fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let table = self.read_table()?;
        let cols = UserColumns::resolve(&table)?;

        Ok(table
            .rows
            .iter()
            .filter(|r| !r.cell(cols.account).trim().is_empty())
            .map(|r| UserSummary {
                account: r.cell(cols.account).trim().to_string(),
                role: Role::from_db_str(r.cell(cols.role)),
                enabled: enabled_from_db_str(r.cell(cols.enabled)),
            })
            .collect())
    }

    /// Audit lines are best effort: a failure is logged, never returned.
    fn audit(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = self.store.audit(operation, target, message) {
            log::warn!("Failed to write audit log: {e}");
        }
    }
}
