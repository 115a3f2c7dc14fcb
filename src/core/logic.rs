use super::accounts::NewUser;
use super::credentials::Credentials;
use super::history::{HistoryView, render_history};
use super::ledger::Ledger;
use super::password::SecretHasher;
use super::auth;
use crate::config::Config;
use crate::errors::{AppError, AppResult, AuthError};
use crate::export::{XlsxExport, export_history};
use crate::models::event::CheckinReceipt;
use crate::models::language::Language;
use crate::models::session::SessionContext;
use crate::models::user::{Role, UserSummary};
use crate::store::{SheetStore, SqliteStore};
use crate::utils::date;
use chrono::{DateTime, FixedOffset, TimeDelta};
use log::info;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Identity used by the command line, which acts with admin rights.
pub const OPERATOR: &str = "operator";

/// Months with a partition plus the one the picker starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthList {
    pub months: Vec<String>,
    pub default: Option<String>,
}

/// Every user-facing operation, with its session checks.
///
/// All methods are synchronous; the web layer runs them on the blocking pool.
pub struct Core {
    store: Arc<dyn SheetStore>,
    credentials: Credentials,
    ledger: Ledger,
    utc_offset_hours: i32,
    history_limit: usize,
    session_ttl_hours: i64,
    default_language: Language,
}

impl Core {
    pub fn new(store: Arc<dyn SheetStore>, cfg: &Config) -> AppResult<Self> {
        let ttl = Duration::from_secs(cfg.cache_ttl_secs);
        let hasher = SecretHasher::new(cfg.password_log_n)?;

        Ok(Self {
            credentials: Credentials::new(store.clone(), &cfg.users_sheet, ttl, hasher)?,
            ledger: Ledger::new(store.clone(), ttl),
            store,
            utc_offset_hours: cfg.utc_offset_hours,
            history_limit: cfg.history_limit,
            session_ttl_hours: cfg.session_ttl_hours,
            default_language: cfg.default_language,
        })
    }

    /// Open the configured SQLite database.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let path = cfg.database_path();
        let store = SqliteStore::open(&path.to_string_lossy())?;
        Self::new(Arc::new(store), cfg)
    }

    pub fn store(&self) -> &dyn SheetStore {
        self.store.as_ref()
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Lifetime of a web login, between one hour and one year.
    pub fn session_ttl(&self) -> TimeDelta {
        TimeDelta::hours(self.session_ttl_hours.clamp(1, 24 * 366))
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        date::now_in(self.utc_offset_hours)
    }

    pub fn new_session(&self) -> SessionContext {
        SessionContext::new(self.default_language)
    }

    /// Admin session the command line runs under.
    pub fn operator_session(&self, language: Language) -> SessionContext {
        SessionContext::new(language).logged_in(OPERATOR, Role::Admin)
    }

    // ---------------------------
    // Auth
    // ---------------------------
    pub fn login(
        &self,
        session: &SessionContext,
        account: &str,
        secret: &str,
    ) -> AppResult<SessionContext> {
        auth::login(&self.credentials, session, account, secret)
    }

    pub fn logout(&self, session: &SessionContext) -> SessionContext {
        auth::logout(session, self.default_language)
    }

    /// Whether `account` still exists and is enabled in the credential sheet.
    pub fn account_active(&self, account: &str) -> AppResult<bool> {
        let users = self.credentials.load_users()?;
        Ok(users.get(account).is_some_and(|r| r.enabled))
    }

    // ---------------------------
    // Ledger
    // ---------------------------
    pub fn check_in(&self, session: &SessionContext) -> AppResult<CheckinReceipt> {
        self.ledger.check_in(session, &self.now())
    }

    /// Check-in on behalf of `account`, which must exist and be enabled.
    pub fn check_in_as(&self, account: &str) -> AppResult<CheckinReceipt> {
        let users = self.credentials.load_users()?;
        let record = users
            .get(account.trim())
            .ok_or(AuthError::UnknownAccount)?;
        if !record.enabled {
            return Err(AuthError::Disabled.into());
        }

        let session = self.new_session().logged_in(account.trim(), record.role);
        self.check_in(&session)
    }

    pub fn months(&self, session: &SessionContext) -> AppResult<MonthList> {
        session.require_login()?;
        let months = self.ledger.list_partitions()?;
        let current = date::month_label(&self.now());

        Ok(MonthList {
            default: date::default_month(&months, &current),
            months: months.as_ref().clone(),
        })
    }

    pub fn history(
        &self,
        session: &SessionContext,
        month: &str,
        user: Option<&str>,
    ) -> AppResult<HistoryView> {
        let month =
            date::normalize_month(month).ok_or_else(|| AppError::InvalidMonth(month.to_string()))?;
        render_history(&self.ledger, session, &month, user, self.history_limit)
    }

    /// Spreadsheet of the rows `history` would display, in the session language.
    pub fn export(
        &self,
        session: &SessionContext,
        month: &str,
        user: Option<&str>,
    ) -> AppResult<XlsxExport> {
        session.require_admin()?;
        let view = self.history(session, month, user)?;
        export_history(&view, session.language)
    }

    // ---------------------------
    // Accounts (admin only)
    // ---------------------------
    pub fn add_user(&self, session: &SessionContext, new_user: &NewUser) -> AppResult<()> {
        session.require_admin()?;
        self.credentials.add_user(new_user)
    }

    pub fn set_enabled(
        &self,
        session: &SessionContext,
        account: &str,
        enabled: bool,
    ) -> AppResult<bool> {
        session.require_admin()?;
        self.credentials.set_enabled(account, enabled)
    }

    pub fn delete_user(&self, session: &SessionContext, account: &str) -> AppResult<usize> {
        session.require_admin()?;
        self.credentials.delete_user(account)
    }

    pub fn list_users(&self, session: &SessionContext) -> AppResult<Vec<UserSummary>> {
        session.require_admin()?;
        self.credentials.list_users()
    }

    /// Create the first admin when the credential sheet has no such account.
    /// Returns `false` when it already existed.
    pub fn bootstrap_admin(&self, account: &str, secret: &str) -> AppResult<bool> {
        match self.credentials.add_user(&NewUser {
            account: account.to_string(),
            secret: secret.to_string(),
            role: Role::Admin,
            enabled: true,
        }) {
            Ok(()) => {
                info!("Bootstrap admin created: {}", account.trim());
                Ok(true)
            }
            Err(AppError::DuplicateAccount(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
