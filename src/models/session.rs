//! Per-login session state.
//!
//! A `SessionContext` is an immutable value: every transition returns a new
//! one and leaves the original untouched, so a failed action can never leave
//! a half-updated session behind.

use super::language::Language;
use super::user::Role;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Top-level admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminMenu {
    ViewRecords,
    ManageAccounts,
}

impl AdminMenu {
    pub fn from_key(key: &str) -> AppResult<Self> {
        match key {
            "view_records" => Ok(AdminMenu::ViewRecords),
            "manage_accounts" => Ok(AdminMenu::ManageAccounts),
            other => Err(AppError::InvalidMenu(other.to_string())),
        }
    }
}

/// Sub-tab of the accounts menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountTab {
    #[default]
    Add,
    View,
    Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub logged_in: bool,
    pub identity: String,
    pub role: Option<Role>,
    pub language: Language,
    pub menu: Option<AdminMenu>,
    pub account_tab: AccountTab,
}

impl SessionContext {
    /// A fresh, logged-out session.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// LOGGED_OUT → LOGGED_IN(role). Keeps the chosen language.
    pub fn logged_in(&self, identity: &str, role: Role) -> Self {
        Self {
            logged_in: true,
            identity: identity.to_string(),
            role: Some(role),
            language: self.language,
            menu: role.is_admin().then_some(AdminMenu::ViewRecords),
            account_tab: AccountTab::default(),
        }
    }

    /// LOGGED_IN → LOGGED_OUT. Everything is dropped, including the language.
    pub fn logged_out(default_language: Language) -> Self {
        Self::new(default_language)
    }

    pub fn with_language(&self, language: Language) -> Self {
        Self {
            language,
            ..self.clone()
        }
    }

    /// Select an admin menu (and optionally the accounts sub-tab).
    pub fn with_menu(&self, menu: AdminMenu, tab: Option<AccountTab>) -> AppResult<Self> {
        self.require_admin()?;
        Ok(Self {
            menu: Some(menu),
            account_tab: tab.unwrap_or(self.account_tab),
            ..self.clone()
        })
    }

    pub fn is_admin(&self) -> bool {
        self.logged_in && self.role.is_some_and(|r| r.is_admin())
    }

    /// Identity of the logged-in user, or `NotLoggedIn`.
    pub fn require_login(&self) -> AppResult<&str> {
        if self.logged_in && !self.identity.is_empty() {
            Ok(&self.identity)
        } else {
            Err(AppError::NotLoggedIn)
        }
    }

    pub fn require_admin(&self) -> AppResult<&str> {
        let identity = self.require_login()?;
        if self.is_admin() {
            Ok(identity)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_keeps_language_and_sets_admin_menu() {
        let s = SessionContext::new(Language::En);
        let admin = s.logged_in("root", Role::Admin);
        assert!(admin.is_admin());
        assert_eq!(admin.language, Language::En);
        assert_eq!(admin.menu, Some(AdminMenu::ViewRecords));

        let user = s.logged_in("alice", Role::User);
        assert!(!user.is_admin());
        assert_eq!(user.menu, None);
        assert!(!s.logged_in);
    }

    #[test]
    fn menu_is_admin_only() {
        let user = SessionContext::new(Language::ZhTw).logged_in("alice", Role::User);
        assert!(matches!(
            user.with_menu(AdminMenu::ManageAccounts, None),
            Err(AppError::Forbidden)
        ));

        let admin = SessionContext::new(Language::ZhTw).logged_in("root", Role::Admin);
        let next = admin
            .with_menu(AdminMenu::ManageAccounts, Some(AccountTab::Status))
            .unwrap();
        assert_eq!(next.menu, Some(AdminMenu::ManageAccounts));
        assert_eq!(next.account_tab, AccountTab::Status);

        // menu persists across unrelated transitions
        let switched = next.with_language(Language::En);
        assert_eq!(switched.menu, Some(AdminMenu::ManageAccounts));
    }

    #[test]
    fn logged_out_session_is_rejected() {
        let s = SessionContext::new(Language::ZhTw);
        assert!(matches!(s.require_login(), Err(AppError::NotLoggedIn)));
    }
}
