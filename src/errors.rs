//! Unified application error type.
//! All modules (store, core, cli, web) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

/// Why a login attempt was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown account")]
    UnknownAccount,

    #[error("account is disabled")]
    Disabled,

    #[error("wrong password")]
    BadSecret,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Store migration error: {0}")]
    Migration(String),

    #[error("Corrupt row data: {0}")]
    Corrupt(#[from] serde_json::Error),

    // ---------------------------
    // Auth / session
    // ---------------------------
    #[error("Login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Administrator rights required")]
    Forbidden,

    // ---------------------------
    // Validation
    // ---------------------------
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid month label: {0} (expected YYYYMM)")]
    InvalidMonth(String),

    #[error("Invalid language: {0}")]
    InvalidLanguage(String),

    #[error("Invalid menu: {0}")]
    InvalidMenu(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // ---------------------------
    // Lookup / data shape
    // ---------------------------
    #[error("No sheet named {0}")]
    SheetNotFound(String),

    #[error("Sheet is missing the {0} column")]
    MissingColumn(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Io(_) | AppError::Store(_) | AppError::Migration(_) => "remote_error",
            AppError::Corrupt(_) | AppError::MissingColumn(_) => "data_shape_error",
            AppError::Auth(AuthError::Disabled) => "account_disabled",
            AppError::Auth(_) => "auth_error",
            AppError::NotLoggedIn => "not_logged_in",
            AppError::Forbidden => "forbidden",
            AppError::DuplicateAccount(_) => "duplicate_account",
            AppError::MissingField(_) => "missing_field",
            AppError::InvalidMonth(_)
            | AppError::InvalidLanguage(_)
            | AppError::InvalidMenu(_)
            | AppError::InvalidRole(_) => "validation_error",
            AppError::SheetNotFound(_) => "not_found",
            AppError::Config(_) | AppError::ConfigLoad | AppError::ConfigSave => "config_error",
            AppError::Export(_) => "export_error",
            AppError::Other(_) => "internal_error",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
