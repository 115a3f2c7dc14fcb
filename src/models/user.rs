use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header of the credential sheet, in column order.
pub const USER_HEADER: [&str; 4] = ["account", "credential", "role", "enabled"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Convert enum → sheet string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Convert sheet string → enum.
    /// Anything that is not exactly an admin marker reads as a plain user.
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    /// Strict parse for operator input.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(AppError::InvalidRole(s.to_string())),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Encode the enabled flag the way the credential sheet stores it.
pub fn enabled_to_db_str(enabled: bool) -> &'static str {
    if enabled { "Y" } else { "N" }
}

pub fn enabled_from_db_str(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("y")
}

/// One row of the credential sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub credential: String,
    pub role: Role,
    pub enabled: bool,
}

/// account → credential record
pub type UserMap = HashMap<String, UserRecord>;

/// What the admin account listing shows. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub account: String,
    pub role: Role,
    pub enabled: bool,
}
