//! Account management endpoints (admin only).

use super::error::{ApiResult, InLanguage};
use super::session::Session;
use super::{AppState, blocking};
use crate::core::NewUser;
use crate::models::user::{Role, UserSummary};
use crate::ui::labels::label;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct ActionResponse {
    pub account: String,
    /// Rows touched by the action; 0 means the account was not found.
    pub changed: usize,
    pub message: String,
}

pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let lang = session.context.language;
    let ctx = session.context;

    let users = blocking(move || state.core.list_users(&ctx))
        .await
        .in_language(lang)?;
    Ok(Json(users))
}

fn default_enabled() -> bool {
    true
}

#[derive(Deserialize)]
pub struct AddUserRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub secret: String,
    pub role: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

pub async fn add_user(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddUserRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let lang = session.context.language;
    let ctx = session.context;
    ctx.require_admin().in_language(lang)?;

    let account = req.account.trim().to_string();
    let role = match req.role.as_deref() {
        Some(r) => Role::parse(r).in_language(lang)?,
        None => Role::User,
    };
    let new_user = NewUser {
        account: account.clone(),
        secret: req.secret,
        role,
        enabled: req.enabled,
    };

    blocking(move || state.core.add_user(&ctx, &new_user))
        .await
        .in_language(lang)?;

    Ok(Json(ActionResponse {
        message: format!("{}: {account}", label(lang, "add_user_success")),
        account,
        changed: 1,
    }))
}

pub async fn enable_user(
    state: State<AppState>,
    session: Session,
    path: Path<String>,
) -> ApiResult<Json<ActionResponse>> {
    set_enabled(state, session, path, true).await
}

pub async fn disable_user(
    state: State<AppState>,
    session: Session,
    path: Path<String>,
) -> ApiResult<Json<ActionResponse>> {
    set_enabled(state, session, path, false).await
}

async fn set_enabled(
    State(state): State<AppState>,
    session: Session,
    Path(account): Path<String>,
    enabled: bool,
) -> ApiResult<Json<ActionResponse>> {
    let lang = session.context.language;
    let ctx = session.context;
    let target = account.clone();

    let core = state.core.clone();
    let updated = blocking(move || core.set_enabled(&ctx, &target, enabled))
        .await
        .in_language(lang)?;
    if updated && !enabled {
        state.sessions.revoke(account.trim());
    }

    let key = match (updated, enabled) {
        (false, _) => "account_not_found",
        (true, true) => "enabled_account",
        (true, false) => "disabled_account",
    };

    Ok(Json(ActionResponse {
        message: format!("{}: {account}", label(lang, key)),
        account,
        changed: usize::from(updated),
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Path(account): Path<String>,
) -> ApiResult<Json<ActionResponse>> {
    let lang = session.context.language;
    let ctx = session.context;
    let target = account.clone();

    let core = state.core.clone();
    let removed = blocking(move || core.delete_user(&ctx, &target))
        .await
        .in_language(lang)?;
    if removed > 0 {
        state.sessions.revoke(account.trim());
    }

    let key = if removed == 0 {
        "account_not_found"
    } else {
        "deleted_account"
    };

    Ok(Json(ActionResponse {
        message: format!("{}: {account}", label(lang, key)),
        account,
        changed: removed,
    }))
}
