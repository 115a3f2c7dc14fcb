//! Page chrome, login/logout and session state.

use super::error::{ApiError, ApiResult, InLanguage};
use super::session::Session;
use super::{AppState, blocking};
use crate::errors::AppError;
use crate::models::language::Language;
use crate::models::session::{AccountTab, AdminMenu, SessionContext};
use crate::ui::labels::{dictionary, label};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session: SessionContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let lang = state.core.default_language();
    let languages: Vec<_> = Language::ALL
        .iter()
        .map(|l| LanguageOption {
            code: l.code(),
            name: l.native_name(),
        })
        .collect();

    Json(json!({
        "title": label(lang, "title"),
        "version": env!("CARGO_PKG_VERSION"),
        "default_language": lang,
        "languages": languages,
    }))
}

pub async fn labels(Path(lang): Path<String>) -> ApiResult<Json<BTreeMap<&'static str, &'static str>>> {
    let lang = Language::from_code(&lang)?;
    Ok(Json(dictionary(lang)))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub secret: String,
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub session: SessionContext,
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut start = state.core.new_session();
    if let Some(code) = req.language.as_deref() {
        start = start.with_language(Language::from_code(code).in_language(start.language)?);
    }
    let lang = start.language;

    let core = state.core.clone();
    let context = blocking(move || core.login(&start, &req.account, &req.secret))
        .await
        .in_language(lang)?;

    let token = state.sessions.create(context.clone());
    let message = format!("{}{}", label(lang, "welcome"), context.identity);

    Ok(Json(LoginResponse {
        token,
        session: context,
        message,
    }))
}

pub async fn logout(State(state): State<AppState>, session: Session) -> Json<SessionResponse> {
    state.sessions.remove(&session.token);
    let next = state.core.logout(&session.context);
    let message = label(session.context.language, "logged_out").to_string();

    Json(SessionResponse {
        session: next,
        message: Some(message),
    })
}

pub async fn session(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        session: session.context,
        message: None,
    })
}

#[derive(Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

pub async fn set_language(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LanguageRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let lang = Language::from_code(&req.language).in_language(session.context.language)?;
    let next = session.context.with_language(lang);
    store_next(&state, &session, next)
}

#[derive(Deserialize)]
pub struct MenuRequest {
    pub menu: String,
    pub account_tab: Option<AccountTab>,
}

pub async fn set_menu(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<MenuRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let lang = session.context.language;
    let menu = AdminMenu::from_key(&req.menu).in_language(lang)?;
    let next = session
        .context
        .with_menu(menu, req.account_tab)
        .in_language(lang)?;
    store_next(&state, &session, next)
}

fn store_next(
    state: &AppState,
    session: &Session,
    next: SessionContext,
) -> ApiResult<Json<SessionResponse>> {
    if !state.sessions.replace(&session.token, next.clone()) {
        // logged out by a concurrent request
        return Err(ApiError::new(AppError::NotLoggedIn, next.language));
    }
    Ok(Json(SessionResponse {
        session: next,
        message: None,
    }))
}
