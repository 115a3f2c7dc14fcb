//! Check-in, month list, history and export.

use super::error::{ApiResult, InLanguage};
use super::session::Session;
use super::{AppState, blocking};
use crate::core::MonthList;
use crate::core::history::HistoryView;
use crate::errors::{AppError, AppResult};
use crate::export::{XLSX_MIME, XlsxExport};
use crate::models::event::CheckinReceipt;
use crate::models::session::SessionContext;
use crate::ui::labels::label;
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct CheckinResponse {
    pub receipt: CheckinReceipt,
    pub message: String,
}

pub async fn check_in(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<CheckinResponse>> {
    let lang = session.context.language;
    let core = state.core.clone();
    let ctx = session.context;

    let receipt = blocking(move || core.check_in(&ctx)).await.in_language(lang)?;
    let message = format!(
        "{}{} {}",
        label(lang, "checkin_success"),
        receipt.date,
        receipt.time
    );

    Ok(Json(CheckinResponse { receipt, message }))
}

pub async fn months(State(state): State<AppState>, session: Session) -> ApiResult<Json<MonthList>> {
    let lang = session.context.language;
    let core = state.core.clone();
    let ctx = session.context;

    let list = blocking(move || core.months(&ctx)).await.in_language(lang)?;
    Ok(Json(list))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub month: Option<String>,
    /// Omitted for the synthetic "all" choice.
    pub user: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    #[serde(flatten)]
    pub view: HistoryView,
    /// Localized headers: index, identity, date, time.
    pub columns: [&'static str; 4],
    /// Label of the "all" entry in the user selector.
    pub all_label: &'static str,
    pub notice_message: Option<String>,
    pub skipped_message: Option<String>,
}

/// Selected month, or the month picker's default.
fn resolve_month(state: &AppState, ctx: &SessionContext, month: Option<String>) -> AppResult<String> {
    match month.filter(|m| !m.trim().is_empty()) {
        Some(m) => Ok(m),
        None => state
            .core
            .months(ctx)?
            .default
            .ok_or(AppError::MissingField("month")),
    }
}

pub async fn history(
    State(state): State<AppState>,
    session: Session,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let lang = session.context.language;
    let ctx = session.context;

    let view = blocking(move || {
        let month = resolve_month(&state, &ctx, q.month)?;
        state.core.history(&ctx, &month, q.user.as_deref())
    })
    .await
    .in_language(lang)?;

    let notice_message = view.notice.map(|n| label(lang, n.label_key()).to_string());
    let skipped_message = (view.skipped_malformed > 0)
        .then(|| format!("{} {}", view.skipped_malformed, label(lang, "skipped_rows")));

    Ok(Json(HistoryResponse {
        columns: [
            label(lang, "col_index"),
            label(lang, "col_identity"),
            label(lang, "col_date"),
            label(lang, "col_time"),
        ],
        all_label: label(lang, "all_users_label"),
        notice_message,
        skipped_message,
        view,
    }))
}

pub async fn export(
    State(state): State<AppState>,
    session: Session,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Response> {
    let lang = session.context.language;
    let ctx = session.context;

    let file = blocking(move || {
        ctx.require_admin()?;
        let month = resolve_month(&state, &ctx, q.month)?;
        state.core.export(&ctx, &month, q.user.as_deref())
    })
    .await
    .in_language(lang)?;

    attachment(file).in_language(lang)
}

fn attachment(file: XlsxExport) -> AppResult<Response> {
    let disposition = content_disposition(&file.file_name);
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::Export(format!("bad file name header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// `attachment` header with an ASCII fallback and the UTF-8 name (RFC 5987).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for b in file_name.bytes() {
        if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
            encoded.push(b as char);
        } else {
            encoded.push_str(&format!("%{b:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
