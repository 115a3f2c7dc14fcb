//! History view: filter, sort and cap one month of check-ins.

use super::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::event::{DATE_COLUMN, IDENTITY_COLUMNS, TIME_COLUMN, parse_timestamp};
use crate::models::language::Language;
use crate::models::session::SessionContext;
use crate::store::{SheetRow, Table};
use crate::ui::labels::label;
use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;
use std::collections::BTreeSet;

/// Why a history view has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryNotice {
    /// The month exists but nobody has checked in yet.
    PartitionEmpty,
    /// Admin filter matched nothing.
    NoData,
    /// The viewer has no check-ins this month.
    NoRecord,
}

impl HistoryNotice {
    pub fn label_key(&self) -> &'static str {
        match self {
            HistoryNotice::PartitionEmpty => "partition_empty",
            HistoryNotice::NoData => "no_data",
            HistoryNotice::NoRecord => "no_record",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    /// Display index, starting at 1.
    pub index: usize,
    pub identity: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub month: String,
    /// Column used to match identities (`account` or `name`).
    pub identity_column: Option<String>,
    /// Identity the rows are restricted to; `None` means everybody.
    pub selected_user: Option<String>,
    /// Identities present this month, for the admin selector. Empty for non-admins.
    pub users: Vec<String>,
    pub rows: Vec<HistoryRow>,
    /// Rows matching the filter before the cap was applied.
    pub total_matched: usize,
    /// Matching rows dropped because their date/time did not parse.
    pub skipped_malformed: usize,
    pub notice: Option<HistoryNotice>,
}

impl HistoryView {
    fn empty(month: &str, notice: HistoryNotice) -> Self {
        Self {
            month: month.to_string(),
            identity_column: None,
            selected_user: None,
            users: Vec::new(),
            rows: Vec::new(),
            total_matched: 0,
            skipped_malformed: 0,
            notice: Some(notice),
        }
    }
}

/// The user picker's "all" entry, in any language, means no filter.
fn is_all_users(selected: &str) -> bool {
    Language::ALL
        .iter()
        .any(|lang| label(*lang, "all_users_label") == selected)
}

/// Build the view of `table` for `viewer`.
///
/// Admins see every identity unless `selected` names one; anybody else only
/// ever sees their own rows, whatever `selected` says.
pub fn build_history(
    table: &Table,
    viewer: &SessionContext,
    month: &str,
    selected: Option<&str>,
    limit: usize,
) -> AppResult<HistoryView> {
    let identity = viewer.require_login()?;
    let is_admin = viewer.is_admin();

    if table.rows.is_empty() {
        return Ok(HistoryView::empty(month, HistoryNotice::PartitionEmpty));
    }

    let (key_col, key_name) = table
        .first_column(&IDENTITY_COLUMNS)
        .ok_or_else(|| AppError::MissingColumn(IDENTITY_COLUMNS.join("/")))?;
    let date_col = table
        .column(DATE_COLUMN)
        .ok_or_else(|| AppError::MissingColumn(DATE_COLUMN.to_string()))?;
    let time_col = table
        .column(TIME_COLUMN)
        .ok_or_else(|| AppError::MissingColumn(TIME_COLUMN.to_string()))?;

    let users: Vec<String> = if is_admin {
        table
            .rows
            .iter()
            .map(|r| r.cell(key_col).trim().to_string())
            .filter(|u| !u.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        Vec::new()
    };

    let filter: Option<String> = if is_admin {
        selected
            .map(str::trim)
            .filter(|s| !s.is_empty() && !is_all_users(s))
            .map(str::to_string)
    } else {
        Some(identity.to_string())
    };

    let matching: Vec<_> = table
        .rows
        .iter()
        .filter(|r| match &filter {
            Some(who) => r.cell(key_col).trim() == who.as_str(),
            None => true,
        })
        .collect();

    if matching.is_empty() {
        let notice = if is_admin {
            HistoryNotice::NoData
        } else {
            HistoryNotice::NoRecord
        };
        let mut view = HistoryView::empty(month, notice);
        view.identity_column = Some(key_name);
        view.selected_user = filter;
        view.users = users;
        return Ok(view);
    }

    let mut stamped: Vec<(NaiveDateTime, &SheetRow)> = Vec::with_capacity(matching.len());
    let mut skipped = 0;
    for row in matching {
        match parse_timestamp(row.cell(date_col), row.cell(time_col)) {
            Some(ts) => stamped.push((ts, row)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("{month}: skipped {skipped} row(s) with an unreadable date/time");
    }

    // stable: equal timestamps keep sheet order
    stamped.sort_by_key(|(ts, _)| *ts);
    let total_matched = stamped.len();

    let rows = stamped
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (_, r))| HistoryRow {
            index: i + 1,
            identity: r.cell(key_col).trim().to_string(),
            date: r.cell(date_col).trim().to_string(),
            time: r.cell(time_col).trim().to_string(),
        })
        .collect();

    Ok(HistoryView {
        month: month.to_string(),
        identity_column: Some(key_name),
        selected_user: filter,
        users,
        rows,
        total_matched,
        skipped_malformed: skipped,
        notice: None,
    })
}

/// Load `month` and build the view for `viewer`.
pub fn render_history(
    ledger: &Ledger,
    viewer: &SessionContext,
    month: &str,
    selected: Option<&str>,
    limit: usize,
) -> AppResult<HistoryView> {
    viewer.require_login()?;
    let table = ledger.read_partition(month)?;
    build_history(&table, viewer, month, selected, limit)
}
