use crate::models::event::MONTH_FORMAT;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;
use std::sync::LazyLock;

static MONTH_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(0[1-9]|1[0-2])$").expect("valid month regex"));

/// Fixed offset for `hours` east of UTC, clamped to the valid range.
pub fn offset(hours: i32) -> FixedOffset {
    let hours = hours.clamp(-23, 23);
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Current instant in the given offset.
pub fn now_in(hours: i32) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset(hours))
}

/// `YYYYMM` label of the month containing `dt`.
pub fn month_label(dt: &DateTime<FixedOffset>) -> String {
    dt.format(MONTH_FORMAT).to_string()
}

/// True for labels such as `202501`; rejects `202513`, `2025-01`, `20251`.
pub fn is_month_label(s: &str) -> bool {
    MONTH_LABEL.is_match(s)
}

/// Accepts `YYYYMM`, `YYYY-MM` and `YYYY/MM`, returns the canonical `YYYYMM`.
pub fn normalize_month(s: &str) -> Option<String> {
    let compact: String = s.trim().chars().filter(|c| *c != '-' && *c != '/').collect();
    is_month_label(&compact).then_some(compact)
}

/// Month preselected in the month picker: the current month when it has a
/// partition, otherwise the first one listed.
pub fn default_month(available: &[String], current: &str) -> Option<String> {
    if available.iter().any(|m| m == current) {
        Some(current.to_string())
    } else {
        available.first().cloned()
    }
}
