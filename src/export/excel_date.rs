// src/export/excel_date.rs

use crate::models::event::{DATE_FORMAT, TIME_FORMAT};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Interpret a ledger cell as a date or a time, returning the Excel number
/// format and the serial value to store.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        let serial = naive_datetime_to_excel_serial(&d.and_time(NaiveTime::MIN));
        return Some(("yyyy/mm/dd", serial));
    }

    if let Ok(t) = NaiveTime::parse_from_str(s, TIME_FORMAT) {
        let seconds = t.num_seconds_from_midnight() as f64;
        return Some(("hh:mm:ss", seconds / 86400.0));
    }

    None
}

fn naive_datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    // 1899-12-30 is day 0 in the 1900 date system (leap-year bug included)
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN);

    let duration = *dt - excel_epoch;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    days + secs / 86400.0
}
