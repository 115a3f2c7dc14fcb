use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;

/// Header written into every new monthly partition.
pub const LEDGER_HEADER: [&str; 3] = ["name", "date", "time"];

/// Identity columns, in order of preference.
pub const IDENTITY_COLUMNS: [&str; 2] = ["account", "name"];

pub const DATE_COLUMN: &str = "date";
pub const TIME_COLUMN: &str = "time";

pub const DATE_FORMAT: &str = "%Y/%m/%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const MONTH_FORMAT: &str = "%Y%m";

/// A single check-in as stored in a monthly partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckinEvent {
    pub identity: String, // ⇔ name column
    pub date: String,     // ⇔ "YYYY/MM/DD"
    pub time: String,     // ⇔ "HH:MM:SS"
}

impl CheckinEvent {
    /// Build the event for `identity` at the given local instant.
    pub fn at(identity: &str, now: &DateTime<FixedOffset>) -> Self {
        Self {
            identity: identity.to_string(),
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![self.identity.clone(), self.date.clone(), self.time.clone()]
    }
}

/// Parse the date and time cells of a ledger row into one sortable value.
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let joined = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&joined, &format!("{DATE_FORMAT} {TIME_FORMAT}")).ok()
}

/// Returned to the user after a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckinReceipt {
    pub identity: String,
    pub date: String,
    pub time: String,
    pub partition: String,
    pub row_id: i64,
}
