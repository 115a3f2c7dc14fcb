//! Monthly ledger adapter: one sheet per `YYYYMM`, one row per check-in.

use super::cache::TtlCache;
use crate::errors::{AppError, AppResult};
use crate::models::event::{CheckinEvent, CheckinReceipt, LEDGER_HEADER};
use crate::models::session::SessionContext;
use crate::store::{RowId, SheetStore, Table};
use crate::utils::date;
use chrono::{DateTime, FixedOffset};
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// A resolved monthly partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionHandle {
    pub label: String,
    /// This call created the partition.
    pub created: bool,
}

pub struct Ledger {
    store: Arc<dyn SheetStore>,
    partitions: TtlCache<Arc<Vec<String>>>,
}

impl Ledger {
    pub fn new(store: Arc<dyn SheetStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            partitions: TtlCache::new(cache_ttl),
        }
    }

    /// Look up the partition for `label`, creating it with the ledger header if absent.
    pub fn get_or_create_partition(&self, label: &str) -> AppResult<PartitionHandle> {
        if !date::is_month_label(label) {
            return Err(AppError::InvalidMonth(label.to_string()));
        }

        let created = self.store.get_or_create_sheet(label, &LEDGER_HEADER)?;
        if created {
            info!("Created partition {label}");
            self.partitions.invalidate();
        }

        Ok(PartitionHandle {
            label: label.to_string(),
            created,
        })
    }

    /// Add one row. No duplicate check: a user may check in any number of times.
    pub fn append_event(
        &self,
        handle: &PartitionHandle,
        identity: &str,
        date: &str,
        time: &str,
    ) -> AppResult<RowId> {
        let event = CheckinEvent {
            identity: identity.to_string(),
            date: date.to_string(),
            time: time.to_string(),
        };
        self.store.append_row(&handle.label, &event.to_row())
    }

    /// Every partition label, ascending. Sheets with other names are ignored.
    pub fn list_partitions(&self) -> AppResult<Arc<Vec<String>>> {
        self.partitions.get_or_try_load(|| {
            let mut months: Vec<String> = self
                .store
                .sheet_names()?
                .into_iter()
                .filter(|n| date::is_month_label(n))
                .collect();
            months.sort();
            Ok(Arc::new(months))
        })
    }

    /// Header and rows of one month.
    pub fn read_partition(&self, label: &str) -> AppResult<Table> {
        if !date::is_month_label(label) {
            return Err(AppError::InvalidMonth(label.to_string()));
        }
        self.store
            .read_table(label)?
            .ok_or_else(|| AppError::SheetNotFound(label.to_string()))
    }

    /// Record a check-in for the session's identity at `now`.
    pub fn check_in(
        &self,
        session: &SessionContext,
        now: &DateTime<FixedOffset>,
    ) -> AppResult<CheckinReceipt> {
        let identity = session.require_login()?;
        let event = CheckinEvent::at(identity, now);
        let label = date::month_label(now);

        let handle = self.get_or_create_partition(&label)?;
        let row_id = self.append_event(&handle, &event.identity, &event.date, &event.time)?;

        info!("Check-in: {} at {} {}", event.identity, event.date, event.time);

        Ok(CheckinReceipt {
            identity: event.identity,
            date: event.date,
            time: event.time,
            partition: handle.label,
            row_id,
        })
    }
}
