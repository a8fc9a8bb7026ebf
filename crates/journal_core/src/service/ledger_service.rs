//! Expense ledger use-cases.
//!
//! # Invariants
//! - Monthly totals only include entries dated inside the window.
//! - Stored amounts are positive; expenses subtract at read time.

use crate::model::calendar::MonthWindow;
use crate::model::ledger::{LedgerEntry, LedgerTotals};
use crate::model::{RecordId, Stored};
use crate::repo::store::{JournalStore, RepoResult};
use crate::service::error::ServiceResult;
use log::info;
use serde::Serialize;
use std::cmp::Reverse;

/// Derived view of one month of ledger movements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLedger {
    pub window: MonthWindow,
    /// Newest day first; same-day entries newest id first.
    pub entries: Vec<Stored<LedgerEntry>>,
    pub totals: LedgerTotals,
}

pub struct LedgerService<'s> {
    store: &'s JournalStore,
}

impl<'s> LedgerService<'s> {
    pub fn new(store: &'s JournalStore) -> Self {
        Self { store }
    }

    pub fn month_ledger(&self, window: MonthWindow) -> RepoResult<MonthLedger> {
        let mut entries = self
            .store
            .query_by_date_range::<LedgerEntry>(window.first_day(), window.last_day())?;
        entries.sort_by_key(|entry| (Reverse(entry.day), Reverse(entry.id)));
        let totals = LedgerTotals::from_entries(&entries);
        Ok(MonthLedger {
            window,
            entries,
            totals,
        })
    }

    /// Income minus expenses over the month, both ends inclusive.
    pub fn monthly_balance(&self, window: MonthWindow) -> RepoResult<f64> {
        let entries = self
            .store
            .query_by_date_range::<LedgerEntry>(window.first_day(), window.last_day())?;
        Ok(LedgerTotals::from_entries(&entries).balance)
    }

    pub fn add_entry(&self, entry: &LedgerEntry) -> ServiceResult<RecordId> {
        let entry = normalize(entry);
        entry.validate()?;
        let id = self.store.insert(&entry)?;
        info!(
            "event=ledger_add module=service status=ok id={id} kind={}",
            entry.kind.as_str()
        );
        Ok(id)
    }

    pub fn update_entry(&self, id: RecordId, entry: &LedgerEntry) -> ServiceResult<()> {
        let entry = normalize(entry);
        entry.validate()?;
        self.store.update(id, &entry)?;
        Ok(())
    }

    pub fn delete_entry(&self, id: RecordId) -> RepoResult<()> {
        self.store.delete::<LedgerEntry>(id)
    }
}

/// Trims text fields; a blank description is stored as none.
fn normalize(entry: &LedgerEntry) -> LedgerEntry {
    LedgerEntry {
        category: entry.category.trim().to_string(),
        description: entry
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
        ..entry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::normalize;
    use crate::model::ledger::LedgerEntry;
    use crate::model::tags::EntryKind;
    use chrono::NaiveDate;

    #[test]
    fn normalize_drops_blank_description() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let entry = LedgerEntry::new(day, 8.0, " Food ", EntryKind::Expense).with_description("  ");
        let normalized = normalize(&entry);
        assert_eq!(normalized.category, "Food");
        assert_eq!(normalized.description, None);
    }
}
