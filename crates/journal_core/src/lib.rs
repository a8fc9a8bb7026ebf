//! Core of the personal journal: calendar, habits, ledger and diary kept in
//! one local database.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::calendar::{day_to_db, parse_day, MonthWindow};
pub use model::diary::DiaryEntry;
pub use model::event::CalendarEvent;
pub use model::habit::{completion_percentage, Habit, HabitCompletion, ProgressTier};
pub use model::ledger::{LedgerEntry, LedgerTotals};
pub use model::tags::{Color, EntryKind, Mood};
pub use model::validation::ValidationError;
pub use model::{RecordId, Stored};
pub use repo::collection::{
    day_value, Collection, ColumnName, CompletionColumn, Dated, DiaryColumn, EventColumn,
    HabitColumn, LedgerColumn,
};
pub use repo::store::{JournalStore, RepoError, RepoResult};
pub use service::calendar_service::{CalendarDay, CalendarMonth, CalendarService};
pub use service::dashboard_service::{DashboardService, DashboardSummary};
pub use service::diary_service::{DiaryHistoryItem, DiaryPage, DiaryService};
pub use service::error::{ServiceError, ServiceResult};
pub use service::habit_service::{HabitBoard, HabitRow, HabitService};
pub use service::ledger_service::{LedgerService, MonthLedger};
pub use view::{MonthContext, Page, ViewModel};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
