//! Dashboard summary across all pages.

use crate::model::calendar::MonthWindow;
use crate::model::event::CalendarEvent;
use crate::model::habit::{Habit, HabitCompletion};
use crate::model::tags::Mood;
use crate::model::Stored;
use crate::repo::collection::{day_value, CompletionColumn};
use crate::repo::store::{JournalStore, RepoResult};
use crate::service::calendar_service::CalendarService;
use crate::service::diary_service::DiaryService;
use crate::service::ledger_service::LedgerService;
use chrono::NaiveDate;
use serde::Serialize;

/// Today at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub today: NaiveDate,
    pub events_today: Vec<Stored<CalendarEvent>>,
    pub habits_total: usize,
    pub habits_completed_today: usize,
    /// Balance of the month containing `today`.
    pub monthly_balance: f64,
    pub mood_today: Option<Mood>,
}

impl DashboardSummary {
    /// Fraction of habits completed today, `0.0` without habits.
    pub fn habit_progress(&self) -> f64 {
        if self.habits_total == 0 {
            return 0.0;
        }
        self.habits_completed_today as f64 / self.habits_total as f64
    }
}

pub struct DashboardService<'s> {
    store: &'s JournalStore,
}

impl<'s> DashboardService<'s> {
    pub fn new(store: &'s JournalStore) -> Self {
        Self { store }
    }

    pub fn summary(&self, today: NaiveDate) -> RepoResult<DashboardSummary> {
        let events_today = CalendarService::new(self.store).events_on(today)?;
        let habits_total = self.store.count::<Habit>()?;
        let habits_completed_today = self
            .store
            .query_by_equality::<HabitCompletion>(CompletionColumn::Day, day_value(today))?
            .len();
        let monthly_balance =
            LedgerService::new(self.store).monthly_balance(MonthWindow::containing(today))?;
        let mood_today = DiaryService::new(self.store).todays_mood(today)?;

        Ok(DashboardSummary {
            today,
            events_today,
            habits_total,
            habits_completed_today,
            monthly_balance,
            mood_today,
        })
    }
}
