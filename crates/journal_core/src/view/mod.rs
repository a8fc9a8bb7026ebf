//! Read-after-write page state.
//!
//! # Responsibility
//! - Hold the current view model of one page together with its window.
//! - Re-derive the whole view model after every write.
//!
//! # Invariants
//! - A write is complete only once the reloaded model reflects it.
//! - Reloads replace the model wholesale; nothing is patched incrementally.
//! - A failed write leaves the held model untouched.

use crate::model::calendar::MonthWindow;
use crate::repo::store::JournalStore;
use crate::service::calendar_service::{CalendarMonth, CalendarService};
use crate::service::dashboard_service::{DashboardService, DashboardSummary};
use crate::service::diary_service::{DiaryPage, DiaryService};
use crate::service::error::ServiceResult;
use crate::service::habit_service::{HabitBoard, HabitService};
use crate::service::ledger_service::{LedgerService, MonthLedger};
use chrono::NaiveDate;
use log::debug;

/// Visible window of a monthly page, plus the day highlighted as today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthContext {
    pub month: MonthWindow,
    pub today: NaiveDate,
}

impl MonthContext {
    /// The month containing `today`.
    pub fn current(today: NaiveDate) -> Self {
        Self {
            month: MonthWindow::containing(today),
            today,
        }
    }
}

/// A page's derived data, loadable from the store for a window.
pub trait ViewModel: Sized {
    type Window: Clone;

    /// Short label for log events.
    const PAGE: &'static str;

    fn load(store: &JournalStore, window: &Self::Window) -> ServiceResult<Self>;
}

/// One page's window and its current view model.
pub struct Page<V: ViewModel> {
    window: V::Window,
    model: V,
}

impl<V: ViewModel> Page<V> {
    /// Loads the initial model for `window`.
    pub fn open(store: &JournalStore, window: V::Window) -> ServiceResult<Self> {
        let model = V::load(store, &window)?;
        Ok(Self { window, model })
    }

    pub fn model(&self) -> &V {
        &self.model
    }

    pub fn window(&self) -> &V::Window {
        &self.window
    }

    pub fn into_model(self) -> V {
        self.model
    }

    /// Re-derives the model for the current window.
    pub fn refresh(&mut self, store: &JournalStore) -> ServiceResult<&V> {
        self.model = V::load(store, &self.window)?;
        debug!("event=page_refresh module=view status=ok page={}", V::PAGE);
        Ok(&self.model)
    }

    /// Switches to another window. The old window and model are kept when
    /// loading the new one fails.
    pub fn show(&mut self, store: &JournalStore, window: V::Window) -> ServiceResult<&V> {
        let model = V::load(store, &window)?;
        self.window = window;
        self.model = model;
        Ok(&self.model)
    }

    /// Runs one write, then reloads the model before returning.
    ///
    /// The write's own result is passed through; read the refreshed state
    /// from [`Page::model`].
    ///
    /// # Errors
    /// - The write fails: nothing was stored and the held model is unchanged.
    /// - The write succeeds but the reload fails: the write is already
    ///   committed, the held model is stale, and the reload error is
    ///   returned. Call [`Page::refresh`] to resynchronize.
    pub fn apply<T>(
        &mut self,
        store: &JournalStore,
        write: impl FnOnce(&JournalStore) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let output = write(store)?;
        self.refresh(store)?;
        Ok(output)
    }
}

impl ViewModel for CalendarMonth {
    type Window = MonthContext;
    const PAGE: &'static str = "calendar";

    fn load(store: &JournalStore, window: &MonthContext) -> ServiceResult<Self> {
        Ok(CalendarService::new(store).month_view(window.month, window.today)?)
    }
}

impl ViewModel for HabitBoard {
    type Window = MonthContext;
    const PAGE: &'static str = "habits";

    fn load(store: &JournalStore, window: &MonthContext) -> ServiceResult<Self> {
        Ok(HabitService::new(store).month_board(window.month, window.today)?)
    }
}

impl ViewModel for MonthLedger {
    type Window = MonthWindow;
    const PAGE: &'static str = "ledger";

    fn load(store: &JournalStore, window: &MonthWindow) -> ServiceResult<Self> {
        Ok(LedgerService::new(store).month_ledger(*window)?)
    }
}

impl ViewModel for DiaryPage {
    type Window = NaiveDate;
    const PAGE: &'static str = "diary";

    fn load(store: &JournalStore, today: &NaiveDate) -> ServiceResult<Self> {
        Ok(DiaryService::new(store).page(*today)?)
    }
}

impl ViewModel for DashboardSummary {
    type Window = NaiveDate;
    const PAGE: &'static str = "dashboard";

    fn load(store: &JournalStore, today: &NaiveDate) -> ServiceResult<Self> {
        Ok(DashboardService::new(store).summary(*today)?)
    }
}
