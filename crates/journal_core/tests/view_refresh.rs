use chrono::NaiveDate;
use journal_core::{
    CalendarEvent, CalendarMonth, CalendarService, Color, DashboardSummary, DiaryService, EntryKind,
    HabitBoard, HabitService, JournalStore, LedgerEntry, LedgerService, MonthContext,
    MonthLedger, MonthWindow, Mood, Page, RepoError, ServiceError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn apply_reloads_model_after_write() {
    let store = JournalStore::open_in_memory().unwrap();
    let today = date(2024, 3, 14);
    let mut page = Page::<CalendarMonth>::open(&store, MonthContext::current(today)).unwrap();
    assert_eq!(page.model().event_count(), 0);

    let id = page
        .apply(&store, |store| {
            CalendarService::new(store).add_event(today, "pi day", Color::Amber)
        })
        .unwrap();

    let cell = page.model().day(today).unwrap();
    assert_eq!(cell.events.len(), 1);
    assert_eq!(cell.events[0].id, id);

    page.apply(&store, |store| {
        Ok(CalendarService::new(store).delete_event(id)?)
    })
    .unwrap();
    assert_eq!(page.model().event_count(), 0);
}

#[test]
fn failed_write_keeps_previous_model() {
    let store = JournalStore::open_in_memory().unwrap();
    let today = date(2024, 3, 14);
    let mut page = Page::<HabitBoard>::open(&store, MonthContext::current(today)).unwrap();
    let habit = page
        .apply(&store, |store| HabitService::new(store).add_habit("read", Color::Blue))
        .unwrap();
    let before = page.model().clone();

    let err = page
        .apply(&store, |store| HabitService::new(store).add_habit("", Color::Red))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(page.model(), &before);

    page.apply(&store, |store| HabitService::new(store).toggle(habit, today))
        .unwrap();
    let row = page.model().row(habit).unwrap();
    assert!(row.is_completed(today));
    assert_eq!(row.percentage, 3);
}

#[test]
fn show_switches_window_and_rederives() {
    let store = JournalStore::open_in_memory().unwrap();
    LedgerService::new(&store)
        .add_entry(&LedgerEntry::new(date(2024, 2, 10), 12.0, "gym", EntryKind::Expense))
        .unwrap();

    let march = MonthWindow::new(2024, 3).unwrap();
    let mut page = Page::<MonthLedger>::open(&store, march).unwrap();
    assert!(page.model().entries.is_empty());

    let february = march.previous().unwrap();
    page.show(&store, february).unwrap();
    assert_eq!(page.window(), &february);
    assert_eq!(page.model().totals.expense, 12.0);
}

#[test]
fn dashboard_reflects_writes_from_other_pages_on_refresh() {
    let store = JournalStore::open_in_memory().unwrap();
    let today = date(2024, 12, 24);
    let mut dashboard = Page::<DashboardSummary>::open(&store, today).unwrap();
    assert_eq!(dashboard.model().habits_total, 0);
    assert_eq!(dashboard.model().mood_today, None);

    CalendarService::new(&store)
        .add_event(today, "dinner", Color::Red)
        .unwrap();
    let habits = HabitService::new(&store);
    let walk = habits.add_habit("walk", Color::Green).unwrap();
    habits.add_habit("read", Color::Blue).unwrap();
    habits.toggle(walk, today).unwrap();
    let ledger = LedgerService::new(&store);
    ledger
        .add_entry(&LedgerEntry::new(date(2024, 12, 1), 100.0, "pay", EntryKind::Income))
        .unwrap();
    ledger
        .add_entry(&LedgerEntry::new(today, 30.0, "gifts", EntryKind::Expense))
        .unwrap();
    DiaryService::new(&store)
        .save_entry(today, "family", Mood::Excellent)
        .unwrap();

    let summary = dashboard.refresh(&store).unwrap();
    assert_eq!(summary.events_today.len(), 1);
    assert_eq!(summary.habits_total, 2);
    assert_eq!(summary.habits_completed_today, 1);
    assert_eq!(summary.habit_progress(), 0.5);
    assert_eq!(summary.monthly_balance, 70.0);
    assert_eq!(summary.mood_today, Some(Mood::Excellent));
}

#[test]
fn reload_failure_after_committed_write_keeps_stale_model() {
    let store = JournalStore::open_in_memory().unwrap();
    let today = date(2024, 3, 14);
    let mut page = Page::<CalendarMonth>::open(&store, MonthContext::current(today)).unwrap();
    let before = page.model().clone();

    // A row the reload cannot decode.
    let err = page
        .apply(&store, |store| {
            store
                .connection()
                .execute(
                    "INSERT INTO calendar_events (day, title, color) VALUES ('2024-03-14', 'x', 'mauve');",
                    [],
                )
                .map_err(RepoError::from)?;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::InvalidData(_))
    ));
    assert_eq!(page.model(), &before);
    assert_eq!(store.count::<CalendarEvent>().unwrap(), 1);
}
