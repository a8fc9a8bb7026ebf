//! FFI use-case API for the journal pages.
//!
//! # Responsibility
//! - Expose one sync call per page action to Dart via FRB.
//! - Own the process-wide store handle and serialize access to it.
//! - Return the refreshed page view after every mutation.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported as `ok=false` envelopes with a message.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.

use chrono::{Local, NaiveDate};
use journal_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_day,
    ping as ping_inner, CalendarEvent, CalendarMonth, CalendarService, Color, DashboardSummary,
    DiaryEntry, DiaryHistoryItem, DiaryPage, DiaryService, EntryKind, HabitBoard, HabitRow,
    HabitService, JournalStore, LedgerEntry, LedgerService, MonthContext, MonthLedger,
    MonthWindow, Mood, Page, Stored, ViewModel,
};
use log::{info, warn};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const JOURNAL_DB_FILE_NAME: &str = "journal_web.sqlite3";
static DEFAULT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static JOURNAL: Mutex<Option<OpenJournal>> = Mutex::new(None);

type CallResult<T> = Result<T, String>;

struct OpenJournal {
    path: PathBuf,
    store: JournalStore,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result of a call that carries no page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Calendar event as shown in a day cell or the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventItem {
    pub id: i64,
    pub day: String,
    pub title: String,
    /// Color tag (`red|blue|green|purple|amber|pink`).
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayItem {
    pub day: String,
    pub is_today: bool,
    pub events: Vec<EventItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before day 1 in a Monday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDayItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarResponse {
    pub ok: bool,
    pub message: String,
    /// Refreshed month; `None` on failure.
    pub view: Option<CalendarMonthView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub frequency: Option<String>,
    /// Completed days inside the visible month, ascending.
    pub completed_days: Vec<String>,
    pub percentage: u32,
    /// Progress band (`strong|steady|low`).
    pub tier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitBoardView {
    pub year: i32,
    pub month: u32,
    pub today: String,
    pub days_in_month: u32,
    pub habits: Vec<HabitItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitResponse {
    pub ok: bool,
    pub message: String,
    pub view: Option<HabitBoardView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerItem {
    pub id: i64,
    pub day: String,
    /// Always positive; direction comes from `kind`.
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    /// `income|expense`.
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerMonthView {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<LedgerItem>,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerResponse {
    pub ok: bool,
    pub message: String,
    pub view: Option<LedgerMonthView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryItem {
    pub id: i64,
    pub day: String,
    pub content: String,
    /// `excellent|good|neutral|bad|terrible`.
    pub mood: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryView {
    pub today: String,
    pub today_entry: Option<DiaryItem>,
    /// Past entries, newest first.
    pub history: Vec<DiaryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryResponse {
    pub ok: bool,
    pub message: String,
    pub view: Option<DiaryView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub today: String,
    pub events_today: Vec<EventItem>,
    pub habits_total: u32,
    pub habits_completed_today: u32,
    /// Completed-today fraction in `0.0..=1.0`.
    pub habit_progress: f64,
    pub monthly_balance: f64,
    pub mood_today: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub message: String,
    pub view: Option<DashboardView>,
}

/// Opens (or switches to) the journal database at `db_path`.
///
/// Input semantics:
/// - `db_path`: file path; `None` or blank falls back to `JOURNAL_DB_PATH`,
///   then to `<temp>/journal_web.sqlite3`.
///
/// # FFI contract
/// - Reopening the path already in use is a no-op.
/// - On failure the previously open journal stays active.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_open(db_path: Option<String>) -> ActionResponse {
    let path = db_path
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(resolve_default_db_path);

    match open_journal_at(path) {
        Ok(message) => ActionResponse { ok: true, message },
        Err(err) => {
            warn!("event=journal_open module=ffi status=error");
            ActionResponse {
                ok: false,
                message: format!("journal_open failed: {err}"),
            }
        }
    }
}

/// Loads the calendar grid for `year`/`month`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(year: i32, month: u32) -> CalendarResponse {
    let result = month_context(year, month)
        .and_then(|context| with_store(|store| load_view::<CalendarMonth>(store, context)));
    envelope("calendar_month", "Calendar loaded.", result.map(|model| to_calendar_view(&model)))
}

/// Adds an event on `day` and returns the refreshed `year`/`month` grid.
///
/// # FFI contract
/// - Blank titles and unknown colors are rejected without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_add_event(
    year: i32,
    month: u32,
    day: String,
    title: String,
    color: String,
) -> CalendarResponse {
    let result = (|| {
        let context = month_context(year, month)?;
        let day = parse_day_arg(&day)?;
        let color = parse_color_arg(&color)?;
        with_store(|store| {
            apply_write::<CalendarMonth, _>(store, context, |store| {
                CalendarService::new(store).add_event(day, &title, color)
            })
        })
    })();
    envelope(
        "calendar_add_event",
        "Event added.",
        result.map(|model| to_calendar_view(&model)),
    )
}

/// Deletes an event; deleting a missing id succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_delete_event(year: i32, month: u32, event_id: i64) -> CalendarResponse {
    let result = month_context(year, month).and_then(|context| {
        with_store(|store| {
            apply_write::<CalendarMonth, _>(store, context, |store| {
                Ok(CalendarService::new(store).delete_event(event_id)?)
            })
        })
    });
    envelope(
        "calendar_delete_event",
        "Event deleted.",
        result.map(|model| to_calendar_view(&model)),
    )
}

/// Loads the habit board for `year`/`month`.
#[flutter_rust_bridge::frb(sync)]
pub fn habits_month(year: i32, month: u32) -> HabitResponse {
    let result = month_context(year, month)
        .and_then(|context| with_store(|store| load_view::<HabitBoard>(store, context)));
    envelope("habits_month", "Habits loaded.", result.map(|model| to_habit_view(&model)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_add(year: i32, month: u32, name: String, color: String) -> HabitResponse {
    let result = (|| {
        let context = month_context(year, month)?;
        let color = parse_color_arg(&color)?;
        with_store(|store| {
            apply_write::<HabitBoard, _>(store, context, |store| {
                HabitService::new(store).add_habit(&name, color)
            })
        })
    })();
    envelope("habit_add", "Habit added.", result.map(|model| to_habit_view(&model)))
}

/// Deletes a habit together with all of its completions.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_delete(year: i32, month: u32, habit_id: i64) -> HabitResponse {
    let result = month_context(year, month).and_then(|context| {
        with_store(|store| {
            apply_write::<HabitBoard, _>(store, context, |store| {
                Ok(HabitService::new(store).delete_habit(habit_id)?)
            })
        })
    });
    envelope("habit_delete", "Habit deleted.", result.map(|model| to_habit_view(&model)))
}

/// Flips completion of `habit_id` on `day`.
///
/// # FFI contract
/// - Unknown habit ids fail without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_toggle(year: i32, month: u32, habit_id: i64, day: String) -> HabitResponse {
    let result = (|| {
        let context = month_context(year, month)?;
        let day = parse_day_arg(&day)?;
        with_store(|store| {
            apply_write::<HabitBoard, _>(store, context, |store| {
                HabitService::new(store).toggle(habit_id, day)
            })
        })
    })();
    envelope("habit_toggle", "Habit toggled.", result.map(|model| to_habit_view(&model)))
}

/// Loads the ledger for `year`/`month`, newest entries first.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_month(year: i32, month: u32) -> LedgerResponse {
    let result = month_window(year, month)
        .and_then(|window| with_store(|store| load_view::<MonthLedger>(store, window)));
    envelope("ledger_month", "Ledger loaded.", result.map(|model| to_ledger_view(&model)))
}

/// Records an income or expense movement.
///
/// Input semantics:
/// - `amount`: positive, finite.
/// - `kind`: `income|expense`.
/// - `description`: optional; blank is stored as none.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_add(
    year: i32,
    month: u32,
    day: String,
    amount: f64,
    category: String,
    description: Option<String>,
    kind: String,
) -> LedgerResponse {
    let result = (|| {
        let window = month_window(year, month)?;
        let day = parse_day_arg(&day)?;
        let kind = EntryKind::parse(&kind).ok_or_else(|| format!("unknown entry kind `{kind}`"))?;
        let mut entry = LedgerEntry::new(day, amount, category, kind);
        entry.description = description;
        with_store(|store| {
            apply_write::<MonthLedger, _>(store, window, |store| {
                LedgerService::new(store).add_entry(&entry)
            })
        })
    })();
    envelope("ledger_add", "Entry added.", result.map(|model| to_ledger_view(&model)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_delete(year: i32, month: u32, entry_id: i64) -> LedgerResponse {
    let result = month_window(year, month).and_then(|window| {
        with_store(|store| {
            apply_write::<MonthLedger, _>(store, window, |store| {
                Ok(LedgerService::new(store).delete_entry(entry_id)?)
            })
        })
    });
    envelope("ledger_delete", "Entry deleted.", result.map(|model| to_ledger_view(&model)))
}

/// Loads today's entry and the history of past entries.
#[flutter_rust_bridge::frb(sync)]
pub fn diary_load() -> DiaryResponse {
    let result = with_store(|store| load_view::<DiaryPage>(store, today()));
    envelope("diary_load", "Diary loaded.", result.map(|model| to_diary_view(&model)))
}

/// Saves today's entry, replacing content and mood if one exists.
#[flutter_rust_bridge::frb(sync)]
pub fn diary_save(content: String, mood: String) -> DiaryResponse {
    let result = (|| {
        let mood = Mood::parse(&mood).ok_or_else(|| format!("unknown mood `{mood}`"))?;
        let today = today();
        with_store(|store| {
            apply_write::<DiaryPage, _>(store, today, |store| {
                DiaryService::new(store).save_entry(today, &content, mood)
            })
        })
    })();
    envelope("diary_save", "Entry saved.", result.map(|model| to_diary_view(&model)))
}

/// Today's events, habit progress, monthly balance and mood.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_summary() -> DashboardResponse {
    let result = with_store(|store| load_view::<DashboardSummary>(store, today()));
    envelope(
        "dashboard_summary",
        "Dashboard loaded.",
        result.map(|model| to_dashboard_view(&model)),
    )
}

/// Builds a page envelope. `V` is the page's view DTO.
trait Envelope<V>: Sized {
    fn from_parts(ok: bool, message: String, view: Option<V>) -> Self;
}

macro_rules! impl_envelope {
    ($response:ty, $view:ty) => {
        impl Envelope<$view> for $response {
            fn from_parts(ok: bool, message: String, view: Option<$view>) -> Self {
                Self { ok, message, view }
            }
        }
    };
}

impl_envelope!(CalendarResponse, CalendarMonthView);
impl_envelope!(HabitResponse, HabitBoardView);
impl_envelope!(LedgerResponse, LedgerMonthView);
impl_envelope!(DiaryResponse, DiaryView);
impl_envelope!(DashboardResponse, DashboardView);

fn envelope<V, R: Envelope<V>>(call: &str, success: &str, result: CallResult<V>) -> R {
    match result {
        Ok(view) => R::from_parts(true, success.to_string(), Some(view)),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call={call}");
            R::from_parts(false, format!("{call} failed: {err}"), None)
        }
    }
}

fn load_view<V: ViewModel>(store: &JournalStore, window: V::Window) -> CallResult<V> {
    Page::<V>::open(store, window)
        .map(Page::into_model)
        .map_err(describe)
}

/// Runs `write` through the page's refresh cycle and returns the reloaded model.
fn apply_write<V: ViewModel, T>(
    store: &JournalStore,
    window: V::Window,
    write: impl FnOnce(&JournalStore) -> journal_core::ServiceResult<T>,
) -> CallResult<V> {
    let mut page = Page::<V>::open(store, window).map_err(describe)?;
    page.apply(store, write).map_err(describe)?;
    Ok(page.into_model())
}

fn with_store<T>(f: impl FnOnce(&JournalStore) -> CallResult<T>) -> CallResult<T> {
    let mut slot = JOURNAL
        .lock()
        .map_err(|_| "journal store lock poisoned".to_string())?;
    if let Some(journal) = slot.as_ref() {
        return f(&journal.store);
    }

    let path = resolve_default_db_path();
    let store = JournalStore::open(&path).map_err(describe)?;
    info!("event=journal_open module=ffi status=ok source=default");
    let journal = slot.insert(OpenJournal { path, store });
    f(&journal.store)
}

fn open_journal_at(path: PathBuf) -> CallResult<String> {
    let mut slot = JOURNAL
        .lock()
        .map_err(|_| "journal store lock poisoned".to_string())?;
    if slot.as_ref().is_some_and(|journal| journal.path == path) {
        return Ok("Journal already open.".to_string());
    }

    let store = JournalStore::open(&path).map_err(describe)?;
    if let Some(previous) = slot.replace(OpenJournal { path, store }) {
        if let Err(err) = previous.store.close() {
            warn!("event=journal_close module=ffi status=error error={err}");
        }
    }
    info!("event=journal_open module=ffi status=ok source=explicit");
    Ok("Journal opened.".to_string())
}

fn resolve_default_db_path() -> PathBuf {
    DEFAULT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("JOURNAL_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(JOURNAL_DB_FILE_NAME)
        })
        .clone()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn month_window(year: i32, month: u32) -> CallResult<MonthWindow> {
    MonthWindow::new(year, month).ok_or_else(|| format!("invalid month {year}-{month}"))
}

/// Month grid context; `today` is only highlighted when it falls inside.
fn month_context(year: i32, month: u32) -> CallResult<MonthContext> {
    Ok(MonthContext {
        month: month_window(year, month)?,
        today: today(),
    })
}

fn parse_day_arg(raw: &str) -> CallResult<NaiveDate> {
    parse_day(raw.trim()).ok_or_else(|| format!("invalid day `{raw}`; expected YYYY-MM-DD"))
}

fn parse_color_arg(raw: &str) -> CallResult<Color> {
    Color::parse(raw).ok_or_else(|| format!("unknown color `{raw}`"))
}

fn describe(err: impl Display) -> String {
    err.to_string()
}

fn day_label(day: NaiveDate) -> String {
    journal_core::day_to_db(day)
}

fn to_event_item(event: &Stored<CalendarEvent>) -> EventItem {
    EventItem {
        id: event.id,
        day: day_label(event.day),
        title: event.title.clone(),
        color: event.color.as_str().to_string(),
    }
}

fn to_calendar_view(model: &CalendarMonth) -> CalendarMonthView {
    CalendarMonthView {
        year: model.window.year(),
        month: model.window.month(),
        leading_blanks: model.leading_blanks,
        days: model
            .days
            .iter()
            .map(|cell| CalendarDayItem {
                day: day_label(cell.day),
                is_today: cell.is_today,
                events: cell.events.iter().map(to_event_item).collect(),
            })
            .collect(),
    }
}

fn to_habit_item(row: &HabitRow) -> HabitItem {
    HabitItem {
        id: row.habit.id,
        name: row.habit.name.clone(),
        color: row.habit.color.as_str().to_string(),
        frequency: row.habit.frequency.clone(),
        completed_days: row.completed_days.iter().copied().map(day_label).collect(),
        percentage: row.percentage,
        tier: row.tier.as_str().to_string(),
    }
}

fn to_habit_view(model: &HabitBoard) -> HabitBoardView {
    HabitBoardView {
        year: model.window.year(),
        month: model.window.month(),
        today: day_label(model.today),
        days_in_month: model.window.days_in_month(),
        habits: model.rows.iter().map(to_habit_item).collect(),
    }
}

fn to_ledger_item(entry: &Stored<LedgerEntry>) -> LedgerItem {
    LedgerItem {
        id: entry.id,
        day: day_label(entry.day),
        amount: entry.amount,
        category: entry.category.clone(),
        description: entry.description.clone(),
        kind: entry.kind.as_str().to_string(),
    }
}

fn to_ledger_view(model: &MonthLedger) -> LedgerMonthView {
    LedgerMonthView {
        year: model.window.year(),
        month: model.window.month(),
        entries: model.entries.iter().map(to_ledger_item).collect(),
        income: model.totals.income,
        expense: model.totals.expense,
        balance: model.totals.balance,
    }
}

fn to_diary_item(entry: &Stored<DiaryEntry>) -> DiaryItem {
    DiaryItem {
        id: entry.id,
        day: day_label(entry.day),
        content: entry.content.clone(),
        mood: entry.mood.as_str().to_string(),
        preview: entry.preview(),
    }
}

fn history_item(item: &DiaryHistoryItem) -> DiaryItem {
    DiaryItem {
        id: item.id,
        day: day_label(item.day),
        content: item.content.clone(),
        mood: item.mood.as_str().to_string(),
        preview: item.preview.clone(),
    }
}

fn to_diary_view(model: &DiaryPage) -> DiaryView {
    DiaryView {
        today: day_label(model.today),
        today_entry: model.today_entry.as_ref().map(to_diary_item),
        history: model.history.iter().map(history_item).collect(),
    }
}

fn to_dashboard_view(model: &DashboardSummary) -> DashboardView {
    DashboardView {
        today: day_label(model.today),
        events_today: model.events_today.iter().map(to_event_item).collect(),
        habits_total: u32::try_from(model.habits_total).unwrap_or(u32::MAX),
        habits_completed_today: u32::try_from(model.habits_completed_today).unwrap_or(u32::MAX),
        habit_progress: model.habit_progress(),
        monthly_balance: model.monthly_balance,
        mood_today: model.mood_today.map(|mood| mood.as_str().to_string()),
    }
}
