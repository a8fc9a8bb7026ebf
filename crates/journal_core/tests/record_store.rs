use chrono::NaiveDate;
use journal_core::{
    day_value, CalendarEvent, Color, CompletionColumn, DiaryColumn, DiaryEntry, EntryKind,
    EventColumn, Habit, HabitCompletion, JournalStore, LedgerEntry, Mood, RepoError, Stored,
};
use rusqlite::types::Value;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn inserted_record_reads_back_with_assigned_id() {
    let store = JournalStore::open_in_memory().unwrap();

    let entry = LedgerEntry::new(date(2024, 6, 3), 42.5, "books", EntryKind::Expense)
        .with_description("paperbacks");
    let id = store.insert(&entry).unwrap();

    let loaded = store.get_by_id::<LedgerEntry>(id).unwrap().unwrap();
    assert_eq!(loaded, Stored::new(id, entry));
}

#[test]
fn ids_increase_and_are_never_reused() {
    let store = JournalStore::open_in_memory().unwrap();

    let first = store.insert(&Habit::new("read", Color::Blue)).unwrap();
    let second = store.insert(&Habit::new("run", Color::Red)).unwrap();
    assert!(second > first);

    store.delete::<Habit>(second).unwrap();
    let third = store.insert(&Habit::new("stretch", Color::Green)).unwrap();
    assert!(third > second);
}

#[test]
fn get_by_id_returns_none_for_missing_record() {
    let store = JournalStore::open_in_memory().unwrap();
    assert!(store.get_by_id::<CalendarEvent>(99).unwrap().is_none());
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let store = JournalStore::open_in_memory().unwrap();
    for day in [
        date(2024, 2, 29),
        date(2024, 3, 1),
        date(2024, 3, 15),
        date(2024, 3, 31),
        date(2024, 4, 1),
    ] {
        store
            .insert(&CalendarEvent::new(day, "marker", Color::Amber))
            .unwrap();
    }

    let march = store
        .query_by_date_range::<CalendarEvent>(date(2024, 3, 1), date(2024, 3, 31))
        .unwrap();
    let days: Vec<NaiveDate> = march.iter().map(|event| event.day).collect();
    assert_eq!(
        days,
        vec![date(2024, 3, 1), date(2024, 3, 15), date(2024, 3, 31)]
    );

    let single_day = store
        .query_by_date_range::<CalendarEvent>(date(2024, 3, 15), date(2024, 3, 15))
        .unwrap();
    assert_eq!(single_day.len(), 1);

    let reversed = store
        .query_by_date_range::<CalendarEvent>(date(2024, 3, 31), date(2024, 3, 1))
        .unwrap();
    assert!(reversed.is_empty());
}

#[test]
fn events_on_the_same_day_all_persist() {
    let store = JournalStore::open_in_memory().unwrap();
    let day = date(2024, 5, 5);
    let a = store
        .insert(&CalendarEvent::new(day, "brunch", Color::Pink))
        .unwrap();
    let b = store
        .insert(&CalendarEvent::new(day, "cinema", Color::Purple))
        .unwrap();

    let found = store
        .query_by_date_range::<CalendarEvent>(date(2024, 5, 1), date(2024, 5, 31))
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|event| event.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn equality_query_matches_exact_column_value() {
    let store = JournalStore::open_in_memory().unwrap();
    store
        .insert(&CalendarEvent::new(date(2024, 1, 1), "party", Color::Red))
        .unwrap();
    store
        .insert(&CalendarEvent::new(date(2024, 1, 2), "rest", Color::Blue))
        .unwrap();

    let red = store
        .query_by_equality::<CalendarEvent>(EventColumn::Color, "red".to_string())
        .unwrap();
    assert_eq!(red.len(), 1);
    assert_eq!(red[0].title, "party");

    let on_second = store
        .query_by_equality::<CalendarEvent>(EventColumn::Day, day_value(date(2024, 1, 2)))
        .unwrap();
    assert_eq!(on_second.len(), 1);
    assert_eq!(on_second[0].title, "rest");
}

#[test]
fn update_replaces_all_fields_and_reports_missing_ids() {
    let store = JournalStore::open_in_memory().unwrap();
    let id = store
        .insert(&CalendarEvent::new(date(2024, 1, 1), "draft", Color::Red))
        .unwrap();

    let replacement = CalendarEvent::new(date(2024, 1, 9), "final", Color::Green);
    store.update(id, &replacement).unwrap();
    let loaded = store.get_by_id::<CalendarEvent>(id).unwrap().unwrap();
    assert_eq!(loaded.record, replacement);

    let err = store.update(id + 100, &replacement).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { collection: "calendar_event", id: missing } if missing == id + 100
    ));
}

#[test]
fn patch_changes_only_named_columns() {
    let store = JournalStore::open_in_memory().unwrap();
    let day = date(2024, 8, 8);
    let id = store
        .insert(&DiaryEntry::new(day, "morning", Mood::Neutral))
        .unwrap();

    store
        .patch::<DiaryEntry>(id, vec![(DiaryColumn::Mood, Value::Text("excellent".into()))])
        .unwrap();

    let loaded = store.get_by_id::<DiaryEntry>(id).unwrap().unwrap();
    assert_eq!(loaded.day, day);
    assert_eq!(loaded.content, "morning");
    assert_eq!(loaded.mood, Mood::Excellent);

    let err = store.patch::<DiaryEntry>(id + 1, Vec::new()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn delete_is_idempotent() {
    let store = JournalStore::open_in_memory().unwrap();
    let id = store
        .insert(&CalendarEvent::new(date(2024, 1, 1), "once", Color::Red))
        .unwrap();

    store.delete::<CalendarEvent>(id).unwrap();
    store.delete::<CalendarEvent>(id).unwrap();
    store.delete::<CalendarEvent>(12_345).unwrap();
    assert!(store.get_by_id::<CalendarEvent>(id).unwrap().is_none());
}

#[test]
fn duplicate_completion_and_diary_day_are_conflicts() {
    let store = JournalStore::open_in_memory().unwrap();
    let day = date(2024, 4, 4);
    let habit = store.insert(&Habit::new("water", Color::Blue)).unwrap();

    store.insert(&HabitCompletion::on(habit, day)).unwrap();
    let err = store.insert(&HabitCompletion::on(habit, day)).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    store
        .insert(&DiaryEntry::new(day, "one", Mood::Good))
        .unwrap();
    let err = store
        .insert(&DiaryEntry::new(day, "two", Mood::Bad))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[test]
fn completion_for_unknown_habit_is_a_conflict() {
    let store = JournalStore::open_in_memory().unwrap();
    let err = store
        .insert(&HabitCompletion::on(404, date(2024, 4, 4)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[test]
fn habit_cascade_removes_every_completion() {
    let store = JournalStore::open_in_memory().unwrap();
    let doomed = store.insert(&Habit::new("smoke-free", Color::Red)).unwrap();
    let kept = store.insert(&Habit::new("journal", Color::Amber)).unwrap();
    for day in 1..=3 {
        store
            .insert(&HabitCompletion::on(doomed, date(2024, 7, day)))
            .unwrap();
    }
    store
        .insert(&HabitCompletion::on(kept, date(2024, 7, 1)))
        .unwrap();

    let removed = store.delete_habit_cascade(doomed).unwrap();
    assert_eq!(removed, 3);

    assert!(store.get_by_id::<Habit>(doomed).unwrap().is_none());
    let orphans = store
        .query_by_equality::<HabitCompletion>(CompletionColumn::HabitId, doomed)
        .unwrap();
    assert!(orphans.is_empty());
    let survivors = store
        .query_by_equality::<HabitCompletion>(CompletionColumn::HabitId, kept)
        .unwrap();
    assert_eq!(survivors.len(), 1);

    assert_eq!(store.delete_habit_cascade(doomed).unwrap(), 0);
}

#[test]
fn file_store_survives_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.sqlite3");

    let store = JournalStore::open(&path).unwrap();
    let id = store
        .insert(&DiaryEntry::new(date(2024, 9, 9), "kept", Mood::Good))
        .unwrap();
    store.close().unwrap();

    let reopened = JournalStore::open(&path).unwrap();
    let loaded = reopened.get_by_id::<DiaryEntry>(id).unwrap().unwrap();
    assert_eq!(loaded.content, "kept");
    assert_eq!(reopened.count::<DiaryEntry>().unwrap(), 1);
}
