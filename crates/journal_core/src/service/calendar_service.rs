//! Calendar page use-cases.
//!
//! # Invariants
//! - Month views contain exactly the events dated inside the window.
//! - Titles are stored trimmed; blank titles never reach the store.

use crate::model::calendar::MonthWindow;
use crate::model::event::CalendarEvent;
use crate::model::tags::Color;
use crate::model::{RecordId, Stored};
use crate::repo::collection::{day_value, EventColumn};
use crate::repo::store::{JournalStore, RepoResult};
use crate::service::error::ServiceResult;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: NaiveDate,
    pub is_today: bool,
    pub events: Vec<Stored<CalendarEvent>>,
}

/// Derived view of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub window: MonthWindow,
    pub today: NaiveDate,
    /// Empty cells before day 1 in a Monday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    pub fn day(&self, day: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|cell| cell.day == day)
    }

    pub fn event_count(&self) -> usize {
        self.days.iter().map(|cell| cell.events.len()).sum()
    }
}

pub struct CalendarService<'s> {
    store: &'s JournalStore,
}

impl<'s> CalendarService<'s> {
    pub fn new(store: &'s JournalStore) -> Self {
        Self { store }
    }

    /// Loads the month grid with each day's events in insertion order.
    pub fn month_view(&self, window: MonthWindow, today: NaiveDate) -> RepoResult<CalendarMonth> {
        let events = self
            .store
            .query_by_date_range::<CalendarEvent>(window.first_day(), window.last_day())?;

        let days = window
            .days()
            .map(|day| CalendarDay {
                day,
                is_today: day == today,
                events: events
                    .iter()
                    .filter(|event| event.day == day)
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(CalendarMonth {
            window,
            today,
            leading_blanks: window.leading_blanks(),
            days,
        })
    }

    pub fn events_on(&self, day: NaiveDate) -> RepoResult<Vec<Stored<CalendarEvent>>> {
        self.store
            .query_by_equality::<CalendarEvent>(EventColumn::Day, day_value(day))
    }

    pub fn add_event(
        &self,
        day: NaiveDate,
        title: &str,
        color: Color,
    ) -> ServiceResult<RecordId> {
        let event = CalendarEvent::new(day, title.trim(), color);
        event.validate()?;
        let id = self.store.insert(&event)?;
        info!("event=calendar_add module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces an event's day, title and color.
    pub fn update_event(&self, id: RecordId, event: &CalendarEvent) -> ServiceResult<()> {
        let event = CalendarEvent::new(event.day, event.title.trim(), event.color);
        event.validate()?;
        self.store.update(id, &event)?;
        Ok(())
    }

    pub fn delete_event(&self, id: RecordId) -> RepoResult<()> {
        self.store.delete::<CalendarEvent>(id)
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarService;
    use crate::model::calendar::MonthWindow;
    use crate::model::tags::Color;
    use crate::repo::store::JournalStore;
    use crate::service::error::ServiceError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_view_places_events_on_their_days() {
        let store = JournalStore::open_in_memory().unwrap();
        let service = CalendarService::new(&store);
        service
            .add_event(date(2024, 9, 3), "dentist", Color::Red)
            .unwrap();
        service
            .add_event(date(2024, 9, 3), "  gym  ", Color::Green)
            .unwrap();
        service
            .add_event(date(2024, 10, 1), "next month", Color::Blue)
            .unwrap();

        let window = MonthWindow::new(2024, 9).unwrap();
        let month = service.month_view(window, date(2024, 9, 10)).unwrap();

        assert_eq!(month.days.len(), 30);
        assert_eq!(month.leading_blanks, 6);
        assert_eq!(month.event_count(), 2);
        let third = month.day(date(2024, 9, 3)).unwrap();
        assert_eq!(third.events[0].title, "dentist");
        assert_eq!(third.events[1].title, "gym");
        assert!(month.day(date(2024, 9, 10)).unwrap().is_today);
    }

    #[test]
    fn blank_title_is_rejected_without_writing() {
        let store = JournalStore::open_in_memory().unwrap();
        let service = CalendarService::new(&store);

        let err = service
            .add_event(date(2024, 9, 3), "   ", Color::Red)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.events_on(date(2024, 9, 3)).unwrap().is_empty());
    }
}
