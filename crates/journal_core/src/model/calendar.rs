//! Month arithmetic for page windows.
//!
//! # Invariants
//! - A `MonthWindow` always starts on day 1 of a valid month.
//! - `first_day()..=last_day()` covers exactly `days_in_month()` days.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// ISO `YYYY-MM-DD` format used for storage and range comparison.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Formats a day as its stored ISO string.
pub fn day_to_db(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses a stored ISO day string.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok()
}

/// One calendar month, used as the visible window of monthly pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthWindow {
    first: NaiveDate,
}

impl MonthWindow {
    /// Returns `None` when `month` is outside `1..=12` or the year is out of
    /// the supported date range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month a given day falls in.
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            first: day - Days::new(u64::from(day.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first + Days::new(u64::from(self.days_in_month() - 1))
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            // December of the last representable year.
            None => 31,
        }
    }

    /// Day `n` (1-based) of this month.
    pub fn day(&self, n: u32) -> Option<NaiveDate> {
        if n == 0 || n > self.days_in_month() {
            return None;
        }
        self.first.with_day(n)
    }

    /// Every day of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days_in_month() as usize)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.first <= day && day <= self.last_day()
    }

    /// Empty cells before day 1 in a Monday-first week grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_monday()
    }

    pub fn previous(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }
}

impl Display for MonthWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[cfg(test)]
mod tests {
    use super::{day_to_db, parse_day, MonthWindow};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let feb = MonthWindow::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert_eq!(feb.days().count(), 29);

        let feb_common = MonthWindow::new(2023, 2).unwrap();
        assert_eq!(feb_common.days_in_month(), 28);
        assert_eq!(MonthWindow::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthWindow::new(2000, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn month_lengths_follow_the_calendar() {
        let lengths = (1..=12)
            .map(|month| MonthWindow::new(2023, month).unwrap().days_in_month())
            .collect::<Vec<_>>();
        assert_eq!(lengths, vec![31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);

        let last = MonthWindow::containing(NaiveDate::MAX);
        assert_eq!(last.days_in_month(), 31);
        assert_eq!(last.last_day(), NaiveDate::MAX);
        assert_eq!(last.next(), None);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(MonthWindow::new(2024, 0).is_none());
        assert!(MonthWindow::new(2024, 13).is_none());
    }

    #[test]
    fn containing_snaps_to_first_day() {
        let window = MonthWindow::containing(date(2024, 7, 19));
        assert_eq!(window, MonthWindow::new(2024, 7).unwrap());
        assert!(window.contains(date(2024, 7, 31)));
        assert!(!window.contains(date(2024, 8, 1)));
        assert!(!window.contains(date(2024, 6, 30)));
    }

    #[test]
    fn navigation_crosses_year_boundaries() {
        let january = MonthWindow::new(2025, 1).unwrap();
        assert_eq!(january.previous(), MonthWindow::new(2024, 12));
        assert_eq!(MonthWindow::new(2024, 12).unwrap().next(), Some(january));
    }

    #[test]
    fn leading_blanks_follow_monday_first_grid() {
        // 2024-09-01 is a Sunday, 2024-07-01 a Monday.
        assert_eq!(MonthWindow::new(2024, 9).unwrap().leading_blanks(), 6);
        assert_eq!(MonthWindow::new(2024, 7).unwrap().leading_blanks(), 0);
    }

    #[test]
    fn day_lookup_is_one_based_and_bounded() {
        let april = MonthWindow::new(2024, 4).unwrap();
        assert_eq!(april.day(1), Some(date(2024, 4, 1)));
        assert_eq!(april.day(30), Some(date(2024, 4, 30)));
        assert_eq!(april.day(31), None);
        assert_eq!(april.day(0), None);
    }

    #[test]
    fn stored_day_format_is_iso() {
        assert_eq!(day_to_db(date(2024, 3, 5)), "2024-03-05");
        assert_eq!(parse_day("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_day("05/03/2024"), None);
        assert_eq!(MonthWindow::new(2024, 3).unwrap().to_string(), "2024-03");
    }
}
