//! Calendar event record.

use crate::model::tags::Color;
use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A titled, colored marker on one calendar day.
///
/// Any number of events may share a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub day: NaiveDate,
    pub title: String,
    pub color: Color,
}

impl CalendarEvent {
    pub fn new(day: NaiveDate, title: impl Into<String>, color: Color) -> Self {
        Self {
            day,
            title: title.into(),
            color,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}
