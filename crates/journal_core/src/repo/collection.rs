//! Per-collection schema bindings.
//!
//! # Responsibility
//! - Map each record type to its table, columns and row codec.
//! - Keep column names typed so equality queries cannot name a column the
//!   collection does not have.
//!
//! # Invariants
//! - `COLUMNS` lists data columns in bind order and never includes `id`.
//! - Row decoding rejects unknown tag values instead of masking them.

use crate::model::calendar::{day_to_db, parse_day};
use crate::model::diary::DiaryEntry;
use crate::model::event::CalendarEvent;
use crate::model::habit::{Habit, HabitCompletion};
use crate::model::ledger::LedgerEntry;
use crate::model::tags::{Color, EntryKind, Mood};
use crate::repo::store::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;

/// A typed column of one collection.
pub trait ColumnName: Copy {
    fn name(self) -> &'static str;
}

/// A record type persisted in its own table.
pub trait Collection: Sized {
    /// Label used in errors and log events.
    const NAME: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    type Column: ColumnName;

    /// Values for `COLUMNS`, in the same order.
    fn to_values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Collections indexed by a `day` column and queried by date range.
pub trait Dated: Collection {}

pub(crate) const DAY_COLUMN: &str = "day";

/// Converts a day into the value stored in `day` columns.
pub fn day_value(day: NaiveDate) -> Value {
    Value::Text(day_to_db(day))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColumn {
    Day,
    Title,
    Color,
}

impl ColumnName for EventColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Day => DAY_COLUMN,
            Self::Title => "title",
            Self::Color => "color",
        }
    }
}

impl Collection for CalendarEvent {
    const NAME: &'static str = "calendar_event";
    const TABLE: &'static str = "calendar_events";
    const COLUMNS: &'static [&'static str] = &[DAY_COLUMN, "title", "color"];

    type Column = EventColumn;

    fn to_values(&self) -> Vec<Value> {
        vec![
            day_value(self.day),
            Value::Text(self.title.clone()),
            Value::Text(self.color.as_str().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            day: read_day(row, Self::TABLE)?,
            title: row.get("title")?,
            color: read_color(row, Self::TABLE)?,
        })
    }
}

impl Dated for CalendarEvent {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitColumn {
    Name,
    Color,
    Frequency,
}

impl ColumnName for HabitColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Color => "color",
            Self::Frequency => "frequency",
        }
    }
}

impl Collection for Habit {
    const NAME: &'static str = "habit";
    const TABLE: &'static str = "habits";
    const COLUMNS: &'static [&'static str] = &["name", "color", "frequency"];

    type Column = HabitColumn;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.color.as_str().to_string()),
            self.frequency.clone().map_or(Value::Null, Value::Text),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            name: row.get("name")?,
            color: read_color(row, Self::TABLE)?,
            frequency: row.get("frequency")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionColumn {
    HabitId,
    Day,
    Completed,
}

impl ColumnName for CompletionColumn {
    fn name(self) -> &'static str {
        match self {
            Self::HabitId => "habit_id",
            Self::Day => DAY_COLUMN,
            Self::Completed => "completed",
        }
    }
}

impl Collection for HabitCompletion {
    const NAME: &'static str = "habit_completion";
    const TABLE: &'static str = "habit_completions";
    const COLUMNS: &'static [&'static str] = &["habit_id", DAY_COLUMN, "completed"];

    type Column = CompletionColumn;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.habit_id),
            day_value(self.day),
            Value::Integer(i64::from(self.completed)),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let completed = match row.get::<_, i64>("completed")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid completed value `{other}` in habit_completions.completed"
                )));
            }
        };
        Ok(Self {
            habit_id: row.get("habit_id")?,
            day: read_day(row, Self::TABLE)?,
            completed,
        })
    }
}

impl Dated for HabitCompletion {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerColumn {
    Day,
    Amount,
    Category,
    Description,
    Kind,
}

impl ColumnName for LedgerColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Day => DAY_COLUMN,
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Description => "description",
            Self::Kind => "kind",
        }
    }
}

impl Collection for LedgerEntry {
    const NAME: &'static str = "ledger_entry";
    const TABLE: &'static str = "ledger_entries";
    const COLUMNS: &'static [&'static str] =
        &[DAY_COLUMN, "amount", "category", "description", "kind"];

    type Column = LedgerColumn;

    fn to_values(&self) -> Vec<Value> {
        vec![
            day_value(self.day),
            Value::Real(self.amount),
            Value::Text(self.category.clone()),
            self.description.clone().map_or(Value::Null, Value::Text),
            Value::Text(self.kind.as_str().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let kind_text: String = row.get("kind")?;
        let kind = EntryKind::parse(&kind_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid entry kind `{kind_text}` in ledger_entries.kind"
            ))
        })?;
        Ok(Self {
            day: read_day(row, Self::TABLE)?,
            amount: row.get("amount")?,
            category: row.get("category")?,
            description: row.get("description")?,
            kind,
        })
    }
}

impl Dated for LedgerEntry {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryColumn {
    Day,
    Content,
    Mood,
}

impl ColumnName for DiaryColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Day => DAY_COLUMN,
            Self::Content => "content",
            Self::Mood => "mood",
        }
    }
}

impl Collection for DiaryEntry {
    const NAME: &'static str = "diary_entry";
    const TABLE: &'static str = "diary_entries";
    const COLUMNS: &'static [&'static str] = &[DAY_COLUMN, "content", "mood"];

    type Column = DiaryColumn;

    fn to_values(&self) -> Vec<Value> {
        vec![
            day_value(self.day),
            Value::Text(self.content.clone()),
            Value::Text(self.mood.as_str().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let mood_text: String = row.get("mood")?;
        let mood = Mood::parse(&mood_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid mood `{mood_text}` in diary_entries.mood"))
        })?;
        Ok(Self {
            day: read_day(row, Self::TABLE)?,
            content: row.get("content")?,
            mood,
        })
    }
}

impl Dated for DiaryEntry {}

fn read_day(row: &Row<'_>, table: &str) -> RepoResult<NaiveDate> {
    let text: String = row.get(DAY_COLUMN)?;
    parse_day(&text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid day `{text}` in {table}.day")))
}

fn read_color(row: &Row<'_>, table: &str) -> RepoResult<Color> {
    let text: String = row.get("color")?;
    Color::parse(&text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid color `{text}` in {table}.color")))
}
