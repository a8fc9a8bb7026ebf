//! Habit and habit-completion records.
//!
//! # Invariants
//! - A completion row exists only while the habit/day pair is completed;
//!   un-completing deletes the row.
//! - At most one completion exists per `(habit_id, day)`.
//! - Completions never outlive their habit.

use crate::model::tags::Color;
use crate::model::validation::{require_text, ValidationError};
use crate::model::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub color: Color,
    /// Free-form cadence label. Stored for display only; nothing enforces it.
    pub frequency: Option<String>,
}

impl Habit {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            frequency: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// Marks one habit as done on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub habit_id: RecordId,
    pub day: NaiveDate,
    /// Always `true` for stored rows; absence of a row means not completed.
    pub completed: bool,
}

impl HabitCompletion {
    pub fn on(habit_id: RecordId, day: NaiveDate) -> Self {
        Self {
            habit_id,
            day,
            completed: true,
        }
    }
}

/// Share of days in a month on which a habit was completed, as a whole
/// percentage. Halves round up.
pub fn completion_percentage(completed_days: usize, days_in_month: u32) -> u32 {
    if days_in_month == 0 {
        return 0;
    }
    let completed = completed_days as u64;
    let days = u64::from(days_in_month);
    ((200 * completed + days) / (2 * days)) as u32
}

/// Coarse progress band shown next to each habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    /// 70% or more.
    Strong,
    /// 40% to 69%.
    Steady,
    Low,
}

impl ProgressTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            70.. => Self::Strong,
            40..=69 => Self::Steady,
            _ => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Steady => "steady",
            Self::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{completion_percentage, ProgressTier};

    #[test]
    fn percentage_rounds_to_nearest_whole() {
        assert_eq!(completion_percentage(3, 30), 10);
        assert_eq!(completion_percentage(1, 31), 3);
        assert_eq!(completion_percentage(2, 31), 6);
        assert_eq!(completion_percentage(30, 30), 100);
        assert_eq!(completion_percentage(0, 28), 0);
    }

    #[test]
    fn percentage_rounds_halves_up() {
        // 100 * 1 / 8 = 12.5
        assert_eq!(completion_percentage(1, 8), 13);
        // 100 * 3 / 8 = 37.5
        assert_eq!(completion_percentage(3, 8), 38);
    }

    #[test]
    fn tiers_split_at_forty_and_seventy() {
        assert_eq!(ProgressTier::from_percentage(100), ProgressTier::Strong);
        assert_eq!(ProgressTier::from_percentage(70), ProgressTier::Strong);
        assert_eq!(ProgressTier::from_percentage(69), ProgressTier::Steady);
        assert_eq!(ProgressTier::from_percentage(40), ProgressTier::Steady);
        assert_eq!(ProgressTier::from_percentage(39), ProgressTier::Low);
    }
}
