//! Habit tracker use-cases.
//!
//! # Responsibility
//! - Build the monthly habit board (completion grid and percentages).
//! - Toggle completion by presence: delete the row if present, else insert.
//! - Delete habits together with their completions.
//!
//! # Invariants
//! - Toggling the same habit/day twice restores the original state.
//! - Completions are never written for a habit that does not exist.

use crate::model::calendar::MonthWindow;
use crate::model::habit::{completion_percentage, Habit, HabitCompletion, ProgressTier};
use crate::model::tags::Color;
use crate::model::{RecordId, Stored};
use crate::repo::collection::{Collection, CompletionColumn};
use crate::repo::store::{JournalStore, RepoResult};
use crate::service::error::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;

/// One habit's line on the monthly board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitRow {
    pub habit: Stored<Habit>,
    pub completed_days: BTreeSet<NaiveDate>,
    pub percentage: u32,
    pub tier: ProgressTier,
}

impl HabitRow {
    pub fn is_completed(&self, day: NaiveDate) -> bool {
        self.completed_days.contains(&day)
    }
}

/// Derived view of every habit over one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitBoard {
    pub window: MonthWindow,
    pub today: NaiveDate,
    pub rows: Vec<HabitRow>,
}

impl HabitBoard {
    pub fn row(&self, habit_id: RecordId) -> Option<&HabitRow> {
        self.rows.iter().find(|row| row.habit.id == habit_id)
    }
}

pub struct HabitService<'s> {
    store: &'s JournalStore,
}

impl<'s> HabitService<'s> {
    pub fn new(store: &'s JournalStore) -> Self {
        Self { store }
    }

    pub fn list_habits(&self) -> RepoResult<Vec<Stored<Habit>>> {
        self.store.list_all::<Habit>()
    }

    pub fn month_board(&self, window: MonthWindow, today: NaiveDate) -> RepoResult<HabitBoard> {
        let habits = self.store.list_all::<Habit>()?;
        let completions = self
            .store
            .query_by_date_range::<HabitCompletion>(window.first_day(), window.last_day())?;

        let rows = habits
            .into_iter()
            .map(|habit| {
                let completed_days = completions
                    .iter()
                    .filter(|completion| completion.habit_id == habit.id)
                    .map(|completion| completion.day)
                    .collect::<BTreeSet<_>>();
                let percentage =
                    completion_percentage(completed_days.len(), window.days_in_month());
                HabitRow {
                    habit,
                    completed_days,
                    percentage,
                    tier: ProgressTier::from_percentage(percentage),
                }
            })
            .collect();

        Ok(HabitBoard {
            window,
            today,
            rows,
        })
    }

    pub fn add_habit(&self, name: &str, color: Color) -> ServiceResult<RecordId> {
        let habit = Habit::new(name.trim(), color);
        habit.validate()?;
        let id = self.store.insert(&habit)?;
        info!("event=habit_add module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces a habit's name, color and frequency label.
    pub fn update_habit(&self, id: RecordId, habit: &Habit) -> ServiceResult<()> {
        let habit = Habit {
            name: habit.name.trim().to_string(),
            ..habit.clone()
        };
        habit.validate()?;
        self.store.update(id, &habit)?;
        Ok(())
    }

    /// Deletes a habit and every completion recorded for it.
    pub fn delete_habit(&self, id: RecordId) -> RepoResult<()> {
        self.store.delete_habit_cascade(id)?;
        Ok(())
    }

    /// Flips completion for one habit on one day and returns the new state.
    pub fn toggle(&self, habit_id: RecordId, day: NaiveDate) -> ServiceResult<bool> {
        if self.store.get_by_id::<Habit>(habit_id)?.is_none() {
            return Err(ServiceError::NotFound {
                collection: Habit::NAME,
                id: habit_id,
            });
        }

        let completed = match self.find_completion(habit_id, day)? {
            Some(existing) => {
                self.store.delete::<HabitCompletion>(existing.id)?;
                false
            }
            None => {
                self.store.insert(&HabitCompletion::on(habit_id, day))?;
                true
            }
        };
        info!(
            "event=habit_toggle module=service status=ok habit_id={habit_id} completed={completed}"
        );
        Ok(completed)
    }

    pub fn is_completed(&self, habit_id: RecordId, day: NaiveDate) -> RepoResult<bool> {
        Ok(self.find_completion(habit_id, day)?.is_some())
    }

    pub fn completion_percentage(&self, habit_id: RecordId, window: MonthWindow) -> RepoResult<u32> {
        let completed = self
            .store
            .query_by_date_range::<HabitCompletion>(window.first_day(), window.last_day())?
            .iter()
            .filter(|completion| completion.habit_id == habit_id)
            .count();
        Ok(completion_percentage(completed, window.days_in_month()))
    }

    fn find_completion(
        &self,
        habit_id: RecordId,
        day: NaiveDate,
    ) -> RepoResult<Option<Stored<HabitCompletion>>> {
        Ok(self
            .store
            .query_by_equality::<HabitCompletion>(CompletionColumn::HabitId, habit_id)?
            .into_iter()
            .find(|completion| completion.day == day))
    }
}
