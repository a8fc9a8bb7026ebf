//! Diary use-cases.
//!
//! # Responsibility
//! - Save today's entry with read-before-write upsert semantics.
//! - Provide the history list and today's mood.
//!
//! # Invariants
//! - Saving twice for one day leaves exactly one row, holding the latest
//!   content and mood.

use crate::model::diary::DiaryEntry;
use crate::model::tags::Mood;
use crate::model::{RecordId, Stored};
use crate::repo::collection::{day_value, DiaryColumn};
use crate::repo::store::{JournalStore, RepoResult};
use crate::service::error::ServiceResult;
use chrono::NaiveDate;
use log::info;
use rusqlite::types::Value;
use serde::Serialize;
use std::cmp::Reverse;

/// Collapsed history line for a past entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiaryHistoryItem {
    pub id: RecordId,
    pub day: NaiveDate,
    pub mood: Mood,
    pub preview: String,
    pub content: String,
}

/// Derived view of the diary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiaryPage {
    pub today: NaiveDate,
    pub today_entry: Option<Stored<DiaryEntry>>,
    /// Every other entry, newest day first.
    pub history: Vec<DiaryHistoryItem>,
}

pub struct DiaryService<'s> {
    store: &'s JournalStore,
}

impl<'s> DiaryService<'s> {
    pub fn new(store: &'s JournalStore) -> Self {
        Self { store }
    }

    pub fn page(&self, today: NaiveDate) -> RepoResult<DiaryPage> {
        Ok(DiaryPage {
            today,
            today_entry: self.entry_for(today)?,
            history: self.history(today)?,
        })
    }

    pub fn entry_for(&self, day: NaiveDate) -> RepoResult<Option<Stored<DiaryEntry>>> {
        Ok(self
            .store
            .query_by_equality::<DiaryEntry>(DiaryColumn::Day, day_value(day))?
            .into_iter()
            .next())
    }

    /// Writes the entry for `day`, updating content and mood in place when
    /// one already exists. Returns the id of the stored row.
    pub fn save_entry(&self, day: NaiveDate, content: &str, mood: Mood) -> ServiceResult<RecordId> {
        let entry = DiaryEntry::new(day, content, mood);
        entry.validate()?;

        let id = match self.entry_for(day)? {
            Some(existing) => {
                self.store.patch::<DiaryEntry>(
                    existing.id,
                    vec![
                        (DiaryColumn::Content, Value::Text(entry.content)),
                        (DiaryColumn::Mood, Value::Text(mood.as_str().to_string())),
                    ],
                )?;
                existing.id
            }
            None => self.store.insert(&entry)?,
        };
        info!(
            "event=diary_save module=service status=ok id={id} mood={}",
            mood.as_str()
        );
        Ok(id)
    }

    /// All entries except `today`'s, newest day first.
    pub fn history(&self, today: NaiveDate) -> RepoResult<Vec<DiaryHistoryItem>> {
        let mut entries = self.store.list_all::<DiaryEntry>()?;
        entries.retain(|entry| entry.day != today);
        entries.sort_by_key(|entry| Reverse(entry.day));
        Ok(entries
            .into_iter()
            .map(|entry| DiaryHistoryItem {
                id: entry.id,
                day: entry.day,
                mood: entry.mood,
                preview: entry.preview(),
                content: entry.record.content,
            })
            .collect())
    }

    pub fn todays_mood(&self, today: NaiveDate) -> RepoResult<Option<Mood>> {
        Ok(self.entry_for(today)?.map(|entry| entry.mood))
    }

    pub fn delete_entry(&self, id: RecordId) -> RepoResult<()> {
        self.store.delete::<DiaryEntry>(id)
    }
}
