//! Typed journal records.
//!
//! # Responsibility
//! - Define the five record shapes persisted by the store.
//! - Provide the month arithmetic every page window is built on.
//!
//! # Invariants
//! - Records never carry their own id; ids live on [`Stored`] and are
//!   assigned by the store.
//! - Days are calendar dates without time or timezone.

use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod diary;
pub mod event;
pub mod habit;
pub mod ledger;
pub mod tags;
pub mod validation;

/// Store-assigned identity, unique per collection and never reused.
pub type RecordId = i64;

/// A record as read back from the store, paired with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: RecordId, record: T) -> Self {
        Self { id, record }
    }
}

impl<T> std::ops::Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}
