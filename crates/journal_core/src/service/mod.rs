//! Page-level query façade.
//!
//! # Responsibility
//! - Turn page intents ("this month's events", "today's mood") into store
//!   calls plus in-memory aggregation.
//! - Validate input before any write reaches the store.
//!
//! # Invariants
//! - Services hold no state of their own; every result is derived from the
//!   store, the current day and the visible window.

pub mod calendar_service;
pub mod dashboard_service;
pub mod diary_service;
pub mod error;
pub mod habit_service;
pub mod ledger_service;
