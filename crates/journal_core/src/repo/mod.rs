//! Record store: typed collections persisted in SQLite.
//!
//! # Responsibility
//! - Bind each record type to its table ([`collection`]).
//! - Execute CRUD and range/equality queries generically ([`store`]).
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `Conflict`) in addition
//!   to transport errors.
//! - Record queries are built only here; callers never write SQL.

pub mod collection;
pub mod store;
