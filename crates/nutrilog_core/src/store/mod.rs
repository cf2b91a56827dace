//! Store layer owning in-memory collections and their persistence.
//!
//! # Responsibility
//! - Define use-case oriented APIs over the catalog and the meal log.
//! - Mirror every accepted mutation to the storage port as a full snapshot.
//!
//! # Invariants
//! - Store writes must enforce model validation before any state change.
//! - A failed durable write keeps the in-memory mutation and is surfaced as
//!   a warning, never as an operation error.

pub mod catalog;
pub mod meal_log;
