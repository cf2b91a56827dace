//! Use-case services orchestrating stores and aggregation.
//!
//! # Responsibility
//! - Offer one stable entry surface for UI-facing callers.
//! - Keep store wiring and aggregation plumbing out of caller code.
//!
//! # Invariants
//! - Services never bypass store validation/persistence contracts.

pub mod diary;
