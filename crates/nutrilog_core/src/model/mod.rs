//! Domain model for the food catalog and the meal log.
//!
//! # Responsibility
//! - Define canonical data structures used by stores and aggregation.
//! - Keep the snapshot relationship between catalog foods and log entries
//!   explicit in the types.
//!
//! # Invariants
//! - Every domain object is identified by a stable `Uuid`-backed ID.
//! - Log entries embed a frozen `FoodItem` copy, never a reference.

pub mod food;
pub mod meal;
