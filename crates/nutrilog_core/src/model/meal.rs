//! Meal log domain model.
//!
//! # Responsibility
//! - Define the historical record of one logged meal.
//! - Derive per-entry nutrient contributions from the embedded snapshot.
//!
//! # Invariants
//! - `food` is a frozen copy taken at log time; later catalog edits or
//!   deletions never change it.
//! - `qty` is finite and strictly positive.
//! - `logged_at` is stored in UTC; day grouping happens on local time.

use crate::model::food::{FoodItem, MealType};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for meal log entries.
pub type EntryId = Uuid;

/// One logged meal with a frozen snapshot of the food eaten.
///
/// The snapshot keeps history accurate: what was eaten is recorded with the
/// nutrient numbers that were true when it was eaten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLogEntry {
    /// Stable global ID used for removal and auditing.
    pub id: EntryId,
    /// Moment the meal was logged, in UTC.
    pub logged_at: DateTime<Utc>,
    /// Meal slot chosen by the user for this entry.
    pub meal_type: MealType,
    /// Multiplier applied to the snapshot's per-`default_qty` nutrients.
    pub qty: f64,
    /// Frozen copy of the catalog food at log time.
    pub food: FoodItem,
}

impl MealLogEntry {
    /// Creates an entry logged now, with a generated stable ID.
    pub fn new(meal_type: MealType, qty: f64, food: FoodItem) -> Self {
        Self::at(Utc::now(), meal_type, qty, food)
    }

    /// Creates an entry for an explicit moment, with a generated stable ID.
    pub fn at(logged_at: DateTime<Utc>, meal_type: MealType, qty: f64, food: FoodItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            logged_at,
            meal_type,
            qty,
            food,
        }
    }

    /// Checks the field-level rules write paths must enforce.
    pub fn validate(&self) -> Result<(), MealValidationError> {
        if !self.qty.is_finite() || self.qty <= 0.0 {
            return Err(MealValidationError::NonPositiveQty { value: self.qty });
        }
        Ok(())
    }

    /// Calories contributed by this entry (`qty * food.kcal`).
    pub fn calories(&self) -> f64 {
        self.qty * self.food.kcal
    }

    /// Carbohydrate grams contributed by this entry.
    pub fn carbs_g(&self) -> f64 {
        self.qty * self.food.carbs_g
    }

    /// Protein grams contributed by this entry.
    pub fn protein_g(&self) -> f64 {
        self.qty * self.food.protein_g
    }

    /// Fat grams contributed by this entry.
    pub fn fat_g(&self) -> f64 {
        self.qty * self.food.fat_g
    }

    /// Log moment converted to the local timezone.
    pub fn logged_at_local(&self) -> DateTime<Local> {
        self.logged_at.with_timezone(&Local)
    }

    /// Local calendar date this entry belongs to.
    ///
    /// Day grouping uses calendar-date equality, not a rolling 24h window.
    pub fn logged_on(&self) -> NaiveDate {
        self.logged_at_local().date_naive()
    }
}

/// Field-level validation error for meal log entries.
#[derive(Debug, Clone, PartialEq)]
pub enum MealValidationError {
    NonPositiveQty { value: f64 },
}

impl Display for MealValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveQty { value } => {
                write!(f, "meal quantity must be a positive number, got {value}")
            }
        }
    }
}

impl Error for MealValidationError {}
