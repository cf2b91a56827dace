//! Food catalog domain model.
//!
//! # Responsibility
//! - Define the reusable food definition shared by the catalog and the log.
//! - Validate names and nutrient numbers before they reach persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another food.
//! - Nutrient numbers are finite and non-negative; `default_qty` is positive.
//! - `meal_type` is a classification hint only; `None` means "fits any meal".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for catalog foods.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type FoodId = Uuid;

/// Closed set of meal slots a food or log entry can belong to.
///
/// Serialized with capitalized labels (`"Breakfast"`) to stay byte-compatible
/// with previously persisted payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All meal slots in display order.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// Wire and display label for this slot.
    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealType {
    type Err = ParseMealTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Breakfast" => Ok(Self::Breakfast),
            "Lunch" => Ok(Self::Lunch),
            "Dinner" => Ok(Self::Dinner),
            "Snack" => Ok(Self::Snack),
            other => Err(ParseMealTypeError(other.to_string())),
        }
    }
}

/// Error for meal slot labels outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMealTypeError(pub String);

impl Display for ParseMealTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown meal type `{}`; expected one of Breakfast, Lunch, Dinner, Snack",
            self.0
        )
    }
}

impl Error for ParseMealTypeError {}

/// Reusable food definition with per-default-quantity nutrients.
///
/// Nutrient fields describe one `default_qty` of the food in `unit`; log
/// entries scale them by their own quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Stable global ID used for lookup and log snapshots.
    pub id: FoodId,
    /// Human-readable display name.
    pub name: String,
    /// Suggested quantity prefilled when logging this food.
    pub default_qty: f64,
    /// Free-text measurement unit (`"cup"`, `"g"`, `"piece"`).
    pub unit: String,
    /// Calories per `default_qty`.
    pub kcal: f64,
    /// Carbohydrate grams per `default_qty`.
    pub carbs_g: f64,
    /// Protein grams per `default_qty`.
    pub protein_g: f64,
    /// Fat grams per `default_qty`.
    pub fat_g: f64,
    /// Optional meal slot classification. Absent means "fits any meal".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
}

impl FoodItem {
    /// Checks the field-level rules write paths must enforce.
    ///
    /// # Invariants
    /// - `name` and `unit` contain at least one non-whitespace character.
    /// - `default_qty` is finite and strictly positive.
    /// - All nutrient numbers are finite and non-negative.
    pub fn validate(&self) -> Result<(), FoodValidationError> {
        if self.name.trim().is_empty() {
            return Err(FoodValidationError::EmptyName);
        }
        if self.unit.trim().is_empty() {
            return Err(FoodValidationError::EmptyUnit);
        }
        if !self.default_qty.is_finite() || self.default_qty <= 0.0 {
            return Err(FoodValidationError::NonPositiveDefaultQty {
                value: self.default_qty,
            });
        }
        let nutrients = [
            ("kcal", self.kcal),
            ("carbs_g", self.carbs_g),
            ("protein_g", self.protein_g),
            ("fat_g", self.fat_g),
        ];
        for (field, value) in nutrients {
            if !value.is_finite() || value < 0.0 {
                return Err(FoodValidationError::InvalidNutrient { field, value });
            }
        }
        Ok(())
    }
}

/// Caller-supplied fields for a food about to enter the catalog.
///
/// The catalog assigns the stable ID; everything else comes from here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFoodItem {
    pub name: String,
    pub default_qty: f64,
    pub unit: String,
    pub kcal: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub meal_type: Option<MealType>,
}

impl NewFoodItem {
    /// Creates a definition with quantity `1.0` and zeroed macros.
    ///
    /// Callers fill the remaining fields with struct update syntax.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, kcal: f64) -> Self {
        Self {
            name: name.into(),
            default_qty: 1.0,
            unit: unit.into(),
            kcal,
            carbs_g: 0.0,
            protein_g: 0.0,
            fat_g: 0.0,
            meal_type: None,
        }
    }

    /// Completes this definition into a catalog item under `id`.
    pub fn with_id(self, id: FoodId) -> FoodItem {
        FoodItem {
            id,
            name: self.name,
            default_qty: self.default_qty,
            unit: self.unit,
            kcal: self.kcal,
            carbs_g: self.carbs_g,
            protein_g: self.protein_g,
            fat_g: self.fat_g,
            meal_type: self.meal_type,
        }
    }
}

/// Partial update for an existing catalog food.
///
/// `None` fields are left untouched. `meal_type` is doubly optional so an
/// update can also clear the classification back to "fits any meal".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub default_qty: Option<f64>,
    pub unit: Option<String>,
    pub kcal: Option<f64>,
    pub carbs_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub meal_type: Option<Option<MealType>>,
}

impl FoodPatch {
    /// Copies the supplied fields onto `item`, leaving the rest unchanged.
    pub fn apply(&self, item: &mut FoodItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(default_qty) = self.default_qty {
            item.default_qty = default_qty;
        }
        if let Some(unit) = &self.unit {
            item.unit = unit.clone();
        }
        if let Some(kcal) = self.kcal {
            item.kcal = kcal;
        }
        if let Some(carbs_g) = self.carbs_g {
            item.carbs_g = carbs_g;
        }
        if let Some(protein_g) = self.protein_g {
            item.protein_g = protein_g;
        }
        if let Some(fat_g) = self.fat_g {
            item.fat_g = fat_g;
        }
        if let Some(meal_type) = self.meal_type {
            item.meal_type = meal_type;
        }
    }
}

/// Field-level validation error for food definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodValidationError {
    EmptyName,
    EmptyUnit,
    NonPositiveDefaultQty { value: f64 },
    InvalidNutrient { field: &'static str, value: f64 },
}

impl Display for FoodValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "food name must not be empty"),
            Self::EmptyUnit => write!(f, "food unit must not be empty"),
            Self::NonPositiveDefaultQty { value } => {
                write!(f, "food default_qty must be a positive number, got {value}")
            }
            Self::InvalidNutrient { field, value } => {
                write!(
                    f,
                    "food {field} must be a finite non-negative number, got {value}"
                )
            }
        }
    }
}

impl Error for FoodValidationError {}
