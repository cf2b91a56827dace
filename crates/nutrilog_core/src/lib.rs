//! Core domain logic for NutriLog.
//! This crate is the single source of truth for meal tracking invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;
pub mod trends;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::food::{
    FoodId, FoodItem, FoodPatch, FoodValidationError, MealType, NewFoodItem, ParseMealTypeError,
};
pub use model::meal::{EntryId, MealLogEntry, MealValidationError};
pub use service::diary::{is_snack_time, DailySummary, DiaryService};
pub use storage::{MemoryStorage, SqliteStorage, StorageError, StoragePort, StorageResult};
pub use store::catalog::{
    seed_food_items, CatalogError, CatalogResult, CatalogStore, FoodLookup, CATALOG_KEY,
};
pub use store::meal_log::{
    LogMealRequest, MealLogError, MealLogResult, MealLogStore, MEAL_LOG_KEY,
};
pub use trends::{
    bucket_by, daily_total_calories, week_of_year, Granularity, NutrientBucket,
    ParseGranularityError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
