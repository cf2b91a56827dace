//! Diary use-case service.
//!
//! # Responsibility
//! - Bundle the catalog and meal log stores behind one use-case surface.
//! - Answer "today" and trend questions from the current log.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Log entries snapshot foods from this service's own catalog.

use crate::model::food::{FoodId, FoodItem, FoodPatch, MealType, NewFoodItem};
use crate::model::meal::{EntryId, MealLogEntry};
use crate::storage::StoragePort;
use crate::store::catalog::{CatalogResult, CatalogStore};
use crate::store::meal_log::{LogMealRequest, MealLogResult, MealLogStore};
use crate::trends::{bucket_by, daily_total_calories, Granularity, NutrientBucket};
use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike, Weekday};

/// Everything the daily diary view needs for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    /// Local calendar date the summary covers.
    pub date: NaiveDate,
    /// Rounded total calories over `entries`.
    pub total_kcal: i64,
    /// Entries logged on `date`, in insertion order.
    pub entries: Vec<MealLogEntry>,
}

/// Use-case facade over one catalog store and one meal log store.
///
/// Both stores share the storage port type but own separate ports, so a
/// file-backed diary uses two handles onto the same database.
pub struct DiaryService<S: StoragePort> {
    catalog: CatalogStore<S>,
    meal_log: MealLogStore<S>,
}

impl<S: StoragePort> DiaryService<S> {
    /// Wraps already opened stores.
    pub fn new(catalog: CatalogStore<S>, meal_log: MealLogStore<S>) -> Self {
        Self { catalog, meal_log }
    }

    /// Opens both stores over the provided ports.
    pub fn open(catalog_storage: S, meal_log_storage: S) -> Self {
        Self::new(
            CatalogStore::open(catalog_storage),
            MealLogStore::open(meal_log_storage),
        )
    }

    /// All catalog foods in insertion order.
    pub fn foods(&self) -> &[FoodItem] {
        self.catalog.list()
    }

    /// Foods eligible for `meal_type`: classification matches or is unset.
    pub fn foods_for_meal(&self, meal_type: MealType) -> Vec<&FoodItem> {
        self.catalog.foods_for_meal(meal_type)
    }

    /// Adds a catalog food and returns it with its assigned id.
    pub fn add_food(&mut self, new_item: NewFoodItem) -> CatalogResult<FoodItem> {
        self.catalog.add(new_item)
    }

    /// Applies a partial update to the catalog food under `id`.
    pub fn update_food(&mut self, id: FoodId, patch: &FoodPatch) -> CatalogResult<()> {
        self.catalog.update(id, patch)
    }

    /// Removes the catalog food under `id`. Logged history keeps its
    /// snapshots.
    pub fn remove_food(&mut self, id: FoodId) -> CatalogResult<()> {
        self.catalog.remove(id)
    }

    /// Logs a meal against this service's own catalog.
    pub fn log_meal(&mut self, request: &LogMealRequest) -> MealLogResult<MealLogEntry> {
        self.meal_log.add(request, &self.catalog)
    }

    /// Removes the log entry under `id`.
    pub fn remove_meal(&mut self, id: EntryId) -> MealLogResult<()> {
        self.meal_log.remove(id)
    }

    /// All log entries in insertion order.
    pub fn meals(&self) -> &[MealLogEntry] {
        self.meal_log.list()
    }

    /// Summary of the current local calendar date.
    pub fn today(&self) -> DailySummary {
        let date = Local::now().date_naive();
        let entries = self.meal_log.entries_on(date);
        DailySummary {
            date,
            total_kcal: daily_total_calories(entries.iter().copied()),
            entries: entries.into_iter().cloned().collect(),
        }
    }

    /// Nutrient sums for the requested window size, ordered chronologically.
    pub fn trends(&self, granularity: Granularity) -> Vec<NutrientBucket> {
        bucket_by(self.meal_log.list(), granularity)
    }

    /// Human-readable warnings for stores currently out of sync with
    /// storage. Empty when every snapshot write has stuck.
    pub fn storage_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(err) = self.catalog.last_save_error() {
            warnings.push(format!("food catalog is not being saved: {err}"));
        }
        if let Some(err) = self.meal_log.last_save_error() {
            warnings.push(format!("meal log is not being saved: {err}"));
        }
        warnings
    }
}

/// Whether the snack reminder window is open at `at`: any time on weekends,
/// from 17:00 onward on weekdays.
pub fn is_snack_time(at: DateTime<Local>) -> bool {
    let weekend = matches!(at.weekday(), Weekday::Sat | Weekday::Sun);
    weekend || at.hour() >= 17
}
