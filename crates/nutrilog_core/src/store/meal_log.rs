//! Meal log store.
//!
//! # Responsibility
//! - Own the append-style history of logged meals.
//! - Snapshot catalog foods into entries at log time.
//! - Persist the full log snapshot through the storage port on every
//!   accepted write.
//!
//! # Invariants
//! - Entries are kept in insertion order.
//! - An entry's food snapshot is never rewritten after `add`.
//! - A failed durable write keeps the in-memory mutation; the error is held
//!   in `last_save_error` until the next successful write.

use crate::model::food::{FoodId, MealType};
use crate::model::meal::{EntryId, MealLogEntry, MealValidationError};
use crate::store::catalog::FoodLookup;
use crate::storage::{StorageError, StoragePort};
use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key owned by the meal log store.
pub const MEAL_LOG_KEY: &str = "meal_logs";

pub type MealLogResult<T> = Result<T, MealLogError>;

/// Errors from meal log store operations.
#[derive(Debug)]
pub enum MealLogError {
    Validation(MealValidationError),
    FoodNotFound(FoodId),
    EntryNotFound(EntryId),
}

impl Display for MealLogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::FoodNotFound(id) => write!(f, "food not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "meal log entry not found: {id}"),
        }
    }
}

impl Error for MealLogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::FoodNotFound(_) => None,
            Self::EntryNotFound(_) => None,
        }
    }
}

impl From<MealValidationError> for MealLogError {
    fn from(value: MealValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Caller-supplied fields for logging one meal.
#[derive(Debug, Clone, PartialEq)]
pub struct LogMealRequest {
    /// Meal slot this entry belongs to. The referenced food's own
    /// classification does not have to match.
    pub meal_type: MealType,
    /// Multiplier applied to the food's per-`default_qty` nutrients.
    pub qty: f64,
    /// Catalog food to snapshot into the entry.
    pub food_id: FoodId,
    /// Log moment. `None` means "now".
    pub logged_at: Option<DateTime<Utc>>,
}

impl LogMealRequest {
    /// Creates a request logged "now"; set `logged_at` for backdating.
    pub fn new(meal_type: MealType, qty: f64, food_id: FoodId) -> Self {
        Self {
            meal_type,
            qty,
            food_id,
            logged_at: None,
        }
    }
}

/// Meal log store over an injected storage port.
pub struct MealLogStore<S: StoragePort> {
    storage: S,
    entries: Vec<MealLogEntry>,
    last_save_error: Option<StorageError>,
}

impl<S: StoragePort> MealLogStore<S> {
    /// Opens the meal log from storage.
    ///
    /// A missing payload means an empty history. An unreadable or
    /// undecodable payload falls back to an empty history in memory only,
    /// leaving the stored bytes untouched for manual recovery.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            entries: Vec::new(),
            last_save_error: None,
        };

        match store.storage.load(MEAL_LOG_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<MealLogEntry>>(&bytes) {
                Ok(entries) => {
                    info!(
                        "event=meal_log_open module=meal_log status=ok source=persisted entries={}",
                        entries.len()
                    );
                    store.entries = entries;
                }
                Err(err) => {
                    warn!(
                        "event=meal_log_open module=meal_log status=warn error_code=meal_log_decode_failed error={err}"
                    );
                    info!("event=meal_log_open module=meal_log status=ok source=empty_fallback entries=0");
                }
            },
            Ok(None) => {
                info!("event=meal_log_open module=meal_log status=ok source=empty entries=0");
            }
            Err(err) => {
                warn!(
                    "event=meal_log_open module=meal_log status=warn error_code=meal_log_read_failed error={err}"
                );
                info!("event=meal_log_open module=meal_log status=ok source=empty_fallback entries=0");
            }
        }

        store
    }

    /// All entries in insertion order.
    pub fn list(&self) -> &[MealLogEntry] {
        &self.entries
    }

    /// Logs a meal by snapshotting the referenced catalog food.
    ///
    /// The food is resolved through `foods` at call time; the returned entry
    /// carries a frozen copy of it.
    pub fn add(
        &mut self,
        request: &LogMealRequest,
        foods: &impl FoodLookup,
    ) -> MealLogResult<MealLogEntry> {
        let food = foods
            .find_food(request.food_id)
            .ok_or(MealLogError::FoodNotFound(request.food_id))?;

        let entry = MealLogEntry::at(
            request.logged_at.unwrap_or_else(Utc::now),
            request.meal_type,
            request.qty,
            food.clone(),
        );
        entry.validate()?;

        self.entries.push(entry.clone());
        self.persist();
        Ok(entry)
    }

    /// Removes the entry under `id` from the log.
    pub fn remove(&mut self, id: EntryId) -> MealLogResult<()> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(MealLogError::EntryNotFound(id))?;

        self.entries.remove(position);
        self.persist();
        Ok(())
    }

    /// Entries logged on the given local calendar date.
    ///
    /// Date equality, not a rolling 24h window: an entry from yesterday
    /// 23:59 never shows up for today.
    pub fn entries_on(&self, date: NaiveDate) -> Vec<&MealLogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.logged_on() == date)
            .collect()
    }

    /// Entries logged on the current local calendar date.
    pub fn todays_entries(&self) -> Vec<&MealLogEntry> {
        self.entries_on(Local::now().date_naive())
    }

    /// Error from the most recent failed snapshot write, if the store is
    /// currently out of sync with storage.
    pub fn last_save_error(&self) -> Option<&StorageError> {
        self.last_save_error.as_ref()
    }

    /// Releases the underlying storage port.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let bytes = match serde_json::to_vec(&self.entries) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "event=meal_log_save module=meal_log status=warn error_code=meal_log_encode_failed error={err}"
                );
                self.last_save_error =
                    Some(StorageError::Backend(format!("encode {MEAL_LOG_KEY}: {err}")));
                return;
            }
        };

        match self.storage.save(MEAL_LOG_KEY, &bytes) {
            Ok(()) => {
                self.last_save_error = None;
            }
            Err(err) => {
                warn!(
                    "event=meal_log_save module=meal_log status=warn error_code=meal_log_save_failed error={err}"
                );
                self.last_save_error = Some(err);
            }
        }
    }
}
