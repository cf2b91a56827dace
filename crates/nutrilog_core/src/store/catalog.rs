//! Food catalog store.
//!
//! # Responsibility
//! - Own the list of reusable food definitions and its built-in seed data.
//! - Persist the full catalog snapshot through the storage port on every
//!   accepted write.
//!
//! # Invariants
//! - Write paths call `FoodItem::validate()` before any state change.
//! - `list()` preserves insertion order and never contains duplicate ids.
//! - A failed durable write keeps the in-memory mutation; the error is held
//!   in `last_save_error` until the next successful write.

use crate::model::food::{
    FoodId, FoodItem, FoodPatch, FoodValidationError, MealType, NewFoodItem,
};
use crate::storage::{StorageError, StoragePort};
use log::{info, warn};
use once_cell::sync::Lazy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage key owned by the catalog store.
pub const CATALOG_KEY: &str = "food_items";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors from catalog store operations.
#[derive(Debug)]
pub enum CatalogError {
    Validation(FoodValidationError),
    NotFound(FoodId),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "food not found: {id}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<FoodValidationError> for CatalogError {
    fn from(value: FoodValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Read-side seam for resolving foods by id.
///
/// The meal log store snapshots foods through this trait, so it can be
/// exercised without a full catalog behind it.
pub trait FoodLookup {
    fn find_food(&self, id: FoodId) -> Option<&FoodItem>;
}

static SEED_FOOD_ITEMS: Lazy<Vec<NewFoodItem>> = Lazy::new(|| {
    [
        ("Apple", 1.0, "piece", 95.0, 25.0, 0.5, 0.3),
        ("Banana", 1.0, "piece", 105.0, 27.0, 1.3, 0.4),
        ("White Rice", 1.0, "cup", 205.0, 45.0, 4.3, 0.4),
        ("Chicken Breast", 100.0, "g", 165.0, 0.0, 31.0, 3.6),
        ("Whole Milk", 1.0, "cup", 150.0, 12.0, 8.0, 8.0),
        ("Bread Slice", 1.0, "slice", 80.0, 15.0, 3.0, 1.0),
        ("Egg", 1.0, "piece", 70.0, 0.6, 6.0, 5.0),
        ("Oatmeal", 1.0, "cup", 150.0, 27.0, 5.0, 3.0),
    ]
    .into_iter()
    .map(
        |(name, default_qty, unit, kcal, carbs_g, protein_g, fat_g)| NewFoodItem {
            name: name.to_string(),
            default_qty,
            unit: unit.to_string(),
            kcal,
            carbs_g,
            protein_g,
            fat_g,
            meal_type: None,
        },
    )
    .collect()
});

/// Built-in foods used to seed an empty catalog on first use.
pub fn seed_food_items() -> &'static [NewFoodItem] {
    &SEED_FOOD_ITEMS
}

/// Catalog store over an injected storage port.
pub struct CatalogStore<S: StoragePort> {
    storage: S,
    items: Vec<FoodItem>,
    last_save_error: Option<StorageError>,
}

impl<S: StoragePort> CatalogStore<S> {
    /// Opens the catalog from storage.
    ///
    /// A missing payload means first use: the built-in seed foods are
    /// installed and persisted. An unreadable or undecodable payload falls
    /// back to the seed foods in memory only, leaving the stored bytes
    /// untouched for manual recovery.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            items: Vec::new(),
            last_save_error: None,
        };

        match store.storage.load(CATALOG_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<FoodItem>>(&bytes) {
                Ok(items) => {
                    info!(
                        "event=catalog_open module=catalog status=ok source=persisted items={}",
                        items.len()
                    );
                    store.items = items;
                }
                Err(err) => {
                    warn!(
                        "event=catalog_open module=catalog status=warn error_code=catalog_decode_failed error={err}"
                    );
                    store.items = seeded_items();
                    info!(
                        "event=catalog_open module=catalog status=ok source=seed_fallback items={}",
                        store.items.len()
                    );
                }
            },
            Ok(None) => {
                store.items = seeded_items();
                store.persist();
                info!(
                    "event=catalog_open module=catalog status=ok source=seeded items={}",
                    store.items.len()
                );
            }
            Err(err) => {
                warn!(
                    "event=catalog_open module=catalog status=warn error_code=catalog_read_failed error={err}"
                );
                store.items = seeded_items();
                info!(
                    "event=catalog_open module=catalog status=ok source=seed_fallback items={}",
                    store.items.len()
                );
            }
        }

        store
    }

    /// All catalog foods in insertion order.
    pub fn list(&self) -> &[FoodItem] {
        &self.items
    }

    /// Looks up one food by id.
    pub fn find(&self, id: FoodId) -> Option<&FoodItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Foods eligible for `meal_type`: classification matches or is unset.
    pub fn foods_for_meal(&self, meal_type: MealType) -> Vec<&FoodItem> {
        self.items
            .iter()
            .filter(|item| item.meal_type.is_none() || item.meal_type == Some(meal_type))
            .collect()
    }

    /// Adds a food under a freshly assigned id and returns the stored item.
    pub fn add(&mut self, new_item: NewFoodItem) -> CatalogResult<FoodItem> {
        let item = new_item.with_id(Uuid::new_v4());
        item.validate()?;

        self.items.push(item.clone());
        self.persist();
        Ok(item)
    }

    /// Applies a partial update to the food under `id`.
    ///
    /// Validation runs against the fully patched item; on failure the stored
    /// item is left untouched.
    pub fn update(&mut self, id: FoodId, patch: &FoodPatch) -> CatalogResult<()> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        let mut updated = self.items[position].clone();
        patch.apply(&mut updated);
        updated.validate()?;

        self.items[position] = updated;
        self.persist();
        Ok(())
    }

    /// Removes the food under `id` from the catalog.
    ///
    /// Existing log entries keep their snapshots; removal only affects what
    /// can be logged from now on.
    pub fn remove(&mut self, id: FoodId) -> CatalogResult<()> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        self.items.remove(position);
        self.persist();
        Ok(())
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
        let bytes = match serde_json::to_vec(&self.items) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "event=catalog_save module=catalog status=warn error_code=catalog_encode_failed error={err}"
                );
                self.last_save_error =
                    Some(StorageError::Backend(format!("encode {CATALOG_KEY}: {err}")));
                return;
            }
        };

        match self.storage.save(CATALOG_KEY, &bytes) {
            Ok(()) => {
                self.last_save_error = None;
            }
            Err(err) => {
                warn!(
                    "event=catalog_save module=catalog status=warn error_code=catalog_save_failed error={err}"
                );
                self.last_save_error = Some(err);
            }
        }
    }
}

impl<S: StoragePort> FoodLookup for CatalogStore<S> {
    fn find_food(&self, id: FoodId) -> Option<&FoodItem> {
        self.find(id)
    }
}

fn seeded_items() -> Vec<FoodItem> {
    seed_food_items()
        .iter()
        .cloned()
        .map(|new_item| new_item.with_id(Uuid::new_v4()))
        .collect()
}
