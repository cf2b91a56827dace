//! Nutrient trend aggregation.
//!
//! # Responsibility
//! - Reduce meal log entries into a daily total and week/month/year sums.
//! - Keep bucket ordering chronological regardless of label text.
//!
//! # Invariants
//! - Functions are pure: identical input yields identical output, and the
//!   input is never mutated.
//! - Buckets with no entries are omitted; nothing is zero-filled.
//! - Weekly bucketing uses `ceil((moment - Jan 1) / 7 days)` on local wall
//!   clock time, not ISO-8601 week numbering.

use crate::model::meal::MealLogEntry;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Aggregation window for `bucket_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Week,
    Month,
    Year,
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(label)
    }
}

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

/// Error for window labels outside `week`/`month`/`year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGranularityError(pub String);

impl Display for ParseGranularityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown trend window `{}`; expected week, month or year",
            self.0
        )
    }
}

impl Error for ParseGranularityError {}

/// Summed nutrient contributions for one week, month or year.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientBucket {
    /// Display key: `"2024"`, `"2024-03"` or `"2024-W05"`. Zero-padded so
    /// the label order matches the chronological order.
    pub key: String,
    pub calories: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

/// Sums calories over entries, rounded to the nearest integer for display.
///
/// Intended for "today" views; callers pass an already day-filtered slice.
pub fn daily_total_calories<'a, I>(entries: I) -> i64
where
    I: IntoIterator<Item = &'a MealLogEntry>,
{
    let total: f64 = entries.into_iter().map(MealLogEntry::calories).sum();
    total.round() as i64
}

/// Groups entries into per-window nutrient sums, ordered chronologically.
///
/// Windows are keyed by `(year, ordinal)` internally, so the same week or
/// month number in different years never collapses into one bucket.
pub fn bucket_by<'a, I>(entries: I, granularity: Granularity) -> Vec<NutrientBucket>
where
    I: IntoIterator<Item = &'a MealLogEntry>,
{
    let mut buckets: BTreeMap<BucketId, NutrientSums> = BTreeMap::new();

    for entry in entries {
        let local = entry.logged_at_local().naive_local();
        let sums = buckets
            .entry(BucketId::containing(local, granularity))
            .or_default();
        sums.calories += entry.calories();
        sums.carbs_g += entry.carbs_g();
        sums.protein_g += entry.protein_g();
        sums.fat_g += entry.fat_g();
    }

    buckets
        .into_iter()
        .map(|(id, sums)| NutrientBucket {
            key: id.label(),
            calories: sums.calories,
            carbs_g: sums.carbs_g,
            protein_g: sums.protein_g,
            fat_g: sums.fat_g,
        })
        .collect()
}

/// Week number within `moment`'s year, as used by weekly buckets.
///
/// `ceil((moment - Jan 1 00:00) / 7 days)` on the local wall clock. Exactly
/// midnight on Jan 1 lands in week 0; the first week is otherwise 1-based.
pub fn week_of_year(moment: NaiveDateTime) -> i64 {
    let jan_first = NaiveDate::from_ymd_opt(moment.year(), 1, 1)
        .expect("January 1st exists in every chrono year")
        .and_time(NaiveTime::MIN);
    let elapsed_ms = (moment - jan_first).num_milliseconds();
    (elapsed_ms + WEEK_MS - 1) / WEEK_MS
}

/// Ordering key for one aggregation window.
///
/// Derived `Ord` sorts by year first, then by the ordinal within the year.
/// Mixed variants never meet inside a single `bucket_by` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BucketId {
    Week { year: i32, week: i64 },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl BucketId {
    fn containing(local: NaiveDateTime, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Week => Self::Week {
                year: local.year(),
                week: week_of_year(local),
            },
            Granularity::Month => Self::Month {
                year: local.year(),
                month: local.month(),
            },
            Granularity::Year => Self::Year { year: local.year() },
        }
    }

    fn label(self) -> String {
        match self {
            Self::Week { year, week } => format!("{year}-W{week:02}"),
            Self::Month { year, month } => format!("{year}-{month:02}"),
            Self::Year { year } => format!("{year}"),
        }
    }
}

#[derive(Debug, Default)]
struct NutrientSums {
    calories: f64,
    carbs_g: f64,
    protein_g: f64,
    fat_g: f64,
}
