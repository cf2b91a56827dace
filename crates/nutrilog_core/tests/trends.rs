use chrono::{DateTime, Local, TimeZone, Utc};
use nutrilog_core::{
    bucket_by, daily_total_calories, FoodItem, Granularity, MealLogEntry, MealType, NewFoodItem,
};
use uuid::Uuid;

#[test]
fn daily_total_over_no_entries_is_zero() {
    let entries: Vec<MealLogEntry> = Vec::new();
    assert_eq!(daily_total_calories(&entries), 0);
}

#[test]
fn daily_total_sums_scaled_calories() {
    let entries = vec![
        entry_at(local_utc(2024, 3, 5, 8, 0, 0), 2.0, food(140.0, 0.0, 0.0, 0.0)),
        entry_at(local_utc(2024, 3, 5, 13, 0, 0), 1.0, food(260.0, 0.0, 0.0, 0.0)),
    ];

    assert_eq!(daily_total_calories(&entries), 540);
}

#[test]
fn daily_total_rounds_fractional_sums_for_display() {
    let entries = vec![entry_at(
        local_utc(2024, 3, 5, 8, 0, 0),
        1.5,
        food(95.0, 0.0, 0.0, 0.0),
    )];

    // 142.5 rounds half away from zero.
    assert_eq!(daily_total_calories(&entries), 143);
}

#[test]
fn week_buckets_are_ascending_with_summed_nutrients() {
    let snack = food(100.0, 14.0, 0.0, 0.0);
    // Feb 1 is 31.5 days into 2024 (week 5); Feb 8 is week 6.
    let entries = vec![
        entry_at(local_utc(2024, 2, 8, 12, 0, 0), 3.0, snack.clone()),
        entry_at(local_utc(2024, 2, 1, 12, 0, 0), 2.0, snack),
    ];

    let buckets = bucket_by(&entries, Granularity::Week);

    let keyed: Vec<(&str, f64)> = buckets
        .iter()
        .map(|bucket| (bucket.key.as_str(), bucket.carbs_g))
        .collect();
    assert_eq!(keyed, [("2024-W05", 28.0), ("2024-W06", 42.0)]);
}

#[test]
fn empty_windows_are_omitted_not_zero_filled() {
    let snack = food(100.0, 14.0, 0.0, 0.0);
    let entries = vec![
        entry_at(local_utc(2024, 2, 1, 12, 0, 0), 1.0, snack.clone()),
        entry_at(local_utc(2024, 2, 29, 12, 0, 0), 1.0, snack),
    ];

    let buckets = bucket_by(&entries, Granularity::Week);

    let keys: Vec<&str> = buckets.iter().map(|bucket| bucket.key.as_str()).collect();
    assert_eq!(keys, ["2024-W05", "2024-W09"]);
}

#[test]
fn month_buckets_order_chronologically_across_years() {
    let snack = food(100.0, 0.0, 0.0, 0.0);
    let entries = vec![
        entry_at(local_utc(2024, 10, 3, 9, 0, 0), 1.0, snack.clone()),
        entry_at(local_utc(2023, 11, 20, 9, 0, 0), 1.0, snack.clone()),
        entry_at(local_utc(2024, 2, 11, 9, 0, 0), 1.0, snack.clone()),
        entry_at(local_utc(2024, 1, 7, 9, 0, 0), 1.0, snack),
    ];

    let buckets = bucket_by(&entries, Granularity::Month);

    let keys: Vec<&str> = buckets.iter().map(|bucket| bucket.key.as_str()).collect();
    assert_eq!(keys, ["2023-11", "2024-01", "2024-02", "2024-10"]);
}

#[test]
fn year_buckets_sum_everything_logged_in_the_year() {
    let entries = vec![
        entry_at(local_utc(2023, 6, 1, 9, 0, 0), 1.0, food(100.0, 10.0, 5.0, 2.0)),
        entry_at(local_utc(2024, 1, 1, 9, 0, 0), 1.0, food(200.0, 20.0, 10.0, 4.0)),
        entry_at(local_utc(2024, 12, 31, 9, 0, 0), 2.0, food(50.0, 5.0, 2.5, 1.0)),
    ];

    let buckets = bucket_by(&entries, Granularity::Year);

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].key, "2023");
    assert_eq!(buckets[0].calories, 100.0);
    assert_eq!(buckets[1].key, "2024");
    assert_eq!(buckets[1].calories, 300.0);
    assert_eq!(buckets[1].carbs_g, 30.0);
    assert_eq!(buckets[1].protein_g, 15.0);
    assert_eq!(buckets[1].fat_g, 6.0);
}

#[test]
fn same_week_number_in_different_years_stays_separate() {
    let snack = food(100.0, 0.0, 0.0, 0.0);
    let entries = vec![
        entry_at(local_utc(2024, 2, 1, 12, 0, 0), 1.0, snack.clone()),
        entry_at(local_utc(2023, 2, 1, 12, 0, 0), 1.0, snack),
    ];

    let buckets = bucket_by(&entries, Granularity::Week);

    let keys: Vec<&str> = buckets.iter().map(|bucket| bucket.key.as_str()).collect();
    assert_eq!(keys, ["2023-W05", "2024-W05"]);
}

#[test]
fn new_year_midnight_lands_in_week_zero() {
    let entries = vec![entry_at(
        local_utc(2024, 1, 1, 0, 0, 0),
        1.0,
        food(100.0, 0.0, 0.0, 0.0),
    )];

    let buckets = bucket_by(&entries, Granularity::Week);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].key, "2024-W00");
}

#[test]
fn bucket_by_is_pure_and_repeatable() {
    let entries = vec![
        entry_at(local_utc(2024, 3, 5, 8, 0, 0), 2.0, food(140.0, 12.0, 3.0, 1.0)),
        entry_at(local_utc(2024, 4, 5, 8, 0, 0), 1.0, food(260.0, 30.0, 8.0, 9.0)),
    ];
    let before = entries.clone();

    let first = bucket_by(&entries, Granularity::Month);
    let second = bucket_by(&entries, Granularity::Month);

    assert_eq!(first, second);
    assert_eq!(entries, before);
}

#[test]
fn all_four_nutrients_scale_by_qty() {
    let entries = vec![entry_at(
        local_utc(2024, 3, 5, 8, 0, 0),
        2.0,
        food(95.0, 25.0, 0.5, 0.3),
    )];

    let buckets = bucket_by(&entries, Granularity::Month);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].calories, 190.0);
    assert_eq!(buckets[0].carbs_g, 50.0);
    assert_eq!(buckets[0].protein_g, 1.0);
    assert_eq!(buckets[0].fat_g, 0.6);
}

#[test]
fn granularity_parses_view_labels() {
    assert_eq!("week".parse::<Granularity>().unwrap(), Granularity::Week);
    assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Month);
    assert_eq!(" yearly ".parse::<Granularity>().unwrap(), Granularity::Year);
    assert_eq!(Granularity::Week.to_string(), "week");

    let err = "fortnight".parse::<Granularity>().unwrap_err();
    assert!(err.to_string().contains("unknown trend window `fortnight`"));
}

fn food(kcal: f64, carbs_g: f64, protein_g: f64, fat_g: f64) -> FoodItem {
    NewFoodItem {
        carbs_g,
        protein_g,
        fat_g,
        ..NewFoodItem::new("Test Food", "piece", kcal)
    }
    .with_id(Uuid::new_v4())
}

fn entry_at(moment: DateTime<Utc>, qty: f64, food: FoodItem) -> MealLogEntry {
    MealLogEntry::at(moment, MealType::Lunch, qty, food)
}

fn local_utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}
