//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

use pricefit::pipeline::{canonicalize, split_dataset, DataSplits, LabeledFrame, ROW_ID, TARGET_COLUMN};

pub const OCEAN_CATEGORIES: [&str; 5] = ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"];

/// Create a housing table in source layout (lowercase names, 10 columns).
///
/// The target follows income and location with noise; every 25th row has a
/// missing `total_bedrooms`.
pub fn create_housing_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut longitude = Vec::with_capacity(rows);
    let mut latitude = Vec::with_capacity(rows);
    let mut age = Vec::with_capacity(rows);
    let mut rooms = Vec::with_capacity(rows);
    let mut bedrooms: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut population = Vec::with_capacity(rows);
    let mut households = Vec::with_capacity(rows);
    let mut income = Vec::with_capacity(rows);
    let mut value = Vec::with_capacity(rows);
    let mut ocean = Vec::with_capacity(rows);

    for i in 0..rows {
        let lon = rng.gen_range(-124.0..-114.0);
        let lat = rng.gen_range(32.0..42.0);
        let inc = rng.gen_range(0.5..15.0);
        let total_rooms: f64 = rng.gen_range(200.0..6000.0);
        let category = OCEAN_CATEGORIES[i % OCEAN_CATEGORIES.len()];
        let premium = if category == "INLAND" { -40_000.0 } else { 25_000.0 };

        longitude.push(lon);
        latitude.push(lat);
        age.push(rng.gen_range(1.0..52.0));
        rooms.push(total_rooms);
        bedrooms.push(if i % 25 == 0 {
            None
        } else {
            Some((total_rooms * 0.2).round())
        });
        population.push(rng.gen_range(100.0..3000.0));
        households.push(rng.gen_range(50.0..1000.0));
        income.push(inc);
        value.push(60_000.0 + 35_000.0 * inc + premium + rng.gen_range(-15_000.0..15_000.0));
        ocean.push(category.to_string());
    }

    df! {
        "longitude" => longitude,
        "latitude" => latitude,
        "housing_median_age" => age,
        "total_rooms" => rooms,
        "total_bedrooms" => bedrooms,
        "population" => population,
        "households" => households,
        "median_income" => income,
        "median_house_value" => value,
        "ocean_proximity" => ocean,
    }
    .unwrap()
}

/// The housing table after positional renaming and row id assignment
pub fn create_canonical_dataframe(rows: usize, seed: u64) -> DataFrame {
    canonicalize(create_housing_dataframe(rows, seed)).unwrap()
}

/// Write a DataFrame as CSV into `dir`
pub fn write_csv(df: &DataFrame, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    let mut df = df.clone();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();
    path
}

/// Write a synthetic housing CSV into `dir` and return its path
pub fn write_housing_csv(dir: &Path, rows: usize, seed: u64) -> PathBuf {
    write_csv(&create_housing_dataframe(rows, seed), dir, "housing.csv")
}

/// Build a labeled frame from feature columns and target values
pub fn labeled_frame(features: Vec<(&str, Vec<f64>)>, target: Vec<f64>) -> LabeledFrame {
    let ids: Vec<u32> = (0..target.len() as u32).collect();

    let mut columns = vec![Column::new(ROW_ID.into(), ids.clone())];
    for (name, values) in features {
        columns.push(Column::new(name.into(), values));
    }

    let features = DataFrame::new(columns).unwrap();
    let target = DataFrame::new(vec![
        Column::new(ROW_ID.into(), ids),
        Column::new(TARGET_COLUMN.into(), target),
    ])
    .unwrap();

    LabeledFrame::new(features, target).unwrap()
}

/// Three uniform features and a noiseless linear target
/// `y = 3·x0 − 2·x1 + 0.5·x2 + 10`
pub fn create_linear_frame(rows: usize, seed: u64) -> LabeledFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let x0: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..10.0)).collect();
    let x1: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..10.0)).collect();
    let x2: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..10.0)).collect();

    let y: Vec<f64> = (0..rows)
        .map(|i| 3.0 * x0[i] - 2.0 * x1[i] + 0.5 * x2[i] + 10.0)
        .collect();

    labeled_frame(vec![("x0", x0), ("x1", x1), ("x2", x2)], y)
}

/// Seed-42 splits of [`create_linear_frame`]
pub fn create_linear_splits(rows: usize) -> DataSplits {
    split_dataset(&create_linear_frame(rows, 7), 42).unwrap()
}

/// Assert two floats are within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} ± {}, got {}",
        expected,
        tol,
        actual
    );
}
