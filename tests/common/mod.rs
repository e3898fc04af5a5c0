//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use cleanse::pipeline::Dataset;

/// Small mixed dataset with known characteristics:
/// - `id`: 1..=6, row 4 duplicated as row 5 (all columns equal)
/// - `score`: one null, one extreme value (500.0)
/// - `city`: text with one null
/// - `active`: booleans
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "id" => [1i64, 2, 3, 4, 4, 6],
        "score" => [Some(10.0f64), Some(12.0), None, Some(11.0), Some(11.0), Some(500.0)],
        "city" => [Some("Cape Town"), Some("Durban"), Some("Paarl"), None, None, Some("George")],
        "active" => [true, false, true, true, true, false],
    }
    .unwrap()
}

/// The four-row scenario used throughout the cleaning tests
pub fn create_scenario_dataframe() -> DataFrame {
    df! {
        "a" => [Some(1i64), Some(1), Some(2), None],
        "b" => [10i64, 10, 20, 30],
    }
    .unwrap()
}

/// Random numeric frame for stress tests
pub fn create_large_test_dataframe(rows: usize, cols: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let columns: Vec<Column> = (0..cols)
        .map(|i| {
            let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect();
            Column::new(format!("feature_{}", i).into(), values)
        })
        .collect();

    DataFrame::new(columns).unwrap()
}

pub fn dataset(df: DataFrame) -> Dataset {
    Dataset::new(df)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let mut file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Write raw text to a file in a fresh temporary directory
pub fn create_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Non-null values of a column as f64
pub fn float_values(ds: &Dataset, name: &str) -> Vec<f64> {
    ds.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
