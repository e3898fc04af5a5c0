//! Tests for the cleaning stages and the pipeline driver

mod common;

use cleanse::error::CleanError;
use cleanse::pipeline::column_stats::total_null_count;
use cleanse::pipeline::{
    clean, handle_outliers, load_dataset, normalize_data, profile, remove_duplicates,
    remove_missing_values, CleaningOptions, ColumnKind, Dataset, StageKind,
};
use common::{
    assert_close, create_scenario_dataframe, create_temp_file, create_test_dataframe, dataset,
    float_values,
};
use polars::prelude::*;

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

// ============================================================================
// Remove Missing Values
// ============================================================================

#[test]
fn test_remove_missing_values_drops_rows_with_any_null() {
    let ds = dataset(create_test_dataframe());
    let outcome = remove_missing_values(&ds).unwrap();

    // Rows 3 (null score), 4 and 5 (null city) go
    assert_eq!(outcome.dataset.height(), 3);
    assert_eq!(outcome.delta.rows_removed(), 3);
    assert_eq!(outcome.delta.values_removed, 3);
    assert_eq!(total_null_count(outcome.dataset.frame()), 0);
}

#[test]
fn test_remove_missing_values_is_idempotent() {
    let ds = dataset(create_test_dataframe());
    let once = remove_missing_values(&ds).unwrap().dataset;
    let twice = remove_missing_values(&once).unwrap();

    assert_eq!(twice.delta.rows_removed(), 0);
    assert_eq!(twice.delta.values_removed, 0);
    assert!(twice.dataset.frame().equals_missing(once.frame()));
}

#[test]
fn test_remove_missing_values_does_not_modify_input() {
    let ds = dataset(create_test_dataframe());
    let before = ds.frame().clone();

    remove_missing_values(&ds).unwrap();

    assert_eq!(ds.height(), 6);
    assert!(ds.frame().equals_missing(&before));
}

// ============================================================================
// Remove Duplicates
// ============================================================================

#[test]
fn test_remove_duplicates_keeps_first_occurrence() {
    let df = df! {
        "k" => [1i64, 2, 1, 3, 2],
        "v" => ["a", "b", "a", "c", "x"],
    }
    .unwrap();
    let outcome = remove_duplicates(&dataset(df)).unwrap();

    assert_eq!(outcome.delta.values_removed, 1);
    assert_eq!(outcome.dataset.height(), 4);

    let keys: Vec<i64> = outcome
        .dataset
        .column("k")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(keys, vec![1, 2, 3, 2]);
}

#[test]
fn test_remove_duplicates_treats_nulls_as_equal() {
    let ds = dataset(create_test_dataframe());
    let outcome = remove_duplicates(&ds).unwrap();

    // Rows 4 and 5 both hold a null city
    assert_eq!(outcome.dataset.height(), 5);
    assert_eq!(outcome.delta.values_removed, 1);
}

#[test]
fn test_remove_duplicates_is_idempotent() {
    let ds = dataset(create_test_dataframe());
    let once = remove_duplicates(&ds).unwrap().dataset;
    let twice = remove_duplicates(&once).unwrap();

    assert_eq!(twice.delta.rows_removed(), 0);
    assert_eq!(twice.dataset.height(), once.height());
}

// ============================================================================
// Handle Outliers
// ============================================================================

#[test]
fn test_handle_outliers_removes_extreme_value() {
    let df = df! { "v" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 100.0] }.unwrap();
    let outcome = handle_outliers(&dataset(df)).unwrap();

    assert_eq!(outcome.delta.values_removed, 1);
    assert_eq!(
        float_values(&outcome.dataset, "v"),
        vec![1.0, 2.0, 3.0, 4.0, 5.0]
    );
}

#[test]
fn test_handle_outliers_keeps_values_on_the_fence() {
    // Q1 = 2.25, Q3 = 4.75, upper fence = 8.5
    let df = df! { "v" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 8.5] }.unwrap();
    let input = dataset(df);
    let bounds = cleanse::pipeline::iqr_bounds(&float_values(&input, "v")).unwrap();
    let outcome = handle_outliers(&input).unwrap();

    assert!(bounds.1 >= 8.5);
    assert_eq!(outcome.dataset.height(), 6);
}

#[test]
fn test_handle_outliers_keeps_nulls() {
    let df = df! {
        "v" => [Some(1.0f64), Some(2.0), None, Some(3.0), Some(4.0), Some(5.0), Some(100.0)],
    }
    .unwrap();
    let outcome = handle_outliers(&dataset(df)).unwrap();

    assert_eq!(outcome.delta.values_removed, 1);
    assert_eq!(outcome.dataset.height(), 6);
    assert_eq!(total_null_count(outcome.dataset.frame()), 1);
}

#[test]
fn test_handle_outliers_ignores_non_numeric_columns() {
    let df = df! {
        "label" => ["a", "b", "c", "d"],
        "flag" => [true, false, true, true],
    }
    .unwrap();
    let outcome = handle_outliers(&dataset(df)).unwrap();

    assert_eq!(outcome.dataset.height(), 4);
    assert_eq!(outcome.delta.columns_affected, 0);
}

#[test]
fn test_handle_outliers_skips_all_null_column() {
    let df = df! {
        "empty" => [None::<f64>, None, None],
        "v" => [1.0f64, 2.0, 3.0],
    }
    .unwrap();
    let outcome = handle_outliers(&dataset(df)).unwrap();

    assert_eq!(outcome.dataset.height(), 3);
}

#[test]
fn test_handle_outliers_checks_every_numeric_column() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
        "b" => [10.0f64, 11.0, 12.0, 13.0, 14.0, 15.0, 1000.0],
    }
    .unwrap();
    let outcome = handle_outliers(&dataset(df)).unwrap();

    assert_eq!(outcome.dataset.height(), 6);
    assert_eq!(outcome.delta.columns_affected, 2);
    assert_eq!(float_values(&outcome.dataset, "a").last(), Some(&6.0));
}

// ============================================================================
// Normalize Data
// ============================================================================

#[test]
fn test_normalize_data_zero_mean_unit_std() {
    let df = df! { "v" => [1i64, 2, 3, 4, 5] }.unwrap();
    let outcome = normalize_data(&dataset(df)).unwrap();

    let values = float_values(&outcome.dataset, "v");
    let (mean, std) = mean_and_std(&values);
    assert_close(mean, 0.0, 1e-9);
    assert_close(std, 1.0, 1e-9);
    assert_eq!(outcome.delta.columns_affected, 1);
    assert_eq!(outcome.dataset.kinds(), &[ColumnKind::Numeric]);
}

#[test]
fn test_normalize_data_leaves_constant_column() {
    let df = df! { "v" => [2.0f64, 2.0, 2.0, 2.0] }.unwrap();
    let outcome = normalize_data(&dataset(df)).unwrap();

    assert_eq!(float_values(&outcome.dataset, "v"), vec![2.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_normalize_data_leaves_single_value_column() {
    let df = df! { "v" => [Some(3.0f64), None] }.unwrap();
    let outcome = normalize_data(&dataset(df)).unwrap();

    assert_eq!(float_values(&outcome.dataset, "v"), vec![3.0]);
    assert_eq!(total_null_count(outcome.dataset.frame()), 1);
}

#[test]
fn test_normalize_data_keeps_nulls_and_text() {
    let df = df! {
        "v" => [Some(1.0f64), None, Some(3.0)],
        "label" => ["a", "b", "c"],
    }
    .unwrap();
    let outcome = normalize_data(&dataset(df)).unwrap();

    let v = outcome.dataset.column("v").unwrap();
    assert_eq!(v.null_count(), 1);
    assert_close(float_values(&outcome.dataset, "v")[0], -0.7071067811865476, 1e-9);

    let label = outcome.dataset.column("label").unwrap();
    assert_eq!(label.dtype(), &DataType::String);
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_clean_scenario_with_all_stages() {
    let ds = dataset(create_scenario_dataframe());
    let result = clean(&ds, &CleaningOptions::all()).unwrap();

    let steps: Vec<&str> = result.steps.iter().map(|s| s.step.as_str()).collect();
    assert_eq!(
        steps,
        vec![
            StageKind::RemoveMissingValues.title(),
            StageKind::RemoveDuplicates.title(),
            StageKind::NormalizeData.title(),
        ],
        "no outlier step when nothing is removed"
    );

    assert_eq!(result.steps[0].description, "Removed 1 missing values");
    assert_eq!(result.steps[0].rows_removed, Some(1));
    assert_eq!(result.steps[1].description, "Removed 1 duplicate rows");
    assert_eq!(result.steps[1].rows_removed, Some(1));
    assert_eq!(
        result.steps[2].description,
        "Normalized 2 numeric columns using Z-score"
    );
    assert_eq!(result.steps[2].columns_normalized, Some(2));

    let stats = result.final_stats;
    assert_eq!(stats.original_rows, 4);
    assert_eq!(stats.original_columns, 2);
    assert_eq!(stats.final_rows, 2);
    assert_eq!(stats.final_columns, 2);
    assert_eq!(stats.rows_removed, 2);
    assert_eq!(stats.missing_values, 0);
    assert_eq!(stats.duplicates, 0);

    let a = float_values(&result.dataset, "a");
    assert_close(a[0], -0.7071067811865476, 1e-9);
    assert_close(a[1], 0.7071067811865476, 1e-9);
}

#[test]
fn test_clean_with_no_stages_returns_input() {
    let ds = dataset(create_scenario_dataframe());
    let result = clean(&ds, &CleaningOptions::default()).unwrap();

    assert!(result.steps.is_empty());
    assert!(result.dataset.frame().equals_missing(ds.frame()));
    assert_eq!(result.final_stats.rows_removed, 0);
    assert_eq!(result.final_stats.missing_values, 1);
    assert_eq!(result.final_stats.duplicates, 1);
}

#[test]
fn test_clean_only_selected_stages_run() {
    let ds = dataset(create_scenario_dataframe());
    let options = CleaningOptions {
        remove_duplicates: true,
        ..Default::default()
    };
    let result = clean(&ds, &options).unwrap();

    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].step, "Remove Duplicates");
    assert_eq!(result.final_stats.final_rows, 3);
    assert_eq!(result.final_stats.missing_values, 1);
}

#[test]
fn test_clean_runs_outliers_after_missing_values() {
    let df = df! {
        "v" => [Some(1.0f64), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(100.0), None],
        "w" => [1i64, 2, 3, 4, 5, 6, 7],
    }
    .unwrap();
    let options = CleaningOptions {
        remove_missing_values: true,
        handle_outliers: true,
        ..Default::default()
    };
    let result = clean(&dataset(df), &options).unwrap();

    assert_eq!(result.steps.len(), 2);
    assert_eq!(result.steps[1].description, "Removed 1 outliers using IQR method");
    assert_eq!(result.steps[1].rows_removed, Some(1));
    assert_eq!(result.final_stats.final_rows, 5);
}

#[test]
fn test_clean_normalizes_after_outlier_removal() {
    let df = df! { "v" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 100.0] }.unwrap();
    let options = CleaningOptions {
        handle_outliers: true,
        normalize_data: true,
        ..Default::default()
    };
    let result = clean(&dataset(df), &options).unwrap();

    let values = float_values(&result.dataset, "v");
    assert_eq!(values.len(), 5);
    let (mean, std) = mean_and_std(&values);
    assert_close(mean, 0.0, 1e-9);
    assert_close(std, 1.0, 1e-9);
}

#[test]
fn test_clean_empty_dataset() {
    let df = df! {
        "a" => Vec::<f64>::new(),
        "b" => Vec::<i64>::new(),
    }
    .unwrap();
    let result = clean(&Dataset::new(df), &CleaningOptions::all()).unwrap();

    assert_eq!(result.final_stats.final_rows, 0);
    assert_eq!(result.final_stats.rows_removed, 0);
    assert!(result
        .steps
        .iter()
        .all(|s| s.step != StageKind::HandleOutliers.title()));
}

#[test]
fn test_clean_does_not_modify_input() {
    let ds = dataset(create_test_dataframe());
    let before = ds.frame().clone();

    let result = clean(&ds, &CleaningOptions::all()).unwrap();

    assert!(result.dataset.height() < ds.height());
    assert!(ds.frame().equals_missing(&before));
}

#[test]
fn test_clean_preview_is_capped() {
    let df = common::create_large_test_dataframe(50, 3);
    let result = clean(&dataset(df), &CleaningOptions::default()).unwrap();

    let preview = result.preview();
    assert_eq!(preview.len(), 10);
    assert_eq!(preview[0].len(), 3);
}

#[test]
fn test_stage_failure_message_names_the_stage() {
    let err = CleanError::StageFailed {
        stage: StageKind::HandleOutliers.title(),
        reason: "column vanished".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cleaning failed during 'Handle Outliers': column vanished"
    );
}

#[test]
fn test_clean_counts_duplicates_after_missing_values_removed() {
    // Before null removal there are two repeated rows; afterwards only one
    let df = df! {
        "a" => [1i64, 1, 2, 2],
        "b" => [None, None, Some(5i64), Some(5)],
    }
    .unwrap();
    let options = CleaningOptions {
        remove_missing_values: true,
        remove_duplicates: true,
        ..Default::default()
    };
    let result = clean(&dataset(df), &options).unwrap();

    assert_eq!(result.steps[0].description, "Removed 2 missing values");
    assert_eq!(result.steps[0].rows_removed, Some(2));
    assert_eq!(result.steps[1].description, "Removed 1 duplicate rows");
    assert_eq!(result.steps[1].rows_removed, Some(1));
    assert_eq!(result.final_stats.final_rows, 1);
}

// ============================================================================
// NaN in float columns
// ============================================================================

fn load_nan_csv() -> Dataset {
    let (_dir, path) = create_temp_file("nan.csv", "v\n1.0\n2.0\n3.0\nNaN\n");
    load_dataset(&path, 10000).unwrap()
}

#[test]
fn test_nan_profiled_as_missing() {
    let ds = load_nan_csv();
    let stats = profile(&ds).unwrap();

    assert_eq!(stats.missing_values, 1);
    let v = stats.column_info.get("v").unwrap();
    assert_eq!(v.missing_count, 1);
    assert_eq!(v.sample_values.len(), 3);

    let numeric = v.numeric.unwrap();
    assert_close(numeric.mean.unwrap(), 2.0, 1e-9);
    assert_close(numeric.std.unwrap(), 1.0, 1e-9);
}

#[test]
fn test_nan_removed_with_missing_values() {
    let result = clean(&load_nan_csv(), &CleaningOptions::all()).unwrap();

    assert_eq!(result.steps[0].description, "Removed 1 missing values");
    assert!(result
        .steps
        .iter()
        .all(|s| s.step != StageKind::HandleOutliers.title()));
    assert_eq!(result.final_stats.final_rows, 3);

    let values = float_values(&result.dataset, "v");
    assert_close(values[0], -1.0, 1e-9);
    assert_close(values[1], 0.0, 1e-9);
    assert_close(values[2], 1.0, 1e-9);
}

#[test]
fn test_nan_does_not_poison_outliers_or_normalization() {
    let ds = load_nan_csv();

    let outliers = handle_outliers(&ds).unwrap();
    assert_eq!(outliers.delta.values_removed, 0);
    assert_eq!(outliers.dataset.height(), 4);

    let normalized = normalize_data(&ds).unwrap();
    let values = float_values(&normalized.dataset, "v");
    assert_eq!(values.len(), 3);
    assert!(values.iter().all(|v| v.is_finite()));
    assert_eq!(total_null_count(normalized.dataset.frame()), 1);
}
