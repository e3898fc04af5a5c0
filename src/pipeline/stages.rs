//! Cleaning stages and their fixed execution order
//!
//! Each stage is a pure transform `&Dataset -> StageOutcome` plus a reporter
//! that turns the outcome's delta into an optional [`StepReport`]. The
//! [`STAGES`] table is the single place that defines which stages exist and
//! in which order they run:
//!
//! 1. Remove Missing Values
//! 2. Remove Duplicates
//! 3. Handle Outliers (IQR)
//! 4. Normalize Data (Z-score)
//!
//! Outlier detection runs on de-duplicated, null-free data, and
//! normalization runs last because outlier removal shifts mean and std.

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::column_stats::{
    first_occurrence_mask, duplicate_count, mean, non_null, numeric_values, quantile_sorted,
    sample_std, total_null_count,
};
use super::dataset::Dataset;
use super::options::CleaningOptions;

/// IQR multiplier for the outlier fences
pub const IQR_FACTOR: f64 = 1.5;

/// Audit-trail entry for one executed stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_removed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_normalized: Option<usize>,
}

/// What a stage changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageDelta {
    pub rows_before: usize,
    pub rows_after: usize,
    /// Stage-specific count: null cells, duplicate rows or outlier rows removed
    pub values_removed: usize,
    /// Columns the stage iterated over
    pub columns_affected: usize,
}

impl StageDelta {
    pub fn rows_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Result of running one stage
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub dataset: Dataset,
    pub delta: StageDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    RemoveMissingValues,
    RemoveDuplicates,
    HandleOutliers,
    NormalizeData,
}

impl StageKind {
    pub fn title(&self) -> &'static str {
        match self {
            StageKind::RemoveMissingValues => "Remove Missing Values",
            StageKind::RemoveDuplicates => "Remove Duplicates",
            StageKind::HandleOutliers => "Handle Outliers",
            StageKind::NormalizeData => "Normalize Data",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Stage descriptor: when it runs, what it does, how it is reported
pub struct Stage {
    pub kind: StageKind,
    pub enabled: fn(&CleaningOptions) -> bool,
    pub transform: fn(&Dataset) -> PolarsResult<StageOutcome>,
    pub report: fn(&StageDelta) -> Option<StepReport>,
}

impl Stage {
    pub fn is_enabled(&self, options: &CleaningOptions) -> bool {
        (self.enabled)(options)
    }
}

/// All stages in execution order
pub const STAGES: [Stage; 4] = [
    Stage {
        kind: StageKind::RemoveMissingValues,
        enabled: |o| o.remove_missing_values,
        transform: remove_missing_values,
        report: report_missing_values,
    },
    Stage {
        kind: StageKind::RemoveDuplicates,
        enabled: |o| o.remove_duplicates,
        transform: remove_duplicates,
        report: report_duplicates,
    },
    Stage {
        kind: StageKind::HandleOutliers,
        enabled: |o| o.handle_outliers,
        transform: handle_outliers,
        report: report_outliers,
    },
    Stage {
        kind: StageKind::NormalizeData,
        enabled: |o| o.normalize_data,
        transform: normalize_data,
        report: report_normalization,
    },
];

/// Drop every row that has a null in any column.
///
/// `values_removed` is the drop in total null cells, i.e. the nulls that
/// were held by the dropped rows.
pub fn remove_missing_values(dataset: &Dataset) -> PolarsResult<StageOutcome> {
    let nulls_before = total_null_count(dataset.frame());

    let mut keep = vec![true; dataset.height()];
    for column in dataset.columns() {
        if column.null_count() == 0 {
            continue;
        }
        let is_null = column.as_materialized_series().is_null();
        for (k, null) in keep.iter_mut().zip(is_null.into_iter()) {
            if null.unwrap_or(false) {
                *k = false;
            }
        }
    }

    let cleaned = dataset.filter_rows(&keep)?;
    let nulls_after = total_null_count(cleaned.frame());

    Ok(StageOutcome {
        delta: StageDelta {
            rows_before: dataset.height(),
            rows_after: cleaned.height(),
            values_removed: nulls_before - nulls_after,
            columns_affected: 0,
        },
        dataset: cleaned,
    })
}

/// Keep the first occurrence of each distinct full row
pub fn remove_duplicates(dataset: &Dataset) -> PolarsResult<StageOutcome> {
    let keep = first_occurrence_mask(dataset.frame());
    let duplicates_before = keep.iter().filter(|&&k| !k).count();

    let cleaned = dataset.filter_rows(&keep)?;
    let duplicates_after = duplicate_count(cleaned.frame());

    Ok(StageOutcome {
        delta: StageDelta {
            rows_before: dataset.height(),
            rows_after: cleaned.height(),
            values_removed: duplicates_before - duplicates_after,
            columns_affected: 0,
        },
        dataset: cleaned,
    })
}

/// Inclusive IQR fences `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]` of the given values.
///
/// `None` when there is no value to compute quartiles from.
pub fn iqr_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;

    Some((q1 - IQR_FACTOR * iqr, q3 + IQR_FACTOR * iqr))
}

/// Remove rows holding an out-of-fence value in any numeric column.
///
/// Columns are processed one after another in column order and each
/// column's fences are computed on the rows that survived the previous
/// columns, so this chain must stay sequential. Nulls are never outliers.
pub fn handle_outliers(dataset: &Dataset) -> PolarsResult<StageOutcome> {
    let mut current = dataset.clone();
    let mut removed = 0;
    let numeric_columns = dataset.numeric_columns();

    for name in &numeric_columns {
        let values = numeric_values(current.column(name)?)?;
        let Some((lower, upper)) = iqr_bounds(&non_null(&values)) else {
            continue;
        };

        let keep: Vec<bool> = values
            .iter()
            .map(|v| v.map_or(true, |v| v >= lower && v <= upper))
            .collect();
        let outliers = keep.iter().filter(|&&k| !k).count();

        tracing::debug!(column = %name, lower, upper, outliers, "outlier fences");

        if outliers > 0 {
            current = current.filter_rows(&keep)?;
            removed += outliers;
        }
    }

    Ok(StageOutcome {
        delta: StageDelta {
            rows_before: dataset.height(),
            rows_after: current.height(),
            values_removed: removed,
            columns_affected: numeric_columns.len(),
        },
        dataset: current,
    })
}

/// Z-score every numeric column whose sample std is available and nonzero.
///
/// Constant columns, and columns with fewer than two values, are left as
/// they are. Nulls stay null.
pub fn normalize_data(dataset: &Dataset) -> PolarsResult<StageOutcome> {
    let columns: Vec<Column> = dataset
        .columns()
        .par_iter()
        .zip(dataset.kinds().par_iter())
        .map(|(column, kind)| {
            if kind.is_numeric() {
                zscore_column(column)
            } else {
                Ok(column.clone())
            }
        })
        .collect::<PolarsResult<Vec<_>>>()?;

    let numeric_count = dataset.numeric_columns().len();
    let normalized = dataset.with_columns(columns)?;

    Ok(StageOutcome {
        delta: StageDelta {
            rows_before: dataset.height(),
            rows_after: normalized.height(),
            values_removed: 0,
            columns_affected: numeric_count,
        },
        dataset: normalized,
    })
}

fn zscore_column(column: &Column) -> PolarsResult<Column> {
    let values = numeric_values(column)?;
    let present = non_null(&values);

    let (Some(m), Some(std)) = (mean(&present), sample_std(&present)) else {
        return Ok(column.clone());
    };
    if std == 0.0 {
        return Ok(column.clone());
    }

    let scaled: Vec<Option<f64>> = values.iter().map(|v| v.map(|v| (v - m) / std)).collect();
    Ok(Column::new(column.name().clone(), scaled))
}

fn report_missing_values(delta: &StageDelta) -> Option<StepReport> {
    Some(StepReport {
        step: StageKind::RemoveMissingValues.title().to_string(),
        description: format!("Removed {} missing values", delta.values_removed),
        rows_removed: Some(delta.rows_removed()),
        columns_normalized: None,
    })
}

fn report_duplicates(delta: &StageDelta) -> Option<StepReport> {
    Some(StepReport {
        step: StageKind::RemoveDuplicates.title().to_string(),
        description: format!("Removed {} duplicate rows", delta.values_removed),
        rows_removed: Some(delta.rows_removed()),
        columns_normalized: None,
    })
}

fn report_outliers(delta: &StageDelta) -> Option<StepReport> {
    if delta.values_removed == 0 {
        return None;
    }
    Some(StepReport {
        step: StageKind::HandleOutliers.title().to_string(),
        description: format!(
            "Removed {} outliers using IQR method",
            delta.values_removed
        ),
        rows_removed: Some(delta.values_removed),
        columns_normalized: None,
    })
}

fn report_normalization(delta: &StageDelta) -> Option<StepReport> {
    Some(StepReport {
        step: StageKind::NormalizeData.title().to_string(),
        description: format!(
            "Normalized {} numeric columns using Z-score",
            delta.columns_affected
        ),
        rows_removed: None,
        columns_normalized: Some(delta.columns_affected),
    })
}
