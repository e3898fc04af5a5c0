//! Dataset profiling: dataset-wide and per-column descriptive statistics

use polars::prelude::*;
use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::column_stats::{
    column_keys, duplicate_count, non_null, numeric_values, sample_values, total_null_count,
    unique_count, NumericSummary, SAMPLE_SIZE,
};
use super::dataset::{ColumnKind, Dataset};
use crate::error::Result;

/// Profile of a single column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    #[serde(skip)]
    pub name: String,
    /// Physical dtype label, e.g. `i64`, `f64`, `str`
    #[serde(rename = "type")]
    pub dtype: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub unique_count: usize,
    pub sample_values: Vec<Value>,
    /// Only present for numeric columns
    #[serde(flatten)]
    pub numeric: Option<NumericSummary>,
}

/// Per-column profiles, serialized as an object keyed by column name in
/// column order
#[derive(Debug, Clone, Default)]
pub struct ColumnInfo(pub Vec<ColumnStats>);

impl ColumnInfo {
    pub fn get(&self, name: &str) -> Option<&ColumnStats> {
        self.0.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnStats> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ColumnInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for stats in &self.0 {
            map.serialize_entry(&stats.name, stats)?;
        }
        map.end()
    }
}

/// Dataset-wide profile
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub missing_values: usize,
    pub duplicates: usize,
    pub column_info: ColumnInfo,
    pub data_types: serde_json::Map<String, Value>,
    /// Estimated bytes held by the in-memory representation (advisory)
    pub memory_usage: usize,
}

impl DatasetStats {
    pub fn memory_mb(&self) -> f64 {
        self.memory_usage as f64 / (1024.0 * 1024.0)
    }
}

/// Compute the profile of a dataset.
///
/// Pure: the dataset is only read. A zero-row dataset yields zero counts,
/// empty samples and unavailable numeric extras.
pub fn profile(dataset: &Dataset) -> Result<DatasetStats> {
    // Columns are independent, so they can be profiled in parallel;
    // collect() keeps column order.
    let column_stats: Vec<ColumnStats> = dataset
        .columns()
        .par_iter()
        .zip(dataset.kinds().par_iter())
        .map(|(column, kind)| profile_column(column, *kind))
        .collect::<PolarsResult<Vec<_>>>()?;

    let data_types = column_stats
        .iter()
        .map(|c| (c.name.clone(), Value::String(c.dtype.clone())))
        .collect();

    let frame = dataset.frame();
    let stats = DatasetStats {
        rows: dataset.height(),
        columns: dataset.width(),
        missing_values: total_null_count(frame),
        duplicates: duplicate_count(frame),
        column_info: ColumnInfo(column_stats),
        data_types,
        memory_usage: dataset.estimated_size(),
    };

    tracing::debug!(
        rows = stats.rows,
        columns = stats.columns,
        missing = stats.missing_values,
        duplicates = stats.duplicates,
        "profiled dataset"
    );

    Ok(stats)
}

/// Profile a single column given its semantic kind
pub fn profile_column(column: &Column, kind: ColumnKind) -> PolarsResult<ColumnStats> {
    let keys = column_keys(column);

    let numeric = if kind.is_numeric() {
        let values = non_null(&numeric_values(column)?);
        Some(NumericSummary::from_values(&values))
    } else {
        None
    };

    Ok(ColumnStats {
        name: column.name().to_string(),
        dtype: column.dtype().to_string(),
        kind,
        missing_count: column.null_count(),
        unique_count: unique_count(&keys),
        sample_values: sample_values(column, SAMPLE_SIZE),
        numeric,
    })
}
