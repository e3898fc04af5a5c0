//! Column statistics shared by the profiler and the cleaning stages
//!
//! Everything that counts nulls, compares cells for equality, or reduces a
//! numeric column to min/max/mean/std/quantiles lives here so the profiler
//! and the cleaning stages agree on the exact same numbers.

use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;
use serde_json::{Number, Value};

/// Number of non-null sample values reported per column
pub const SAMPLE_SIZE: usize = 5;

/// Hashable identity of a single cell, compared by value.
///
/// Integers and integral floats share the `Int` variant so that `2` and
/// `2.0` are the same value regardless of the column's physical dtype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Bool(bool),
    Int(i128),
    Float(u64),
    Text(String),
    Other(String),
}

impl CellKey {
    pub fn from_any_value(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => CellKey::Null,
            AnyValue::Boolean(b) => CellKey::Bool(*b),
            AnyValue::Int8(v) => CellKey::Int(i128::from(*v)),
            AnyValue::Int16(v) => CellKey::Int(i128::from(*v)),
            AnyValue::Int32(v) => CellKey::Int(i128::from(*v)),
            AnyValue::Int64(v) => CellKey::Int(i128::from(*v)),
            AnyValue::UInt8(v) => CellKey::Int(i128::from(*v)),
            AnyValue::UInt16(v) => CellKey::Int(i128::from(*v)),
            AnyValue::UInt32(v) => CellKey::Int(i128::from(*v)),
            AnyValue::UInt64(v) => CellKey::Int(i128::from(*v)),
            AnyValue::Float32(v) => CellKey::from_float(f64::from(*v)),
            AnyValue::Float64(v) => CellKey::from_float(*v),
            AnyValue::String(s) => CellKey::Text((*s).to_string()),
            AnyValue::StringOwned(s) => CellKey::Text(s.to_string()),
            other => CellKey::Other(other.to_string()),
        }
    }

    fn from_float(v: f64) -> Self {
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= u64::MAX as f64 {
            // -0.0 lands here too and collapses onto 0
            CellKey::Int(v as i128)
        } else if v.is_nan() {
            CellKey::Float(f64::NAN.to_bits())
        } else {
            CellKey::Float(v.to_bits())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellKey::Null)
    }
}

/// Min/max/mean/std of the non-null values of a numeric column.
///
/// Each field is `None` when it cannot be computed: all four when the
/// column has no non-null value, `std` alone when there is exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NumericSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

impl NumericSummary {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            min: Some(min),
            max: Some(max),
            mean: mean(values),
            std: sample_std(values),
        }
    }
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N-1 denominator).
///
/// Returns `None` for fewer than two values, where the estimator is undefined.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Quantile of an ascending-sorted slice using linear interpolation
/// between closest ranks (`pos = q * (n - 1)`).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let lo = *sorted.get(lower)?;
    let hi = *sorted.get(upper)?;

    Some(lo + (hi - lo) * (pos - lower as f64))
}

/// Column values cast to `f64`, nulls preserved as `None`
pub fn numeric_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let casted = column.cast(&DataType::Float64)?;
    Ok(casted.f64()?.iter().collect())
}

/// Drop the nulls, keeping row order
pub fn non_null(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Value keys for every cell of a column, in row order
pub fn column_keys(column: &Column) -> Vec<CellKey> {
    column
        .as_materialized_series()
        .iter()
        .map(|v| CellKey::from_any_value(&v))
        .collect()
}

/// Number of distinct non-null values
pub fn unique_count(keys: &[CellKey]) -> usize {
    keys.iter()
        .filter(|k| !k.is_null())
        .collect::<HashSet<_>>()
        .len()
}

/// Total number of null cells across all columns
pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

/// Full-row value tuples, one per row
pub fn row_keys(df: &DataFrame) -> Vec<Vec<CellKey>> {
    let mut rows: Vec<Vec<CellKey>> = (0..df.height())
        .map(|_| Vec::with_capacity(df.width()))
        .collect();

    for column in df.get_columns() {
        for (row, key) in rows.iter_mut().zip(column_keys(column)) {
            row.push(key);
        }
    }

    rows
}

/// `true` for the first occurrence of each distinct row, `false` for later repeats
pub fn first_occurrence_mask(df: &DataFrame) -> Vec<bool> {
    let rows = row_keys(df);
    let mut seen: HashSet<&Vec<CellKey>> = HashSet::with_capacity(rows.len());
    rows.iter().map(|row| seen.insert(row)).collect()
}

/// Rows that repeat an earlier row exactly, across all columns
pub fn duplicate_count(df: &DataFrame) -> usize {
    first_occurrence_mask(df).iter().filter(|&&keep| !keep).count()
}

/// Convert a single cell to JSON for previews and samples
pub fn cell_to_json(value: &AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => float_to_json(f64::from(*v)),
        AnyValue::Float64(v) => float_to_json(*v),
        AnyValue::String(s) => Value::String((*s).to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(v: f64) -> Value {
    // NaN and infinities have no JSON representation
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// First `limit` non-null values of a column, in row order
pub fn sample_values(column: &Column, limit: usize) -> Vec<Value> {
    column
        .as_materialized_series()
        .iter()
        .filter(|v| !v.is_null())
        .take(limit)
        .map(|v| cell_to_json(&v))
        .collect()
}
