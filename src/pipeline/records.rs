//! Conversion between JSON values and frames
//!
//! Used by the JSON and workbook decoders and by the export path, which all
//! start from loosely typed values and need typed polars columns.

use polars::prelude::*;
use serde_json::Value;

use super::dataset::Record;
use crate::error::{CleanError, Result};

/// Build a frame from row records.
///
/// Columns are the union of record keys in first-seen order; a key missing
/// from a record becomes a null in that row.
pub fn frame_from_records(records: &[Record]) -> PolarsResult<DataFrame> {
    let mut names: Vec<&String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.contains(&key) {
                names.push(key);
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values: Vec<&Value> = records
                .iter()
                .map(|r| r.get(name).unwrap_or(&Value::Null))
                .collect();
            build_column(name, &values)
        })
        .collect();

    DataFrame::new(columns)
}

/// Build a frame from named column arrays of equal length
pub fn frame_from_columns(columns: &[(String, Vec<Value>)]) -> PolarsResult<DataFrame> {
    let columns = columns
        .iter()
        .map(|(name, values)| {
            let refs: Vec<&Value> = values.iter().collect();
            build_column(name, &refs)
        })
        .collect();

    DataFrame::new(columns)
}

/// Build a frame from a parsed JSON document.
///
/// Accepts an array of objects (`[{"a": 1}, ...]`) or an object of column
/// arrays (`{"a": [1, 2], "b": [3, 4]}`).
pub fn frame_from_json(value: &Value) -> Result<DataFrame> {
    match value {
        Value::Array(items) => {
            let records: Vec<Record> = items
                .iter()
                .map(|item| {
                    item.as_object().cloned().ok_or_else(|| {
                        CleanError::UnsupportedFormat(
                            "JSON array entries must be objects".to_string(),
                        )
                    })
                })
                .collect::<Result<_>>()?;
            Ok(frame_from_records(&records)?)
        }
        Value::Object(map) if map.values().all(Value::is_array) => {
            let columns: Vec<(String, Vec<Value>)> = map
                .iter()
                .map(|(name, values)| {
                    let values = values.as_array().cloned().unwrap_or_default();
                    (name.clone(), values)
                })
                .collect();
            Ok(frame_from_columns(&columns)?)
        }
        _ => Err(CleanError::UnsupportedFormat(
            "JSON input must be an array of records or an object of column arrays".to_string(),
        )),
    }
}

/// Pick the narrowest column type that holds every non-null value:
/// boolean, then integer, then float, falling back to text.
fn build_column(name: &str, values: &[&Value]) -> Column {
    let present: Vec<&Value> = values.iter().copied().filter(|v| !v.is_null()).collect();

    if present.is_empty() {
        let empty: Vec<Option<f64>> = vec![None; values.len()];
        return Column::new(name.into(), empty);
    }

    if present.iter().all(|v| v.is_boolean()) {
        let bools: Vec<Option<bool>> = values.iter().map(|v| v.as_bool()).collect();
        Column::new(name.into(), bools)
    } else if present.iter().all(|v| v.is_i64()) {
        let ints: Vec<Option<i64>> = values.iter().map(|v| v.as_i64()).collect();
        Column::new(name.into(), ints)
    } else if present.iter().all(|v| v.is_number()) {
        let floats: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
        Column::new(name.into(), floats)
    } else {
        let texts: Vec<Option<String>> = values
            .iter()
            .map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), texts)
    }
}
