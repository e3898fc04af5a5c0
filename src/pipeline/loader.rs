//! Dataset loader for CSV, Parquet, JSON and (with the `excel` feature) workbook files

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde_json::Value;

use super::dataset::Dataset;
use super::records::frame_from_json;
use crate::utils::with_spinner;

/// Extensions `load_dataset` understands
pub const SUPPORTED_INPUTS: &[&str] = &[
    "csv", "parquet", "json", "jsonl", "ndjson", "xlsx", "xls", "xlsm", "ods",
];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file, picking the decoder from the extension.
///
/// `infer_schema_length` applies to CSV only; 0 means scan the whole file.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<Dataset> {
    let extension = extension_of(path);

    let frame = match extension.as_str() {
        "csv" => {
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .and_then(|lf| lf.collect())
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .and_then(|lf| lf.collect())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;
            frame_from_json(&value)
                .with_context(|| format!("Failed to load JSON file: {}", path.display()))?
        }
        "jsonl" | "ndjson" => load_json_lines(path)?,
        "xlsx" | "xls" | "xlsm" | "ods" => load_workbook(path)?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: {}",
            extension,
            SUPPORTED_INPUTS.join(", ")
        ),
    };

    Ok(Dataset::new(frame))
}

/// Load a dataset with a spinner, returning `(dataset, rows, cols, memory_mb)`
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(Dataset, usize, usize, f64)> {
    let dataset = with_spinner(
        &format!("Loading {}...", path.display()),
        || load_dataset(path, infer_schema_length),
        |_| "Dataset loaded".to_string(),
    )?;

    let rows = dataset.height();
    let cols = dataset.width();
    let memory_mb = dataset.estimated_size() as f64 / (1024.0 * 1024.0);

    tracing::info!(path = %path.display(), rows, cols, "dataset loaded");

    Ok((dataset, rows, cols, memory_mb))
}

fn load_json_lines(path: &Path) -> Result<DataFrame> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON lines file: {}", path.display()))?;

    let records: Vec<Value> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid JSON on line {} of {}", i + 1, path.display()))
        })
        .collect::<Result<_>>()?;

    frame_from_json(&Value::Array(records))
        .with_context(|| format!("Failed to load JSON lines file: {}", path.display()))
}

#[cfg(feature = "excel")]
fn load_workbook(path: &Path) -> Result<DataFrame> {
    use calamine::{open_workbook_auto, Data, Reader};

    use super::records::frame_from_columns;

    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow::anyhow!("Workbook has no sheets: {}", path.display()))?
        .with_context(|| format!("Failed to read first sheet of {}", path.display()))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string()).collect(),
        None => return Ok(DataFrame::empty()),
    };

    let mut columns: Vec<(String, Vec<Value>)> =
        header.into_iter().map(|name| (name, Vec::new())).collect();

    for row in rows {
        for (i, (_, values)) in columns.iter_mut().enumerate() {
            let value = match row.get(i) {
                None | Some(Data::Empty) => Value::Null,
                Some(Data::Int(v)) => Value::from(*v),
                Some(Data::Float(v)) => serde_json::Number::from_f64(*v)
                    .map_or(Value::Null, Value::Number),
                Some(Data::Bool(v)) => Value::Bool(*v),
                Some(Data::String(s)) => Value::String(s.clone()),
                Some(other) => Value::String(other.to_string()),
            };
            values.push(value);
        }
    }

    frame_from_columns(&columns)
        .with_context(|| format!("Failed to build frame from workbook: {}", path.display()))
}

#[cfg(not(feature = "excel"))]
fn load_workbook(path: &Path) -> Result<DataFrame> {
    anyhow::bail!(
        "Unsupported file format: {}. Rebuild with the `excel` feature to read workbooks",
        extension_of(path)
    )
}
