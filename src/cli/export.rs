//! `cleanse export`: serialize a JSON record set as CSV or JSON

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::pipeline::Record;
use crate::report::{export_records_as, ExportedContent};
use crate::utils::print_success;

/// Format used when neither the command line nor the input names one
pub const DEFAULT_EXPORT_FORMAT: &str = "csv";

/// Split an export request into its records and optional format.
///
/// Accepts a bare array of records or an envelope
/// `{"data": [...], "format": "json"}`.
pub fn parse_export_request(value: Value) -> Result<(Vec<Record>, Option<String>)> {
    let (data, format) = match value {
        Value::Array(items) => (items, None),
        Value::Object(mut envelope) => {
            let format = envelope
                .get("format")
                .and_then(Value::as_str)
                .map(str::to_string);
            let data = match envelope.remove("data") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => anyhow::bail!("'data' must be an array of records"),
            };
            (data, format)
        }
        _ => anyhow::bail!("Export input must be an array of records or an object with 'data'"),
    };

    let records = data
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            _ => anyhow::bail!("Record {} is not a JSON object", i),
        })
        .collect::<Result<Vec<Record>>>()?;

    Ok((records, format))
}

/// Export the records in `input` and write them to `output` (or stdout)
pub fn run_export(input: &Path, format: Option<&str>, output: Option<&Path>) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read export input: {}", input.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse export input: {}", input.display()))?;

    let (records, file_format) = parse_export_request(value)?;
    let format = format
        .map(str::to_string)
        .or(file_format)
        .unwrap_or_else(|| DEFAULT_EXPORT_FORMAT.to_string());

    let exported: ExportedContent = export_records_as(&records, &format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &exported.content)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            print_success(&format!(
                "Exported {} records as {} ({}) to {}",
                records.len(),
                exported.format,
                exported.mimetype,
                path.display()
            ));
        }
        None => print!("{}", exported.content),
    }

    Ok(())
}
