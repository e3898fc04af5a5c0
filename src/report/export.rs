//! Export of record sets as CSV or JSON text

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CleanError, Result};
use crate::pipeline::{frame_from_records, Record};

/// Formats a record set can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn mimetype(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(CleanError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Serialized export with its declared MIME type
#[derive(Debug, Clone, Serialize)]
pub struct ExportedContent {
    pub content: String,
    pub format: ExportFormat,
    pub mimetype: &'static str,
}

/// Serialize `records` in the requested format.
///
/// CSV goes through a typed frame. JSON keeps every value as given. In both
/// formats the columns are the union of record keys in first-seen order, and
/// a key absent from a record becomes an empty CSV cell or a JSON `null`.
pub fn export_records(records: &[Record], format: ExportFormat) -> Result<ExportedContent> {
    if records.is_empty() {
        return Err(CleanError::NoData);
    }

    let content = match format {
        ExportFormat::Csv => {
            let mut df = frame_from_records(records)?;
            let mut buffer: Vec<u8> = Vec::new();
            CsvWriter::new(&mut buffer).finish(&mut df)?;
            String::from_utf8_lossy(&buffer).into_owned()
        }
        ExportFormat::Json => serde_json::to_string_pretty(&align_records(records))?,
    };

    tracing::debug!(format = %format, records = records.len(), "exported records");

    Ok(ExportedContent {
        content,
        format,
        mimetype: format.mimetype(),
    })
}

/// Give every record the same keys, in first-seen order, filling gaps with null
fn align_records(records: &[Record]) -> Vec<Record> {
    let mut keys: Vec<&String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    records
        .iter()
        .map(|record| {
            keys.iter()
                .map(|&key| (key.clone(), record.get(key).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect()
}

/// Parse the format name, then export
pub fn export_records_as(records: &[Record], format: &str) -> Result<ExportedContent> {
    let format: ExportFormat = format.parse()?;
    export_records(records, format)
}
