//! Persisting cleaned datasets and naming output files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use polars::prelude::*;

use super::dataset::Dataset;

/// File name for a cleaned dataset written at `timestamp`,
/// e.g. `cleaned_data_20240131_154500.csv`
pub fn cleaned_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("cleaned_data_{}.csv", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Default output path: a timestamped CSV next to the input file
pub fn default_output_path<Tz: TimeZone>(input: &Path, timestamp: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    parent.join(cleaned_file_name(timestamp))
}

/// Save a dataset to file (CSV, Parquet or JSON based on extension)
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut df = dataset.frame().clone();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        "json" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let records = dataset.records(dataset.height());
            serde_json::to_writer_pretty(std::io::BufWriter::new(file), &records)
                .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet, json",
            extension
        ),
    }

    tracing::info!(path = %path.display(), rows = dataset.height(), "dataset saved");

    Ok(())
}
