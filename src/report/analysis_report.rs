//! JSON report envelopes for analysis and cleaning runs

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    CleaningOptions, CleaningResult, Dataset, DatasetStats, FinalStats, Record, StepReport,
};

/// Metadata about the run
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// Cleanse version
    pub cleanse_version: String,
    /// Input file path
    pub input_file: String,
}

impl ReportMetadata {
    pub fn new(input_file: &Path) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            cleanse_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
        }
    }
}

/// Result of `cleanse analyze`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub metadata: ReportMetadata,
    pub stats: DatasetStats,
    /// Size of the input file in bytes
    pub file_size: u64,
    pub preview: Vec<Record>,
}

impl AnalysisReport {
    pub fn new(input_file: &Path, dataset: &Dataset, stats: DatasetStats) -> Self {
        let file_size = std::fs::metadata(input_file).map(|m| m.len()).unwrap_or(0);
        Self {
            success: true,
            metadata: ReportMetadata::new(input_file),
            stats,
            file_size,
            preview: dataset.preview(),
        }
    }
}

/// Result of `cleanse clean`
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub success: bool,
    pub metadata: ReportMetadata,
    pub options: CleaningOptions,
    pub cleaning_steps: Vec<StepReport>,
    pub final_stats: FinalStats,
    pub preview: Vec<Record>,
    /// File name of the persisted cleaned dataset
    pub cleaned_file: String,
}

impl CleaningReport {
    pub fn new(
        input_file: &Path,
        options: CleaningOptions,
        result: &CleaningResult,
        cleaned_file: &Path,
    ) -> Self {
        let cleaned_file = cleaned_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| cleaned_file.display().to_string());

        Self {
            success: true,
            metadata: ReportMetadata::new(input_file),
            options,
            cleaning_steps: result.steps.clone(),
            final_stats: result.final_stats,
            preview: result.preview(),
            cleaned_file,
        }
    }
}

/// Pretty-printed JSON of a report
pub fn report_to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}

/// Write a report to a JSON file
///
/// # Arguments
/// * `report` - Analysis or cleaning report
/// * `output_path` - Path to write the JSON file
pub fn write_report<T: Serialize>(report: &T, output_path: &Path) -> Result<()> {
    let json = report_to_json(report)?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}
