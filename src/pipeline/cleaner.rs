//! Cleaning pipeline driver

use serde::Serialize;

use super::column_stats::{duplicate_count, total_null_count};
use super::dataset::{Dataset, Record};
use super::options::CleaningOptions;
use super::stages::{StepReport, STAGES};
use crate::error::{CleanError, Result};

/// Before/after summary of a cleaning run, recomputed on the final dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinalStats {
    pub original_rows: usize,
    pub original_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub rows_removed: usize,
    pub missing_values: usize,
    pub duplicates: usize,
}

/// Everything a cleaning run produces
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub dataset: Dataset,
    pub steps: Vec<StepReport>,
    pub final_stats: FinalStats,
}

impl CleaningResult {
    pub fn preview(&self) -> Vec<Record> {
        self.dataset.preview()
    }
}

/// Run every enabled stage, in the fixed stage order, on `dataset`.
///
/// Each stage consumes the dataset produced by the previous one. The input
/// is not modified. If any stage fails the whole run fails and no partial
/// dataset is returned.
pub fn clean(dataset: &Dataset, options: &CleaningOptions) -> Result<CleaningResult> {
    let mut current = dataset.clone();
    let mut steps = Vec::new();

    for stage in STAGES.iter().filter(|s| s.is_enabled(options)) {
        let outcome = (stage.transform)(&current).map_err(|e| CleanError::StageFailed {
            stage: stage.kind.title(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            stage = %stage.kind,
            rows_before = outcome.delta.rows_before,
            rows_after = outcome.delta.rows_after,
            "stage complete"
        );

        if let Some(report) = (stage.report)(&outcome.delta) {
            steps.push(report);
        }
        current = outcome.dataset;
    }

    let final_stats = FinalStats {
        original_rows: dataset.height(),
        original_columns: dataset.width(),
        final_rows: current.height(),
        final_columns: current.width(),
        rows_removed: dataset.height() - current.height(),
        missing_values: total_null_count(current.frame()),
        duplicates: duplicate_count(current.frame()),
    };

    tracing::info!(
        original_rows = final_stats.original_rows,
        final_rows = final_stats.final_rows,
        steps = steps.len(),
        "cleaning finished"
    );

    Ok(CleaningResult {
        dataset: current,
        steps,
        final_stats,
    })
}
