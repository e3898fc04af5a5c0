//! Error types for profiling, cleaning and export.
//!
//! Statistical edge cases (constant columns, all-null columns, single-row
//! datasets, zero-row datasets) are not errors; they have defined fallback
//! values in the profiler and the cleaning stages.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors surfaced by the cleaning core.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The cleaning options payload is malformed or names no known flag.
    ///
    /// Raised before any stage runs, so no partial cleaning happens.
    #[error("Invalid cleaning configuration: {0}")]
    InvalidConfiguration(String),

    /// Export was requested in a format other than `csv` or `json`.
    #[error("Unsupported format: {0}. Supported formats: csv, json")]
    UnsupportedFormat(String),

    /// Export was requested for an empty record set.
    #[error("No data provided")]
    NoData,

    /// A cleaning stage hit an unexpected fault.
    ///
    /// The whole run is aborted and no dataset is returned.
    #[error("Cleaning failed during '{stage}': {reason}")]
    StageFailed { stage: &'static str, reason: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CleanError>;
