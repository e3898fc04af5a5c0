//! Cleanse: tabular data profiling and cleaning
//!
//! A library for profiling datasets (missing values, duplicates, per-column
//! statistics) and cleaning them with a fixed-order pipeline of missing value
//! removal, duplicate removal, IQR outlier filtering and Z-score
//! normalization, with an auditable report for every stage that ran.

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{CleanError, Result};
