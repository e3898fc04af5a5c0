//! `cleanse analyze`: profile a dataset

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use super::args::InputArgs;
use crate::pipeline::{load_dataset_with_progress, profile};
use crate::report::{report_to_json, write_report, AnalysisReport, ProfileSummary};
use crate::utils::{
    print_banner, print_info, print_step_header, print_step_time, print_success, with_spinner,
};

/// Run the analysis and print or save the report
///
/// # Arguments
/// * `input` - Dataset path and CSV schema inference length
/// * `report_path` - Optional path for the JSON report
/// * `json` - Print the report as JSON on stdout instead of tables
pub fn run_analyze(input: &InputArgs, report_path: Option<&Path>, json: bool) -> Result<()> {
    if !json {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_step_header(1, "Load Dataset");
    }

    let step_start = Instant::now();
    let (dataset, rows, cols, memory_mb) =
        load_dataset_with_progress(&input.input, input.infer_schema_length)?;

    if !json {
        print_info(&format!(
            "{} rows × {} columns, estimated memory {:.2} MB",
            rows, cols, memory_mb
        ));
        print_step_time(step_start.elapsed());
        print_step_header(2, "Profile");
    }

    let step_start = Instant::now();
    let stats = with_spinner("Profiling columns...", || profile(&dataset), |s| {
        format!("Profiled {} columns", s.columns)
    })?;
    let report = AnalysisReport::new(&input.input, &dataset, stats);

    if json {
        println!("{}", report_to_json(&report)?);
    } else {
        print_step_time(step_start.elapsed());
        ProfileSummary::new(&report.stats).display();
    }

    if let Some(path) = report_path {
        write_report(&report, path)?;
        if !json {
            print_success(&format!("Report saved to {}", path.display()));
        }
    }

    Ok(())
}
