//! `cleanse clean`: run the cleaning pipeline and persist the result

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;

use super::args::{InputArgs, StageFlags};
use super::prompts::{confirm_overwrite, select_stages};
use crate::pipeline::{
    clean, default_output_path, load_dataset_with_progress, save_dataset, CleaningOptions,
};
use crate::report::{report_to_json, write_report, CleaningReport, CleaningSummary};
use crate::utils::{
    print_banner, print_completion, print_info, print_options, print_step_header,
    print_step_time, print_success, with_spinner,
};

/// Parameters of a `clean` invocation
#[derive(Debug, Clone)]
pub struct CleanParams<'a> {
    pub input: &'a InputArgs,
    pub output: Option<&'a Path>,
    pub stages: StageFlags,
    pub options: Option<&'a str>,
    pub config: Option<&'a Path>,
    pub report: Option<&'a Path>,
    pub json: bool,
    pub no_confirm: bool,
}

/// Combine the JSON payload (inline or from a file) with the stage flags.
///
/// A malformed payload is rejected here, before anything is loaded.
pub fn resolve_options(
    stages: StageFlags,
    options: Option<&str>,
    config: Option<&Path>,
) -> Result<CleaningOptions> {
    let base = match (options, config) {
        (Some(payload), _) => CleaningOptions::from_json(payload)?,
        (None, Some(path)) => CleaningOptions::from_file(path)
            .with_context(|| format!("Failed to load cleaning options from {}", path.display()))?,
        (None, None) => CleaningOptions::default(),
    };
    Ok(base.merge(stages.to_options()))
}

/// Run the cleaning pipeline end to end
pub fn run_clean(params: &CleanParams<'_>) -> Result<()> {
    let mut options = resolve_options(params.stages, params.options, params.config)?;
    let interactive = !params.no_confirm && !params.json;

    if !options.any_enabled() && interactive {
        options = select_stages(options)?;
    }

    let output_path: PathBuf = params
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(&params.input.input, &Local::now()));

    if output_path.exists() && interactive && !confirm_overwrite(&output_path)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    if !params.json {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_options(&params.input.input, &output_path, &options);
        print_step_header(1, "Load Dataset");
    }

    let step_start = Instant::now();
    let (dataset, rows, cols, _memory_mb) =
        load_dataset_with_progress(&params.input.input, params.input.infer_schema_length)?;

    if !params.json {
        print_info(&format!("{} rows × {} columns", rows, cols));
        print_step_time(step_start.elapsed());
        print_step_header(2, "Clean");
    }

    let step_start = Instant::now();
    if !options.any_enabled() {
        tracing::warn!("no cleaning stage enabled; the dataset is saved unchanged");
    }
    let result = with_spinner(
        "Running cleaning stages...",
        || clean(&dataset, &options),
        |r| format!("{} step(s) recorded", r.steps.len()),
    )?;

    if !params.json {
        for step in &result.steps {
            print_success(&format!("{}: {}", step.step, step.description));
        }
        print_step_time(step_start.elapsed());
        print_step_header(3, "Save Results");
    }

    let step_start = Instant::now();
    with_spinner(
        "Writing output file...",
        || save_dataset(&result.dataset, &output_path),
        |_| format!("Saved to {}", output_path.display()),
    )?;

    let report = CleaningReport::new(&params.input.input, options, &result, &output_path);

    if params.json {
        println!("{}", report_to_json(&report)?);
    } else {
        print_step_time(step_start.elapsed());
        CleaningSummary::new(&result.steps, &result.final_stats).display();
    }

    if let Some(path) = params.report {
        write_report(&report, path)?;
        if !params.json {
            print_success(&format!("Report saved to {}", path.display()));
        }
    }

    if !params.json {
        print_completion();
    }

    Ok(())
}
