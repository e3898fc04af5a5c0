//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, MultiSelect};

use crate::pipeline::{CleaningOptions, StageKind, STAGES};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to pick cleaning stages. Stages are listed in execution order.
pub fn select_stages(current: CleaningOptions) -> Result<CleaningOptions> {
    let labels: Vec<&str> = STAGES.iter().map(|s| s.kind.title()).collect();
    let defaults: Vec<bool> = STAGES.iter().map(|s| s.is_enabled(&current)).collect();

    let picked = MultiSelect::new()
        .with_prompt("Select cleaning steps (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    let mut options = CleaningOptions::default();
    for stage in picked.iter().filter_map(|&i| STAGES.get(i)) {
        match stage.kind {
            StageKind::RemoveMissingValues => options.remove_missing_values = true,
            StageKind::RemoveDuplicates => options.remove_duplicates = true,
            StageKind::HandleOutliers => options.handle_outliers = true,
            StageKind::NormalizeData => options.normalize_data = true,
        }
    }
    Ok(options)
}

/// Prompt user before replacing an existing output file
pub fn confirm_overwrite(path: &std::path::Path) -> Result<bool> {
    confirm_step(&format!("{} already exists. Overwrite?", path.display()))
}
