//! Terminal styling utilities

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

use crate::pipeline::{CleaningOptions, STAGES};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("cleanse").cyan().bold(),
        style("Profile it, clean it, keep the receipts").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the input/output paths and the stages that will run, in run order
pub fn print_options(input: &Path, output: &Path, options: &CleaningOptions) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {:<w$}│", style("⚙️  Configuration").cyan().bold(), w = box_width - 3);
    println!("    ├{}┤", line);
    println!(
        "    │  {}Input:  {:<w$}│",
        FOLDER,
        truncate_path(input, 38),
        w = box_width - 14
    );
    println!(
        "    │  {}Output: {:<w$}│",
        SAVE,
        truncate_path(output, 38),
        w = box_width - 14
    );
    println!("    ├{}┤", line);
    for stage in &STAGES {
        let mark = if stage.is_enabled(options) {
            style("✓").green().bold()
        } else {
            style("·").dim()
        };
        println!(
            "    │  {} {:<w$}│",
            mark,
            stage.kind.title(),
            w = box_width - 7
        );
    }
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}{}",
        CLOCK,
        style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {}{}",
        ROCKET,
        style("Cleaning complete!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
