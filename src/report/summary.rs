//! Console summaries for profiles and cleaning runs

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{DatasetStats, FinalStats, StepReport};

fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!(
        "    {} {}",
        style(icon).cyan(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Profile of a dataset, as shown by `cleanse analyze`
pub struct ProfileSummary<'a> {
    pub stats: &'a DatasetStats,
}

impl<'a> ProfileSummary<'a> {
    pub fn new(stats: &'a DatasetStats) -> Self {
        Self { stats }
    }

    pub fn display(&self) {
        let stats = self.stats;
        print_section("📋", "DATASET PROFILE");

        let mut overview = Table::new();
        overview.load_preset(UTF8_FULL_CONDENSED);
        overview.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);
        overview.add_row(vec![Cell::new("📁 Rows"), Cell::new(stats.rows)]);
        overview.add_row(vec![Cell::new("🧱 Columns"), Cell::new(stats.columns)]);
        overview.add_row(vec![
            Cell::new("❓ Missing values"),
            Cell::new(stats.missing_values).fg(if stats.missing_values == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        overview.add_row(vec![
            Cell::new("🔁 Duplicate rows"),
            Cell::new(stats.duplicates).fg(if stats.duplicates == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        overview.add_row(vec![
            Cell::new("💾 Estimated memory"),
            Cell::new(format!("{:.2} MB", stats.memory_mb())),
        ]);
        print_indented(&overview);

        if stats.column_info.is_empty() {
            return;
        }

        print_section("🔎", "COLUMNS");

        let mut columns = Table::new();
        columns.load_preset(UTF8_FULL_CONDENSED);
        columns.set_header(
            ["Column", "Type", "Missing", "Unique", "Min", "Max", "Mean", "Std"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for col in stats.column_info.iter() {
            let numeric = col.numeric.unwrap_or_default();
            let (min, max, mean, std) = if col.numeric.is_some() {
                (
                    format_stat(numeric.min),
                    format_stat(numeric.max),
                    format_stat(numeric.mean),
                    format_stat(numeric.std),
                )
            } else {
                Default::default()
            };

            columns.add_row(vec![
                Cell::new(&col.name).add_attribute(Attribute::Bold),
                Cell::new(format!("{} ({})", col.dtype, col.kind)),
                Cell::new(col.missing_count).fg(if col.missing_count == 0 {
                    Color::White
                } else {
                    Color::Yellow
                }),
                Cell::new(col.unique_count),
                Cell::new(min),
                Cell::new(max),
                Cell::new(mean),
                Cell::new(std),
            ]);
        }
        print_indented(&columns);
    }
}

/// Audit trail of a cleaning run, as shown by `cleanse clean`
pub struct CleaningSummary<'a> {
    pub steps: &'a [StepReport],
    pub final_stats: &'a FinalStats,
}

impl<'a> CleaningSummary<'a> {
    pub fn new(steps: &'a [StepReport], final_stats: &'a FinalStats) -> Self {
        Self { steps, final_stats }
    }

    pub fn display(&self) {
        print_section("🧹", "CLEANING STEPS");

        if self.steps.is_empty() {
            println!("      {}", style("No cleaning steps were applied").dim());
        } else {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Step").add_attribute(Attribute::Bold),
                Cell::new("Description").add_attribute(Attribute::Bold),
                Cell::new("Rows removed").add_attribute(Attribute::Bold),
            ]);

            for (i, step) in self.steps.iter().enumerate() {
                let removed = step
                    .rows_removed
                    .map_or_else(|| "-".to_string(), |n| n.to_string());
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(&step.step).fg(Color::Cyan),
                    Cell::new(&step.description),
                    Cell::new(removed),
                ]);
            }
            print_indented(&table);
        }

        print_section("📋", "CLEANING SUMMARY");

        let fs = self.final_stats;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Before").add_attribute(Attribute::Bold),
            Cell::new("After").add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("📁 Rows"),
            Cell::new(fs.original_rows),
            Cell::new(fs.final_rows)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🧱 Columns"),
            Cell::new(fs.original_columns),
            Cell::new(fs.final_columns),
        ]);
        table.add_row(vec![
            Cell::new("❓ Missing values"),
            Cell::new("-"),
            Cell::new(fs.missing_values),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Duplicate rows"),
            Cell::new("-"),
            Cell::new(fs.duplicates),
        ]);

        let removed_pct = if fs.original_rows > 0 {
            (fs.rows_removed as f64 / fs.original_rows as f64) * 100.0
        } else {
            0.0
        };

        let color = if removed_pct > 30.0 {
            Color::Red
        } else if removed_pct > 10.0 {
            Color::Yellow
        } else {
            Color::Cyan
        };

        table.add_row(vec![
            Cell::new("🗑️  Rows removed"),
            Cell::new(""),
            Cell::new(format!("{} ({:.1}%)", fs.rows_removed, removed_pct))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        print_indented(&table);
    }
}
