//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::pipeline::CleaningOptions;

/// Cleanse - profile tabular data and clean it with an auditable step pipeline
#[derive(Parser, Debug)]
#[command(name = "cleanse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase diagnostic log verbosity (-v info, -vv debug, -vvv trace).
    /// The CLEANSE_LOG environment variable takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Profile a dataset: row/column counts, missing values, duplicates and per-column statistics
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Write the analysis report (JSON) to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the analysis report as JSON instead of tables
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Clean a dataset with the selected stages and save the result
    Clean {
        #[command(flatten)]
        input: InputArgs,

        /// Output file path (CSV, Parquet or JSON, determined by extension).
        /// Defaults to cleaned_data_<timestamp>.csv next to the input file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        stages: StageFlags,

        /// Cleaning options as a JSON object, e.g. '{"removeDuplicates": true}'.
        /// Stage flags are combined with these options.
        #[arg(long)]
        options: Option<String>,

        /// Read cleaning options from a JSON file
        #[arg(long, conflicts_with = "options")]
        config: Option<PathBuf>,

        /// Write the cleaning report (JSON) to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the cleaning report as JSON instead of tables
        #[arg(long, default_value = "false")]
        json: bool,

        /// Skip interactive prompts
        #[arg(long, default_value = "false")]
        no_confirm: bool,
    },

    /// Export a JSON record set as CSV or JSON text
    Export {
        /// JSON file holding an array of records, or {"data": [...], "format": "csv"}
        #[arg(short, long)]
        input: PathBuf,

        /// Output format: csv or json. Overrides a format given in the input file.
        #[arg(short, long)]
        format: Option<String>,

        /// Output file path. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Arguments shared by commands that read a dataset
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input file path (CSV, Parquet, JSON, or Excel with the `excel` feature)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// One switch per cleaning stage
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct StageFlags {
    /// Drop rows containing any missing value
    #[arg(long)]
    pub remove_missing_values: bool,

    /// Drop repeated rows, keeping the first occurrence
    #[arg(long)]
    pub remove_duplicates: bool,

    /// Drop rows with IQR outliers in numeric columns
    #[arg(long)]
    pub handle_outliers: bool,

    /// Z-score normalize numeric columns
    #[arg(long)]
    pub normalize_data: bool,

    /// Enable every stage
    #[arg(long)]
    pub all: bool,
}

impl StageFlags {
    pub fn to_options(self) -> CleaningOptions {
        if self.all {
            return CleaningOptions::all();
        }
        CleaningOptions {
            remove_missing_values: self.remove_missing_values,
            remove_duplicates: self.remove_duplicates,
            handle_outliers: self.handle_outliers,
            normalize_data: self.normalize_data,
        }
    }
}

impl Cli {
    /// Path of the dataset the command reads, if it reads one
    pub fn input(&self) -> Option<&Path> {
        match &self.command {
            Commands::Analyze { input, .. } | Commands::Clean { input, .. } => {
                Some(input.input.as_path())
            }
            Commands::Export { input, .. } => Some(input.as_path()),
        }
    }
}
