//! Cleanse: tabular data profiling and cleaning CLI

use anyhow::Result;
use clap::Parser;

use cleanse::cli::{run_analyze, run_clean, run_export, CleanParams, Cli, Commands};
use cleanse::utils::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if let Some(input) = cli.input() {
        tracing::debug!(input = %input.display(), "starting");
    }

    match &cli.command {
        Commands::Analyze {
            input,
            report,
            json,
        } => run_analyze(input, report.as_deref(), *json),
        Commands::Clean {
            input,
            output,
            stages,
            options,
            config,
            report,
            json,
            no_confirm,
        } => run_clean(&CleanParams {
            input,
            output: output.as_deref(),
            stages: *stages,
            options: options.as_deref(),
            config: config.as_deref(),
            report: report.as_deref(),
            json: *json,
            no_confirm: *no_confirm,
        }),
        Commands::Export {
            input,
            format,
            output,
        } => run_export(input, format.as_deref(), output.as_deref()),
    }
}
