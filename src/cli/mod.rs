//! CLI module - argument parsing, interactive prompts and command runners

pub mod analyze;
pub mod args;
pub mod clean;
pub mod export;
mod prompts;

pub use analyze::run_analyze;
pub use args::{Cli, Commands, InputArgs, StageFlags};
pub use clean::{resolve_options, run_clean, CleanParams};
pub use export::{parse_export_request, run_export};
pub use prompts::*;
