//! Spinners for the long-running steps (load, clean, save)

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars(TICK_CHARS),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a spinner with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Run `task` behind a spinner.
///
/// On success the spinner is finished with the message built by `done`;
/// on failure it is cleared so the error is printed on a clean line.
pub fn with_spinner<T, E>(
    message: &str,
    task: impl FnOnce() -> Result<T, E>,
    done: impl FnOnce(&T) -> String,
) -> Result<T, E> {
    let spinner = create_spinner(message);
    match task() {
        Ok(value) => {
            finish_with_success(&spinner, &done(&value));
            Ok(value)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}
