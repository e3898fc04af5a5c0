//! Report module - console summaries, JSON envelopes and record export

pub mod analysis_report;
pub mod export;
pub mod summary;

pub use analysis_report::*;
pub use export::*;
pub use summary::*;
