//! Pipeline module - profiling and the cleaning stages

pub mod cleaner;
pub mod column_stats;
pub mod dataset;
pub mod loader;
pub mod options;
pub mod profiler;
pub mod records;
pub mod stages;
pub mod writer;

pub use cleaner::*;
pub use dataset::*;
pub use loader::*;
pub use options::*;
pub use profiler::*;
pub use records::*;
pub use stages::*;
pub use writer::*;
