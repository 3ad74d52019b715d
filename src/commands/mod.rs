//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod compare;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, render_summary, validate_args};
pub use compare::execute_compare;
pub use models::{AnalyzeArgs, CompareArgs};
pub use utils::{build_resolver, display_schema, display_version, validate_trace_file};
