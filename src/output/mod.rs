//! Output writers for session and comparison reports.
//!
//! This module handles writing data to disk:
//! - JSON session reports (and reading them back)
//! - JSON comparison reports

pub mod json;

// Re-export main functions
pub use json::{read_report, report_to_string, write_comparison, write_report};
