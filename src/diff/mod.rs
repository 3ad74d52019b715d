//! Session comparison.
//!
//! This module compares two analyzed sessions (first vs second) and
//! produces delta reports with added/removed module detection.
//!
//! # Example
//! ```ignore
//! use exec_profile_studio::diff::{compare_files, render_terminal_comparison};
//! use exec_profile_studio::resolver::NoSourceResolver;
//!
//! let report = compare_files("before.prof".as_ref(), "after.prof".as_ref(), &NoSourceResolver)?;
//! println!("{}", render_terminal_comparison(&report));
//! ```

mod engine;
mod normalizer;
mod output;
mod schema;

// Public API exports
pub use engine::{compare_files, generate_comparison, load_session};
pub use normalizer::{compare_edges, compare_modules};
pub use output::render_terminal_comparison;
pub use schema::{
    ComparedEdge, ComparedModule, ComparisonReport, ComparisonStatus, ComparisonSummary,
    SessionMetadata,
};

// Error type
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Incompatible report versions: found={0}, expected={1}")]
    IncompatibleVersions(String, String),

    #[error("Failed to read report: {0}")]
    ReadFailed(#[from] crate::utils::error::OutputError),

    #[error(transparent)]
    Profile(#[from] crate::utils::error::ProfileError),

    #[error("Session worker thread panicked")]
    WorkerPanicked,
}
