//! Schema definitions for comparison reports.
//!
//! Defines the structures that represent differences between two sessions.

use serde::{Deserialize, Serialize};

/// Complete report comparing a first and a second session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Schema version for the comparison format
    pub diff_version: String,

    /// Timestamp when the comparison was generated
    pub generated_at: String,

    /// Metadata of the first (baseline) session
    pub first: SessionMetadata,

    /// Metadata of the second (target) session
    pub second: SessionMetadata,

    /// Second total session time minus the first
    pub session_time_delta: f64,

    /// Modules that changed, appeared or disappeared
    pub modules: Vec<ComparedModule>,

    /// Calling-view rows that changed
    pub calling: Vec<ComparedEdge>,

    /// Called-view rows that changed
    pub called: Vec<ComparedEdge>,

    pub summary: ComparisonSummary,
}

/// Metadata extracted from a session for comparison
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionMetadata {
    pub source_path: String,
    pub description: String,

    /// Capture timestamp, when date and time parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,

    pub total_session_time: f64,
    pub module_count: usize,
}

/// Presence of a module or edge across the two sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    /// Only in the second session
    Added,
    /// Only in the first session
    Removed,
    /// In both sessions with differing values
    Matched,
}

/// A module matched (by ID and name) across sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparedModule {
    pub module_id: u32,
    pub module_name: String,

    pub first_times_called: u64,
    pub second_times_called: u64,
    pub first_average_time: f64,
    pub second_average_time: f64,
    pub first_total_time: f64,
    pub second_total_time: f64,

    /// second - first
    pub times_called_delta: i64,
    pub average_time_delta: f64,
    pub total_time_delta: f64,

    pub status: ComparisonStatus,
}

/// Calling or called row compared across sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparedEdge {
    pub module_id: u32,
    pub peer_name: String,
    pub first_call_count: u64,
    pub second_call_count: u64,
    pub call_count_delta: i64,
    pub status: ComparisonStatus,
}

/// Summary of comparison results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonSummary {
    pub added: usize,
    pub removed: usize,

    /// Matched modules whose total time grew
    pub regressions: usize,

    /// Matched modules whose total time shrank
    pub improvements: usize,

    /// Overall status: "IDENTICAL", "CHANGED" or "REGRESSED"
    pub status: String,

    /// Optional warning message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
