//! Derived record definitions.
//!
//! These are rebuilt in full from the raw records on every parse.

use serde::{Deserialize, Serialize};

/// Per-module timing statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleStats {
    pub module_id: u32,

    /// Display name
    pub name: String,

    /// Defining line (version 3+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Sum of incoming call-graph counts
    pub times_called: u64,

    /// Sum of line active times
    pub total_time: f64,

    /// `total_time / times_called`, 0 when never called
    pub average_time: f64,

    /// Share of total session time
    pub percent_session: f64,

    /// Whether a source file was found for this module
    pub has_link: bool,

    /// Listing file reference (may be empty)
    pub listing_file: String,
}

/// A caller/callee row keyed by `module_id`
///
/// In the calling view the peer is the caller; in the called view the peer
/// is the callee and `peer_times_called` is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEdgeView {
    pub module_id: u32,
    pub peer_module_id: u32,
    pub peer_name: String,
    pub call_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_times_called: Option<u64>,

    pub peer_percent_session: f64,
}

/// Timing of a single source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineView {
    pub module_id: u32,
    pub line: i64,
    pub times_executed: u64,
    pub average_time: f64,
    pub total_time: f64,
    pub has_link: bool,
}
