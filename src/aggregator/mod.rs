//! Aggregation of raw records into statistics and relations.
//!
//! This module transforms parsed traces into:
//! - Session total and per-module statistics
//! - Calling/called edge views and per-line views
//! - The complete report bundle (with the call tree)

pub mod relations;
pub mod report;
pub mod schema;
pub mod session_stats;

// Re-export main types and functions
pub use relations::{build_call_edges, build_line_views, build_relations, Relations};
pub use report::{analyze_profile, to_report, ProfileReport, SessionAnalysis};
pub use schema::{CallEdgeView, LineView, ModuleStats};
pub use session_stats::{compute_session_statistics, total_session_time, SessionStatistics};
