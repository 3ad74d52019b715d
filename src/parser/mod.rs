//! Trace parsing and raw record definitions.
//!
//! This module handles:
//! - Splitting the trace into sections
//! - Tokenizing each line into a typed record
//! - Module display-name normalization and decomposition

pub mod module_name;
pub mod profile_trace;
pub mod records;
pub mod schema;

// Re-export main types
pub use module_name::{normalize_module_name, ModuleName};
pub use profile_trace::{parse_profile, read_profile_trace};
pub use schema::{
    CallGraphEdge, LineSummaryRecord, ModuleRecord, ParsedProfile, SessionAux,
    SessionDescription, TraceEvent, TreeNodeRecord,
};
