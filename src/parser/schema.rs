//! Raw record definitions, one per trace line.
//!
//! Fields that only exist from format version 3 onwards are modeled as
//! `Option`s on the same record rather than as separate types.

use crate::utils::diagnostics::Diagnostics;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Session description (section 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Trace format version
    pub version: u32,

    /// Capture date as written by the profiler (MM/DD/YYYY)
    pub date: String,

    /// Free-text description
    pub description: String,

    /// Wall-clock time of capture (HH:MM:SS)
    pub time: String,

    /// User field following the time, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Auxiliary counters (version 3+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<SessionAux>,
}

impl SessionDescription {
    /// Combine date and time into a timestamp when both parse
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%m/%d/%Y").ok()?;
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M:%S").ok()?;
        Some(NaiveDateTime::new(date, time))
    }
}

/// Trailing JSON block of a version 3+ description line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAux {
    #[serde(default, rename = "StmtCnt")]
    pub statement_count: Option<u64>,

    #[serde(default, rename = "DataPts")]
    pub data_points: Option<u64>,

    #[serde(default, rename = "NumWrites")]
    pub write_count: Option<u64>,

    #[serde(default, rename = "TotTime")]
    pub total_time: Option<f64>,

    #[serde(default, rename = "BufferSize")]
    pub buffer_size: Option<u64>,

    #[serde(default, rename = "Directory")]
    pub directory: Option<String>,

    #[serde(default, rename = "Propath")]
    pub search_path: Option<String>,
}

/// Module definition (section 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: u32,

    /// Display name, already normalized
    pub name: String,

    /// Listing file reference (may be empty)
    pub listing_file: String,

    pub crc: i64,

    /// Defining line number (version 3+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Signature string (version 3+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Aggregate caller -> callee edge (section 2)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallGraphEdge {
    pub caller_id: u32,
    pub caller_line: i64,
    pub callee_id: u32,
    pub call_count: u64,
}

/// Per-line timing (section 3)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSummaryRecord {
    pub module_id: u32,
    pub line: i64,
    pub exec_count: u64,

    /// Time spent on the line itself
    pub active_time: f64,

    /// Time including callees
    pub cumulative_time: f64,
}

/// One entry of the flat chronological trace (section 4)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub module_id: u32,

    /// 0 marks a module entry
    pub line: i64,

    pub active_time: f64,

    /// Absolute start, monotonic within the session
    pub start_time: f64,
}

impl TraceEvent {
    pub fn is_entry(&self) -> bool {
        self.line == 0
    }
}

/// Explicit call tree node (section 6, version 3+)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodeRecord {
    /// 1-based, unique
    pub node_id: u32,

    /// 0 for the root
    pub parent_id: u32,

    pub module_id: u32,
    pub line: i64,
    pub call_count: u64,
    pub cumulative_time: f64,
    pub children: Vec<u32>,
}

/// Everything read from one trace file
#[derive(Debug, Clone)]
pub struct ParsedProfile {
    /// Path the trace came from (diagnostics only)
    pub path: PathBuf,

    pub description: SessionDescription,
    pub modules: Vec<ModuleRecord>,
    pub call_graph: Vec<CallGraphEdge>,
    pub line_summaries: Vec<LineSummaryRecord>,
    pub trace_events: Vec<TraceEvent>,
    pub call_tree: Vec<TreeNodeRecord>,

    /// Non-fatal anomalies seen while parsing
    pub diagnostics: Diagnostics,
}

impl ParsedProfile {
    pub fn version(&self) -> u32 {
        self.description.version
    }

    /// True when the explicit call tree can be used
    pub fn has_call_tree(&self) -> bool {
        self.version() >= crate::utils::config::EXTENDED_FORMAT_VERSION && !self.call_tree.is_empty()
    }

    pub fn module(&self, id: u32) -> Option<&ModuleRecord> {
        self.modules.iter().find(|m| m.id == id)
    }
}
