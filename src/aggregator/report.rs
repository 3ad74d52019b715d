//! Full statistics bundle for one session.

use super::relations::build_relations;
use super::schema::{CallEdgeView, LineView, ModuleStats};
use super::session_stats::compute_session_statistics;
use crate::calltree::{build_call_tree, TreeNode, TreeStrategy};
use crate::parser::schema::{ParsedProfile, SessionDescription};
use crate::resolver::SourceResolver;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::diagnostics::Diagnostic;
use crate::utils::error::ProfileError;
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

/// Everything derived from one parsed trace.
///
/// Building this twice from the same input yields identical values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    /// Trace file the data came from
    pub source_path: String,

    pub description: SessionDescription,
    pub total_session_time: f64,

    pub modules: Vec<ModuleStats>,
    pub calling: Vec<CallEdgeView>,
    pub called: Vec<CallEdgeView>,
    pub lines: Vec<LineView>,

    pub tree_strategy: TreeStrategy,
    pub call_tree: Vec<TreeNode>,
    pub skipped_tree_nodes: usize,

    /// Trace events are present
    pub has_tracing: bool,

    /// Call graph edges are present
    pub has_xref: bool,

    /// The resolver found the listing file of at least one module
    pub has_listing: bool,

    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Top-level report written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    #[serde(flatten)]
    pub analysis: SessionAnalysis,
}

/// Run statistics, relations and tree building over a parsed trace
///
/// **Public** - main entry point for aggregation
///
/// # Errors
/// * `ProfileError::MissingSessionRoot` - A call tree section exists but
///   has no session node
pub fn analyze_profile(
    profile: &ParsedProfile,
    resolver: &dyn SourceResolver,
) -> Result<SessionAnalysis, ProfileError> {
    let mut diagnostics = profile.diagnostics.clone();

    let stats = compute_session_statistics(profile, resolver, &mut diagnostics)?;
    let relations = build_relations(profile, &stats);
    let tree = build_call_tree(profile, &stats, &mut diagnostics);

    let has_listing = profile
        .modules
        .iter()
        .any(|m| resolver.has_listing(&m.listing_file));

    info!(
        "Analyzed {}: {} modules, {} tree nodes, session time {}",
        profile.path.display(),
        stats.modules.len(),
        tree.nodes.len(),
        stats.total_session_time
    );

    Ok(SessionAnalysis {
        source_path: profile.path.display().to_string(),
        description: profile.description.clone(),
        total_session_time: stats.total_session_time,
        modules: stats.modules,
        calling: relations.calling,
        called: relations.called,
        lines: relations.lines,
        tree_strategy: tree.strategy,
        call_tree: tree.nodes,
        skipped_tree_nodes: tree.skipped_nodes,
        has_tracing: !profile.trace_events.is_empty(),
        has_xref: !profile.call_graph.is_empty(),
        has_listing,
        diagnostics: diagnostics.into_entries(),
    })
}

/// Stamp an analysis with schema version and generation time
pub fn to_report(analysis: SessionAnalysis) -> ProfileReport {
    ProfileReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        analysis,
    }
}
