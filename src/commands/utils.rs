use crate::parser::read_profile_trace;
use crate::resolver::{NoSourceResolver, SearchPathResolver, SourceResolver};
use crate::utils::config::{StudioConfig, SCHEMA_VERSION};
use crate::utils::error::ConfigError;
use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Build the source resolver from configuration plus CLI search paths
///
/// With no search paths at all, every link lookup answers `false`.
pub fn build_resolver(
    config_path: Option<&Path>,
    extra_paths: &[PathBuf],
) -> Result<Box<dyn SourceResolver>, ConfigError> {
    let mut config = StudioConfig::load_or_default(config_path)?;
    config.search_paths.extend(extra_paths.iter().cloned());

    if config.search_paths.is_empty() {
        debug!("No search paths configured; source links disabled");
        return Ok(Box::new(NoSourceResolver));
    }

    debug!("Resolving sources over {} search paths", config.search_paths.len());
    Ok(Box::new(SearchPathResolver::from_config(&config)))
}

/// Parse a trace file and print what it contains
pub fn validate_trace_file(file_path: PathBuf) -> Result<()> {
    println!("Validating trace: {}", file_path.display());

    let profile = read_profile_trace(&file_path).context("Trace file is not valid")?;

    println!("✓ Valid profile trace");
    println!("  Format Version: {}", profile.version());
    println!("  Description: {}", profile.description.description);
    println!("  Modules: {}", profile.modules.len());
    println!("  Call Graph Edges: {}", profile.call_graph.len());
    println!("  Line Summaries: {}", profile.line_summaries.len());
    println!("  Trace Events: {}", profile.trace_events.len());
    println!("  Call Tree Nodes: {}", profile.call_tree.len());
    if !profile.diagnostics.is_empty() {
        println!("  Diagnostics: {}", profile.diagnostics.len());
        for entry in profile.diagnostics.entries() {
            println!("    [{}] {}", entry.category, entry.message);
        }
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Exec Profile Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - ISO 8601 timestamp");
        println!("  source_path: string        - Trace file the report was built from");
        println!("  description: object       - Session description line");
        println!("  total_session_time: number - Session time in seconds");
        println!("  modules: array             - Per-module statistics (session first)");
        println!("    times_called: number     - Summed incoming call counts");
        println!("    total_time: number       - Summed line active time");
        println!("    percent_session: number  - Share of session time");
        println!("  calling: array             - Callers per module");
        println!("  called: array              - Callees per module");
        println!("  lines: array               - Per-line execution statistics");
        println!("  tree_strategy: string      - explicit or inferred");
        println!("  call_tree: array           - Call tree nodes (root first)");
        println!("  diagnostics: array         - Recoverable anomalies");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Exec Profile Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Parses, aggregates and compares execution profile traces.");
}
