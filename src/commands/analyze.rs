//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Parses the trace file
//! 2. Computes session statistics, relations and the call tree
//! 3. Writes the JSON report
//! 4. Optionally prints a summary

use super::models::AnalyzeArgs;
use super::utils::build_resolver;
use crate::aggregator::{analyze_profile, to_report, SessionAnalysis};
use crate::output::write_report;
use crate::parser::read_profile_trace;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Validate analyze arguments before doing any work
///
/// **Public** - called from main.rs before execution
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.trace_file.as_os_str().is_empty() {
        anyhow::bail!("Trace file path cannot be empty");
    }
    if !args.trace_file.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace_file.display());
    }
    if args.top_modules == 0 {
        anyhow::bail!("--top-modules must be at least 1");
    }
    Ok(())
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The analysis that was reported
///
/// # Errors
/// * Trace read or parse errors
/// * Missing session root in the call tree section
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     trace_file: PathBuf::from("session.prof"),
///     output_json: Some(PathBuf::from("session.json")),
///     ..Default::default()
/// };
/// execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<SessionAnalysis> {
    let start_time = Instant::now();

    info!("Analyzing trace: {}", args.trace_file.display());

    // Step 1: Parse trace
    info!("Step 1/3: Parsing trace...");
    let profile = read_profile_trace(&args.trace_file).context("Failed to parse trace file")?;

    debug!(
        "Parsed trace v{}: {} modules, {} call graph edges, {} trace events, {} tree nodes",
        profile.version(),
        profile.modules.len(),
        profile.call_graph.len(),
        profile.trace_events.len(),
        profile.call_tree.len()
    );

    // Step 2: Aggregate
    info!("Step 2/3: Aggregating session statistics...");
    let resolver = build_resolver(args.config.as_deref(), &args.search_paths)
        .context("Failed to load configuration")?;
    let analysis =
        analyze_profile(&profile, resolver.as_ref()).context("Failed to analyze trace")?;

    // Step 3: Write outputs
    if let Some(path) = &args.output_json {
        info!("Step 3/3: Writing report...");
        let report = to_report(analysis.clone());
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        info!("Step 3/3: Skipping report output (not requested)");
    }

    if args.print_summary {
        println!("{}", render_summary(&analysis, args.top_modules));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(analysis)
}

/// Plain-text session summary with the slowest modules first
pub fn render_summary(analysis: &SessionAnalysis, top: usize) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    out.push_str(&format!("\n{}\nSESSION SUMMARY\n{}\n", rule, rule));
    out.push_str(&format!("Source:        {}\n", analysis.source_path));
    out.push_str(&format!(
        "Description:   {}\n",
        analysis.description.description
    ));
    out.push_str(&format!(
        "Captured:      {} {}\n",
        analysis.description.date, analysis.description.time
    ));
    out.push_str(&format!("Session Time:  {:.6}\n", analysis.total_session_time));
    out.push_str(&format!("Modules:       {}\n", analysis.modules.len()));
    out.push_str(&format!(
        "Call Tree:     {} nodes ({:?})\n",
        analysis.call_tree.len(),
        analysis.tree_strategy
    ));
    if !analysis.diagnostics.is_empty() {
        out.push_str(&format!("Diagnostics:   {}\n", analysis.diagnostics.len()));
    }

    let mut modules: Vec<_> = analysis.modules.iter().skip(1).collect();
    modules.sort_by(|a, b| b.total_time.total_cmp(&a.total_time));

    out.push_str(&format!("\nTop {} modules by total time:\n", top));
    for (i, module) in modules.iter().take(top).enumerate() {
        out.push_str(&format!(
            "  {:>2}. {:<40} {:>10.6}s {:>8.4}% ({} calls)\n",
            i + 1,
            module.name,
            module.total_time,
            module.percent_session,
            module.times_called
        ));
    }
    out.push_str(&rule);
    out
}
