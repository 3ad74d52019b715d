//! Compare command implementation.
//! Orchestrates the comparison of two sessions and reports deltas.

use super::models::CompareArgs;
use super::utils::build_resolver;
use crate::diff::{compare_files, render_terminal_comparison, ComparisonReport};
use crate::output::write_comparison;
use anyhow::{Context, Result};
use colored::*;

/// Execute the compare command
pub fn execute_compare(args: CompareArgs) -> Result<ComparisonReport> {
    // Step 1: Load and compare both sessions
    let resolver = build_resolver(args.config.as_deref(), &args.search_paths)
        .context("Failed to load configuration")?;
    let report = compare_files(&args.baseline, &args.target, resolver.as_ref())
        .context("Failed to compare sessions")?;

    // Step 2: Write output if requested
    if let Some(path) = &args.output {
        write_comparison(&report, path).context("Failed to write comparison JSON")?;
        println!(
            "📊 Comparison report written to {}",
            path.display().to_string().cyan()
        );
    }

    // Step 3: Terminal Summary
    if args.summary {
        println!("{}", render_terminal_comparison(&report));
    }

    if args.fail_on_regression && report.summary.status == "REGRESSED" {
        return Err(anyhow::anyhow!(
            "Regression detected: {} modules slower",
            report.summary.regressions
        ));
    }

    Ok(report)
}
