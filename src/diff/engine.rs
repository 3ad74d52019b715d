//! Core comparison engine implementation.
//! Generates complete comparison reports from two analyzed sessions.

use crate::aggregator::{analyze_profile, SessionAnalysis};
use crate::output::json::read_report;
use crate::parser::read_profile_trace;
use crate::resolver::SourceResolver;
use crate::utils::config::{DIFF_VERSION, SCHEMA_VERSION};
use chrono::Utc;
use log::{debug, info};
use std::path::Path;
use std::thread;

use super::normalizer::{compare_edges, compare_modules, time_delta};
use super::schema::{
    ComparedModule, ComparisonReport, ComparisonStatus, ComparisonSummary, SessionMetadata,
};
use super::DiffError;

/// Generate a complete comparison report
///
/// # Arguments
/// * `first` - The baseline session
/// * `second` - The session compared against it
///
/// # Returns
/// ComparisonReport with module and edge differences
///
/// # Example
/// ```ignore
/// let first = analyze_profile(&read_profile_trace("before.prof")?, &NoSourceResolver)?;
/// let second = analyze_profile(&read_profile_trace("after.prof")?, &NoSourceResolver)?;
/// let report = generate_comparison(&first, &second);
/// ```
pub fn generate_comparison(first: &SessionAnalysis, second: &SessionAnalysis) -> ComparisonReport {
    let modules = compare_modules(&first.modules, &second.modules);
    let calling = compare_edges(&first.calling, &second.calling);
    let called = compare_edges(&first.called, &second.called);

    debug!(
        "Compared sessions: {} module rows, {} calling rows, {} called rows",
        modules.len(),
        calling.len(),
        called.len()
    );

    let summary = summarize(&modules, calling.is_empty() && called.is_empty());

    ComparisonReport {
        diff_version: DIFF_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        first: metadata(first),
        second: metadata(second),
        session_time_delta: time_delta(first.total_session_time, second.total_session_time),
        modules,
        calling,
        called,
        summary,
    }
}

fn metadata(analysis: &SessionAnalysis) -> SessionMetadata {
    SessionMetadata {
        source_path: analysis.source_path.clone(),
        description: analysis.description.description.clone(),
        captured_at: analysis
            .description
            .captured_at()
            .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
        total_session_time: analysis.total_session_time,
        module_count: analysis.modules.len(),
    }
}

fn summarize(modules: &[ComparedModule], edges_unchanged: bool) -> ComparisonSummary {
    let count = |status: ComparisonStatus| modules.iter().filter(|m| m.status == status).count();
    let matched = || modules.iter().filter(|m| m.status == ComparisonStatus::Matched);

    let regressions = matched().filter(|m| m.total_time_delta > 0.0).count();
    let improvements = matched().filter(|m| m.total_time_delta < 0.0).count();

    let identical = modules.is_empty() && edges_unchanged;
    let status = if identical {
        "IDENTICAL"
    } else if regressions > 0 {
        "REGRESSED"
    } else {
        "CHANGED"
    };

    ComparisonSummary {
        added: count(ComparisonStatus::Added),
        removed: count(ComparisonStatus::Removed),
        regressions,
        improvements,
        status: status.to_string(),
        warning: identical.then(|| "Sessions show no observable change".to_string()),
    }
}

/// Load one side of a comparison
///
/// `.json` files are previously written reports; anything else is parsed
/// as a trace.
pub fn load_session(
    path: &Path,
    resolver: &dyn SourceResolver,
) -> Result<SessionAnalysis, DiffError> {
    let is_report = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_report {
        let report = read_report(path)?;
        if report.version != SCHEMA_VERSION {
            return Err(DiffError::IncompatibleVersions(
                report.version,
                SCHEMA_VERSION.to_string(),
            ));
        }
        return Ok(report.analysis);
    }

    let profile = read_profile_trace(path)?;
    Ok(analyze_profile(&profile, resolver)?)
}

/// Load both sessions in parallel, then compare them
///
/// The two pipelines are independent; the comparison runs once both have
/// finished.
pub fn compare_files(
    first: &Path,
    second: &Path,
    resolver: &dyn SourceResolver,
) -> Result<ComparisonReport, DiffError> {
    info!("Comparing {} against {}", first.display(), second.display());

    let (first_result, second_result) = thread::scope(|scope| {
        let handle = scope.spawn(|| load_session(second, resolver));
        let first_result = load_session(first, resolver);
        let second_result = handle
            .join()
            .unwrap_or_else(|_| Err(DiffError::WorkerPanicked));
        (first_result, second_result)
    });

    Ok(generate_comparison(&first_result?, &second_result?))
}
