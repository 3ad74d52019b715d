//! Terminal output rendering for comparison reports.
//!
//! Provides human-readable summaries of session comparisons
//! with visual cues (emojis) for regressions and improvements.

use super::schema::{ComparisonReport, ComparisonStatus};
use colored::*;

/// Render a human-readable summary of a comparison report for the terminal
pub fn render_terminal_comparison(report: &ComparisonReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_session_time(report));
    out.push_str(&render_module_changes(report));
    out.push_str(&render_added_removed(report));
    out.push_str(&render_status(report));

    out
}

fn render_header(report: &ComparisonReport) -> String {
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(&"Session Comparison Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!(
        "First:  {} ({})\n",
        report.first.source_path, report.first.description
    ));
    out.push_str(&format!(
        "Second: {} ({})\n",
        report.second.source_path, report.second.description
    ));
    out.push_str("---------------------------------------------------\n\n");
    out
}

fn render_session_time(report: &ComparisonReport) -> String {
    format!(
        "{} Session Time: {:.6} -> {:.6} ({:+.6})\n",
        get_delta_symbol(report.session_time_delta),
        report.first.total_session_time,
        report.second.total_session_time,
        report.session_time_delta
    )
}

fn render_module_changes(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let mut matched: Vec<_> = report
        .modules
        .iter()
        .filter(|m| m.status == ComparisonStatus::Matched)
        .collect();

    if !matched.is_empty() {
        out.push_str("\nTop Module Regressions/Improvements:\n");
        matched.sort_by(|a, b| b.total_time_delta.abs().total_cmp(&a.total_time_delta.abs()));

        for module in matched.iter().take(10) {
            out.push_str(&format!(
                "  {} {}: {:.6} -> {:.6} ({:+.6}s, calls {:+})\n",
                get_delta_symbol(module.total_time_delta),
                module.module_name,
                module.first_total_time,
                module.second_total_time,
                module.total_time_delta,
                module.times_called_delta
            ));
        }
    }
    out
}

fn render_added_removed(report: &ComparisonReport) -> String {
    let mut out = String::new();
    for module in &report.modules {
        match module.status {
            ComparisonStatus::Added => out.push_str(&format!(
                "  {} {} ({:.6}s)\n",
                "+".green(),
                module.module_name,
                module.second_total_time
            )),
            ComparisonStatus::Removed => out.push_str(&format!(
                "  {} {} ({:.6}s)\n",
                "-".red(),
                module.module_name,
                module.first_total_time
            )),
            ComparisonStatus::Matched => {}
        }
    }
    if out.is_empty() {
        out
    } else {
        format!("\nAdded/Removed Modules:\n{}", out)
    }
}

fn render_status(report: &ComparisonReport) -> String {
    let mut out = String::new();
    out.push_str("\n---------------------------------------------------\n");
    let summary = &report.summary;
    let status_msg = match summary.status.as_str() {
        "REGRESSED" => format!(
            "❌ STATUS: REGRESSION DETECTED ({} modules slower, {} faster)",
            summary.regressions, summary.improvements
        )
        .red()
        .bold(),
        "CHANGED" => format!(
            "⚠️  STATUS: CHANGED ({} added, {} removed, {} faster)",
            summary.added, summary.removed, summary.improvements
        )
        .yellow()
        .bold(),
        _ => "✅ STATUS: IDENTICAL".green().bold(),
    };
    out.push_str(&status_msg.to_string());
    out.push('\n');
    out
}

fn get_delta_symbol(change: f64) -> &'static str {
    if change > 0.0 {
        "📈"
    } else if change < 0.0 {
        "📉"
    } else {
        "➡️"
    }
}
