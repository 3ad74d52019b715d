//! Integration tests for session aggregation.

use exec_profile_studio::aggregator::{analyze_profile, SessionAnalysis};
use exec_profile_studio::parser::{parse_profile, ParsedProfile};
use exec_profile_studio::resolver::{NoSourceResolver, SearchPathResolver};
use exec_profile_studio::utils::config::SESSION_MODULE_ID;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::Path;

const TRACE: &str = "1 05/11/2023 \"aggregate\" 10:00:00 \"\"
.
1 \"main.p\" \"main.lst\" 0
2 \"calc main.p\" \"\" 0
3 \"report.p\" \"\" 0
.
0 0 1 1
1 10 2 3
1 12 2 2
1 14 3 1
.
1 10 1 0.500000 0.900000
1 11 4 0.000100 0.000100
2 40 2 0.009226 0.009226
2 41 5 0.200000 0.200000
3 1 1 0.030000 0.030000
.
";

fn parsed() -> ParsedProfile {
    parse_profile(Path::new("aggregate.prof"), TRACE).unwrap()
}

fn analyzed() -> SessionAnalysis {
    analyze_profile(&parsed(), &NoSourceResolver).unwrap()
}

#[test]
fn test_module_totals_equal_line_sums() {
    let profile = parsed();
    let analysis = analyzed();

    let mut sums: HashMap<u32, f64> = HashMap::new();
    for record in &profile.line_summaries {
        *sums.entry(record.module_id).or_insert(0.0) += record.active_time;
    }

    for module in analysis.modules.iter().skip(1) {
        let expected = sums.get(&module.module_id).copied().unwrap_or(0.0);
        assert!(
            (module.total_time - expected).abs() < 1e-6,
            "{}: {} vs {}",
            module.name,
            module.total_time,
            expected
        );
    }
}

#[test]
fn test_session_module_first() {
    let analysis = analyzed();
    let session = &analysis.modules[0];

    assert_eq!(session.module_id, SESSION_MODULE_ID);
    assert_eq!(session.name, "Session");
    assert_eq!(session.times_called, 1);
    assert_eq!(session.total_time, 0.0);
}

#[test]
fn test_times_called_sums_incoming_edges() {
    let analysis = analyzed();
    let calc = analysis.modules.iter().find(|m| m.module_id == 2).unwrap();

    assert_eq!(calc.times_called, 5);
    assert_eq!(calc.total_time, 0.209226);
    assert_eq!(calc.average_time, 0.041845);
}

#[test]
fn test_line_view_average() {
    let analysis = analyzed();
    let line = analysis
        .lines
        .iter()
        .find(|l| l.module_id == 2 && l.line == 40)
        .unwrap();

    assert_eq!(line.times_executed, 2);
    assert_eq!(line.average_time, 0.004613);
}

#[test]
fn test_capability_flags() {
    let analysis = analyzed();

    assert!(!analysis.has_tracing);
    assert!(analysis.has_xref);
    // main.lst is named but nothing can find it
    assert!(!analysis.has_listing);
}

#[test]
fn test_listing_flag_asks_resolver() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.lst"), "").unwrap();
    std::fs::write(dir.path().join("main.p"), "").unwrap();
    let resolver = SearchPathResolver::new(vec![dir.path().to_path_buf()]);

    let analysis = analyze_profile(&parsed(), &resolver).unwrap();

    assert!(analysis.has_listing);
    let linked: Vec<&str> = analysis
        .modules
        .iter()
        .filter(|m| m.has_link)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(linked, vec!["main.p", "calc main.p"]);
}

#[test]
fn test_calling_and_called_views() {
    let analysis = analyzed();

    assert_eq!(analysis.calling.len(), 4);
    assert_eq!(analysis.called.len(), 4);

    let into_report: Vec<_> = analysis
        .calling
        .iter()
        .filter(|e| e.module_id == 3)
        .collect();
    assert_eq!(into_report.len(), 1);
    assert_eq!(into_report[0].peer_name, "main.p");

    let from_main = analysis.called.iter().filter(|e| e.module_id == 1).count();
    assert_eq!(from_main, 3);
}

#[test]
fn test_analysis_is_deterministic() {
    let first = serde_json::to_string(&analyzed()).unwrap();
    let second = serde_json::to_string(&analyzed()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_reference_is_diagnosed() {
    let text = TRACE.replace("1 14 3 1", "1 14 9 1");
    let profile = parse_profile(Path::new("aggregate.prof"), &text).unwrap();
    let analysis = analyze_profile(&profile, &NoSourceResolver).unwrap();

    assert!(analysis
        .diagnostics
        .iter()
        .any(|d| d.category == "reference" && d.message.contains('9')));
}
