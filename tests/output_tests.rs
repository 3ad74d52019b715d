//! Integration tests for JSON output.

use exec_profile_studio::aggregator::{analyze_profile, to_report};
use exec_profile_studio::diff::generate_comparison;
use exec_profile_studio::output::{read_report, write_comparison, write_report};
use exec_profile_studio::parser::parse_profile;
use exec_profile_studio::resolver::NoSourceResolver;
use exec_profile_studio::utils::config::SCHEMA_VERSION;
use exec_profile_studio::utils::error::OutputError;
use std::path::Path;
use tempfile::tempdir;

const TRACE: &str = "1 05/11/2023 \"output\" 10:00:00 \"\"
.
1 \"main.p\" \"\" 0
.
0 0 1 1
.
1 5 1 0.010000 0.010000
.
1 0 0.000000 0.000000
1 5 0.010000 0.010000
.
";

fn report() -> exec_profile_studio::aggregator::ProfileReport {
    let profile = parse_profile(Path::new("output.prof"), TRACE).unwrap();
    to_report(analyze_profile(&profile, &NoSourceResolver).unwrap())
}

#[test]
fn test_report_roundtrip_keeps_structure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    write_report(&report(), &path).unwrap();
    let loaded = read_report(&path).unwrap();

    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.analysis.modules.len(), 2);
    assert_eq!(loaded.analysis.call_tree.len(), 1);
    assert!(loaded.analysis.has_tracing);
}

#[test]
fn test_comparison_written_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/compare.json");
    let analysis = report().analysis;

    write_comparison(&generate_comparison(&analysis, &analysis), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["summary"]["status"], "IDENTICAL");
    assert_eq!(value["first"]["description"], "output");
}

#[test]
fn test_read_missing_report() {
    let err = read_report("no/such/report.json").unwrap_err();
    assert!(matches!(err, OutputError::WriteFailed(_)));
}
