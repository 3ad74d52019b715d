//! Comprehensive tests for session comparison.

use exec_profile_studio::aggregator::{analyze_profile, to_report, ModuleStats, SessionAnalysis};
use exec_profile_studio::diff::*;
use exec_profile_studio::output::write_report;
use exec_profile_studio::parser::parse_profile;
use exec_profile_studio::resolver::NoSourceResolver;
use pretty_assertions::assert_eq;
use std::path::Path;

// ============================================================================
// SHARED TEST HELPERS
// ============================================================================

const TRACE: &str = "1 05/11/2023 \"compare\" 10:00:00 \"\"
.
1 \"main.p\" \"\" 0
2 \"calc main.p\" \"\" 0
.
0 0 1 1
1 10 2 5
.
1 10 1 0.500000 0.520000
2 40 5 0.020000 0.020000
.
";

fn analyze(text: &str) -> SessionAnalysis {
    let profile = parse_profile(Path::new("compare.prof"), text).unwrap();
    analyze_profile(&profile, &NoSourceResolver).unwrap()
}

fn module(id: u32, name: &str, called: u64, total: f64, average: f64) -> ModuleStats {
    ModuleStats {
        module_id: id,
        name: name.to_string(),
        line: None,
        times_called: called,
        total_time: total,
        average_time: average,
        percent_session: 0.0,
        has_link: false,
        listing_file: String::new(),
    }
}

// ============================================================================
// COMPONENT TESTS: NORMALIZER
// ============================================================================

mod normalizer_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equal_modules_produce_no_row() {
        let a = vec![module(7, "calc main.p", 5, 0.02, 0.004)];
        let b = vec![module(7, "calc main.p", 5, 0.02, 0.004)];
        assert!(compare_modules(&a, &b).is_empty());
    }

    #[test]
    fn test_added_module_emitted_even_when_zero() {
        let a: Vec<ModuleStats> = vec![];
        let b = vec![module(7, "idle.p", 0, 0.0, 0.0)];
        let rows = compare_modules(&a, &b);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, ComparisonStatus::Added);
        assert_eq!(rows[0].total_time_delta, 0.0);
    }
}

// ============================================================================
// COMPONENT TESTS: ENGINE
// ============================================================================

mod engine_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_self_comparison_is_empty() {
        let analysis = analyze(TRACE);
        let report = generate_comparison(&analysis, &analysis);

        assert!(report.modules.is_empty());
        assert!(report.calling.is_empty());
        assert!(report.called.is_empty());
        assert_eq!(report.summary.added, 0);
        assert_eq!(report.summary.removed, 0);
        assert_eq!(report.summary.status, "IDENTICAL");
    }

    #[test]
    fn test_improvement_is_not_regression() {
        let first = analyze(TRACE);
        let second = analyze(&TRACE.replace("2 40 5 0.020000", "2 40 5 0.010000"));
        let report = generate_comparison(&first, &second);

        assert_eq!(report.modules.len(), 1);
        assert_eq!(report.modules[0].total_time_delta, -0.01);
        assert_eq!(report.summary.improvements, 1);
        assert_eq!(report.summary.status, "CHANGED");
    }
}

// ============================================================================
// INTEGRATION TESTS: FILES
// ============================================================================

mod file_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compare_trace_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("before.prof");
        let second = dir.path().join("after.prof");
        std::fs::write(&first, TRACE).unwrap();
        std::fs::write(&second, TRACE.replace("1 10 2 5", "1 10 2 6")).unwrap();

        let report = compare_files(&first, &second, &NoSourceResolver).unwrap();

        assert_eq!(report.modules.len(), 1);
        assert_eq!(report.modules[0].module_name, "calc main.p");
        assert_eq!(report.modules[0].times_called_delta, 1);
        assert_eq!(report.called.len(), 1);
        assert_eq!(report.called[0].call_count_delta, 1);
    }

    #[test]
    fn test_compare_report_against_trace() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("before.json");
        let trace_path = dir.path().join("after.prof");
        write_report(&to_report(analyze(TRACE)), &report_path).unwrap();
        std::fs::write(&trace_path, TRACE).unwrap();

        let report = compare_files(&report_path, &trace_path, &NoSourceResolver).unwrap();

        assert!(report.modules.is_empty());
        assert_eq!(report.summary.status, "IDENTICAL");
    }

    #[test]
    fn test_report_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("old.json");
        let mut old = to_report(analyze(TRACE));
        old.version = "0.1.0".to_string();
        write_report(&old, &report_path).unwrap();

        let err = load_session(&report_path, &NoSourceResolver).unwrap_err();
        assert!(matches!(err, DiffError::IncompatibleVersions(_, _)));
    }

    #[test]
    fn test_broken_trace_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.prof");
        let bad = dir.path().join("bad.prof");
        std::fs::write(&good, TRACE).unwrap();
        std::fs::write(&bad, TRACE.replace("0 0 1 1", "0 0 1")).unwrap();

        let err = compare_files(&good, &bad, &NoSourceResolver).unwrap_err();
        assert!(matches!(err, DiffError::Profile(_)));
    }
}
