//! Integration tests for call tree reconstruction.

use exec_profile_studio::aggregator::{compute_session_statistics, SessionStatistics};
use exec_profile_studio::calltree::{build_call_tree, CallTree, TreeStrategy};
use exec_profile_studio::parser::{parse_profile, ParsedProfile};
use exec_profile_studio::resolver::NoSourceResolver;
use exec_profile_studio::utils::diagnostics::Diagnostics;
use std::collections::HashSet;
use std::path::Path;

const V1_TRACE: &str = "1 05/11/2023 \"flat\" 10:00:00 \"\"
.
1 \"main.p\" \"\" 0
2 \"util.p\" \"\" 0
.
0 0 1 1
.
1 0 1 0.000000 0.010000
1 5 1 0.010000 0.010000
.
1 0 0.000000 0.000000
1 5 0.010000 0.010000
.
";

const V3_TRACE: &str = "3 05/11/2023 \"tree\" 19:15:44 \"\" {\"StmtCnt\":10}
.
1 \"main.p\" \"\" 0 1 \"\"
2 \"calc main.p\" \"\" 0 20 \"\"
.
0 0 1 1
1 10 2 2
.
1 10 1 0.100000 0.400000
2 21 2 0.300000 0.300000
.
1 0 0.000000 1.000000
2 0 0.000000 1.100000
2 0 0.000000 1.300000
.
.
1 0 0 0 1 0.5 1 2
2 1 1 0 1 0.4 2 3 4
3 2 2 10 1 0.15
4 2 2 10 1 0.15
";

fn build(text: &str) -> (ParsedProfile, SessionStatistics, CallTree, Diagnostics) {
    let profile = parse_profile(Path::new("tree.prof"), text).unwrap();
    let mut diags = Diagnostics::new();
    let stats = compute_session_statistics(&profile, &NoSourceResolver, &mut diags).unwrap();
    let tree = build_call_tree(&profile, &stats, &mut diags);
    (profile, stats, tree, diags)
}

fn assert_single_rooted(tree: &CallTree) {
    let roots = tree.nodes.iter().filter(|n| n.parent_id == 0).count();
    assert_eq!(roots, 1);

    let ids: HashSet<u32> = tree.nodes.iter().map(|n| n.node_id).collect();
    for node in tree.nodes.iter().filter(|n| n.parent_id != 0) {
        assert!(ids.contains(&node.parent_id), "dangling parent on {}", node.node_id);
    }
    assert!(tree.validate().is_ok());
}

#[test]
fn test_flat_trace_single_root() {
    let (_, stats, tree, _) = build(V1_TRACE);

    assert_eq!(tree.strategy, TreeStrategy::Inferred);
    assert_eq!(tree.nodes.len(), 1);

    let root = tree.root().unwrap();
    assert_eq!(root.cumulative_time, 0.01);
    assert_eq!(root.percent_session, 100.0);
    assert!((root.cumulative_time - stats.total_session_time).abs() < 1e-6);
}

#[test]
fn test_explicit_tree_structure() {
    let (_, stats, tree, _) = build(V3_TRACE);

    assert_eq!(tree.strategy, TreeStrategy::Explicit);
    assert_single_rooted(&tree);

    let root = tree.root().unwrap();
    assert_eq!(root.module_name, "Session");
    assert!((root.cumulative_time - stats.total_session_time).abs() < 1e-6);
    assert_eq!(tree.children_of(2).count(), 2);
}

#[test]
fn test_explicit_nodes_get_start_times() {
    let (_, _, tree, _) = build(V3_TRACE);
    let calc_starts: Vec<Option<f64>> = tree
        .nodes
        .iter()
        .filter(|n| n.module_id == 2)
        .map(|n| n.start_time)
        .collect();

    assert_eq!(calc_starts, vec![Some(1.1), Some(1.3)]);
}

#[test]
fn test_missing_tree_section_falls_back() {
    let text = V3_TRACE
        .split("\n.\n.\n")
        .next()
        .map(|head| format!("{}\n.\n", head))
        .unwrap();
    let (profile, stats, tree, diags) = build(&text);

    assert!(!profile.has_call_tree());
    assert_eq!(stats.total_session_time, 0.4);
    assert_eq!(tree.strategy, TreeStrategy::Inferred);
    assert!(diags.count("calltree") >= 1);
    // every trace event is a line-0 entry, so all are dropped as empty
    // constructors
    assert!(tree.nodes.is_empty());
    assert_eq!(tree.skipped_nodes, 0);
}

// main.p calls util.p twice; the second util.p call runs leaf.p. The
// orphan.p entry follows a line of batch.p, which never had a node.
const NESTED_TRACE: &str = "1 05/11/2023 \"nested\" 10:00:00 \"\"
.
1 \"main.p\" \"\" 0
2 \"util.p\" \"\" 0
3 \"leaf.p\" \"\" 0
4 \"orphan.p\" \"\" 0
5 \"batch.p\" \"\" 0
.
0 0 1 1
1 5 2 2
2 4 3 1
.
1 5 1 0.100000 0.100000
1 6 1 0.050000 0.050000
1 7 1 0.050000 0.050000
2 3 1 0.100000 0.100000
2 4 1 0.050000 0.050000
3 1 1 0.100000 0.100000
4 1 1 0.050000 0.050000
5 2 1 0.050000 0.050000
.
1 0 0.000000 0.000000
1 5 0.100000 0.100000
2 0 0.000000 0.200000
2 3 0.100000 0.250000
1 6 0.050000 0.400000
2 0 0.000000 0.500000
2 4 0.050000 0.550000
3 0 0.000000 0.600000
3 1 0.100000 0.650000
5 2 0.050000 0.800000
4 0 0.000000 0.900000
4 1 0.050000 0.950000
1 7 0.050000 1.000000
.
";

#[test]
fn test_inferred_parents_follow_latest_caller_node() {
    let (_, _, tree, _) = build(NESTED_TRACE);

    assert_eq!(tree.strategy, TreeStrategy::Inferred);
    assert_single_rooted(&tree);

    let shape: Vec<(u32, u32, u32)> = tree
        .nodes
        .iter()
        .map(|n| (n.node_id, n.parent_id, n.module_id))
        .collect();
    assert_eq!(shape, vec![(1, 0, 1), (2, 1, 2), (3, 1, 2), (4, 3, 3)]);

    let leaf = tree.nodes.iter().find(|n| n.module_id == 3).unwrap();
    assert_eq!(leaf.line, 4);
}

#[test]
fn test_inferred_cumulative_times() {
    let (_, _, tree, _) = build(NESTED_TRACE);
    let times: Vec<f64> = tree.nodes.iter().map(|n| n.cumulative_time).collect();

    assert_eq!(times, vec![1.0, 0.85, 0.55, 0.45]);
    assert_eq!(tree.root().unwrap().percent_session, 100.0);
}

#[test]
fn test_inferred_nodes_sorted_by_start() {
    let (_, _, tree, _) = build(NESTED_TRACE);
    let starts: Vec<Option<f64>> = tree.nodes.iter().map(|n| n.start_time).collect();

    assert_eq!(starts, vec![Some(0.0), Some(0.2), Some(0.5), Some(0.6)]);
}

#[test]
fn test_unmatched_inferred_call_is_skipped() {
    let (_, _, tree, diags) = build(NESTED_TRACE);

    assert_eq!(tree.skipped_nodes, 1);
    assert!(tree.nodes.iter().all(|n| n.module_id != 4));
    assert_eq!(diags.count("calltree"), 1);
}
