//! Module matching and delta calculation.
//!
//! Handles the math for computing differences between sessions, including
//! the identity rules for matching modules and edges.

use crate::aggregator::schema::{CallEdgeView, ModuleStats};
use crate::utils::config::TIME_PLACES;
use crate::utils::numeric::round_to;
use std::collections::{BTreeMap, HashMap};

use super::schema::{ComparedEdge, ComparedModule, ComparisonStatus};

/// Rounded difference `second - first`
pub fn time_delta(first: f64, second: f64) -> f64 {
    round_to(second - first, TIME_PLACES)
}

/// Signed difference of two counters
pub fn count_delta(first: u64, second: u64) -> i64 {
    (second as i64) - (first as i64)
}

/// Compare two module lists
///
/// Modules match only when both ID and name agree; an ID reused for a
/// different name counts as one removal plus one addition. Matched rows
/// whose three deltas are all zero are left out.
///
/// # Returns
/// First-session order for matched and removed rows, then added rows in
/// second-session order
pub fn compare_modules(first: &[ModuleStats], second: &[ModuleStats]) -> Vec<ComparedModule> {
    let first_map: HashMap<(u32, &str), &ModuleStats> = first
        .iter()
        .map(|m| ((m.module_id, m.name.as_str()), m))
        .collect();
    let second_map: HashMap<(u32, &str), &ModuleStats> = second
        .iter()
        .map(|m| ((m.module_id, m.name.as_str()), m))
        .collect();

    let mut compared = Vec::new();

    for module in first {
        match second_map.get(&(module.module_id, module.name.as_str())) {
            Some(other) => {
                let row = build_compared(module, Some(module), Some(other));
                let unchanged = row.times_called_delta == 0
                    && row.average_time_delta == 0.0
                    && row.total_time_delta == 0.0;
                if !unchanged {
                    compared.push(row);
                }
            }
            None => compared.push(build_compared(module, Some(module), None)),
        }
    }

    for module in second {
        if !first_map.contains_key(&(module.module_id, module.name.as_str())) {
            compared.push(build_compared(module, None, Some(module)));
        }
    }

    compared
}

fn build_compared(
    identity: &ModuleStats,
    first: Option<&ModuleStats>,
    second: Option<&ModuleStats>,
) -> ComparedModule {
    let status = match (first, second) {
        (Some(_), Some(_)) => ComparisonStatus::Matched,
        (Some(_), None) => ComparisonStatus::Removed,
        _ => ComparisonStatus::Added,
    };

    let called = |m: Option<&ModuleStats>| m.map(|m| m.times_called).unwrap_or(0);
    let average = |m: Option<&ModuleStats>| m.map(|m| m.average_time).unwrap_or(0.0);
    let total = |m: Option<&ModuleStats>| m.map(|m| m.total_time).unwrap_or(0.0);

    ComparedModule {
        module_id: identity.module_id,
        module_name: identity.name.clone(),
        first_times_called: called(first),
        second_times_called: called(second),
        first_average_time: average(first),
        second_average_time: average(second),
        first_total_time: total(first),
        second_total_time: total(second),
        times_called_delta: count_delta(called(first), called(second)),
        average_time_delta: time_delta(average(first), average(second)),
        total_time_delta: time_delta(total(first), total(second)),
        status,
    }
}

/// Compare calling or called rows
///
/// Rows are keyed by (module ID, peer name) with call counts summed, so
/// repeated edges from different call sites compare as one. Rows with no
/// count change are left out.
pub fn compare_edges(first: &[CallEdgeView], second: &[CallEdgeView]) -> Vec<ComparedEdge> {
    let first_counts = sum_edges(first);
    let second_counts = sum_edges(second);

    let mut compared = Vec::new();

    for (key, &count) in &first_counts {
        match second_counts.get(key) {
            Some(&other) if other == count => {}
            Some(&other) => compared.push(edge_row(key, count, other, ComparisonStatus::Matched)),
            None => compared.push(edge_row(key, count, 0, ComparisonStatus::Removed)),
        }
    }

    for (key, &count) in &second_counts {
        if !first_counts.contains_key(key) {
            compared.push(edge_row(key, 0, count, ComparisonStatus::Added));
        }
    }

    compared
}

fn sum_edges(edges: &[CallEdgeView]) -> BTreeMap<(u32, String), u64> {
    let mut counts = BTreeMap::new();
    for edge in edges {
        *counts
            .entry((edge.module_id, edge.peer_name.clone()))
            .or_insert(0) += edge.call_count;
    }
    counts
}

fn edge_row(
    key: &(u32, String),
    first: u64,
    second: u64,
    status: ComparisonStatus,
) -> ComparedEdge {
    ComparedEdge {
        module_id: key.0,
        peer_name: key.1.clone(),
        first_call_count: first,
        second_call_count: second,
        call_count_delta: count_delta(first, second),
        status,
    }
}
