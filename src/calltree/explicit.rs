//! Call tree from the explicit call tree section (version 3+).

use super::{sorted_events, CallTree, EventPool, TreeNode, TreeStrategy};
use crate::aggregator::SessionStatistics;
use crate::parser::schema::{ParsedProfile, TreeNodeRecord};
use crate::utils::config::{PERCENT_PLACES, SESSION_MODULE_ID};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::numeric::percent_of;
use std::collections::HashSet;

/// Build the tree from section 6 records
///
/// Nodes before the one matching the first trace event belong to the
/// profiler's setup phase and are dropped; the session root is kept so the
/// tree stays single-rooted.
pub fn build_explicit_tree(
    profile: &ParsedProfile,
    stats: &SessionStatistics,
    diagnostics: &mut Diagnostics,
) -> CallTree {
    let mut records: Vec<&TreeNodeRecord> = profile.call_tree.iter().collect();
    records.sort_by_key(|r| r.node_id);

    let Some(root) = records
        .iter()
        .copied()
        .find(|r| r.module_id == SESSION_MODULE_ID)
        .or_else(|| records.iter().copied().find(|r| r.parent_id == 0))
    else {
        diagnostics.report("calltree", "Call tree section has no root node", None);
        return CallTree::empty(TreeStrategy::Explicit);
    };

    let events = sorted_events(&profile.trace_events);
    let first_event = events.first();

    let start = first_event
        .and_then(|first| records.iter().copied().find(|r| r.module_id == first.module_id))
        .unwrap_or(root);

    let emitted: Vec<&TreeNodeRecord> = records
        .iter()
        .copied()
        .filter(|r| r.node_id == root.node_id || r.node_id >= start.node_id)
        .collect();
    let kept: HashSet<u32> = emitted.iter().map(|r| r.node_id).collect();

    let mut pool = EventPool::new(&events);
    if first_event.is_some() {
        pool.mark_used(0);
    }
    let first_start = first_event.map(|e| e.start_time);
    let total = stats.total_session_time;

    let mut nodes = Vec::with_capacity(emitted.len());
    for record in emitted {
        let is_root = record.node_id == root.node_id;

        let start_time = if is_root || record.node_id == start.node_id {
            first_start
        } else {
            pool.take_entry(record.module_id).map(|e| e.start_time)
        };

        let parent_id = if is_root {
            0
        } else if record.parent_id != 0 && kept.contains(&record.parent_id) {
            record.parent_id
        } else {
            diagnostics.report(
                "calltree",
                format!(
                    "Node {} re-attached to the session root (parent {} not kept)",
                    record.node_id, record.parent_id
                ),
                None,
            );
            root.node_id
        };

        nodes.push(TreeNode {
            node_id: record.node_id,
            parent_id,
            module_id: record.module_id,
            module_name: stats.name_of(record.module_id),
            line: record.line,
            call_count: record.call_count,
            cumulative_time: record.cumulative_time,
            start_time,
            percent_session: percent_of(record.cumulative_time, total, PERCENT_PLACES),
        });
    }

    CallTree {
        strategy: TreeStrategy::Explicit,
        nodes,
        skipped_nodes: 0,
    }
}
