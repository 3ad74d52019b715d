//! Call tree inferred from the flat trace (versions 1-2).
//!
//! Known limitation: a call whose caller node cannot be matched is
//! skipped, which can drop nodes in deeply reentrant or mutually recursive
//! code. The number of skipped calls is reported on the tree.

use super::{sorted_events, CallTree, TreeNode, TreeStrategy};
use crate::aggregator::SessionStatistics;
use crate::parser::schema::{ParsedProfile, TraceEvent};
use crate::utils::config::TIME_PLACES;
use crate::utils::diagnostics::Diagnostics;
use crate::utils::numeric::{percent_of, round_to};
use std::collections::HashSet;

/// Remove entry events of modules that never executed a statement
///
/// These are no-op constructor calls.
pub fn drop_empty_constructors(events: &[TraceEvent]) -> Vec<TraceEvent> {
    let executed: HashSet<u32> = events
        .iter()
        .filter(|e| !e.is_entry())
        .map(|e| e.module_id)
        .collect();

    events
        .iter()
        .filter(|e| !e.is_entry() || executed.contains(&e.module_id))
        .copied()
        .collect()
}

/// Indices of events that start a new call, in chronological order.
///
/// An entry event counts when the next event forward in time is not
/// itself an entry.
fn call_starts(events: &[TraceEvent]) -> Vec<usize> {
    let mut starts: Vec<usize> = (1..events.len())
        .rev()
        .filter(|&i| {
            events[i].is_entry() && events.get(i + 1).map_or(true, |next| !next.is_entry())
        })
        .collect();
    starts.reverse();
    starts
}

/// Cumulative time of the call starting at `index`.
///
/// Starts from the event's own active time and widens to the furthest end
/// of any later event.
fn cumulative_time(events: &[TraceEvent], index: usize) -> f64 {
    let call = &events[index];
    let cumulative = events[index + 1..]
        .iter()
        .map(|later| later.start_time + later.active_time - call.start_time)
        .fold(call.active_time, f64::max);

    round_to(cumulative, TIME_PLACES)
}

/// Build the tree from trace events alone
pub fn build_inferred_tree(
    profile: &ParsedProfile,
    stats: &SessionStatistics,
    diagnostics: &mut Diagnostics,
) -> CallTree {
    let events = drop_empty_constructors(&sorted_events(&profile.trace_events));
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return CallTree::empty(TreeStrategy::Inferred);
    };

    let total = stats.total_session_time;
    let mut nodes = vec![TreeNode {
        node_id: 1,
        parent_id: 0,
        module_id: first.module_id,
        module_name: stats.name_of(first.module_id),
        line: 0,
        call_count: 1,
        cumulative_time: round_to(last.start_time - first.start_time, TIME_PLACES),
        start_time: Some(first.start_time),
        percent_session: 100.0,
    }];

    let mut skipped = 0;
    for index in call_starts(&events) {
        let event = &events[index];
        let caller = &events[index - 1];

        // Most recent node of the caller module that started before us
        let parent = nodes
            .iter()
            .filter(|n| {
                n.module_id == caller.module_id
                    && n.start_time.is_some_and(|s| s <= event.start_time)
            })
            .fold(None::<&TreeNode>, |best, n| match best {
                Some(b) if b.start_time > n.start_time => Some(b),
                _ => Some(n),
            });

        let Some(parent_id) = parent.map(|p| p.node_id) else {
            skipped += 1;
            continue;
        };

        let cumulative = cumulative_time(&events, index);
        nodes.push(TreeNode {
            node_id: nodes.len() as u32 + 1,
            parent_id,
            module_id: event.module_id,
            module_name: stats.name_of(event.module_id),
            line: caller.line,
            call_count: 1,
            cumulative_time: cumulative,
            start_time: Some(event.start_time),
            percent_session: percent_of(cumulative, total, TIME_PLACES),
        });
    }

    if skipped > 0 {
        diagnostics.report(
            "calltree",
            format!("{} inferred calls had no matching parent and were skipped", skipped),
            None,
        );
    }

    nodes.sort_by(|a, b| {
        a.start_time
            .unwrap_or(0.0)
            .total_cmp(&b.start_time.unwrap_or(0.0))
    });

    CallTree {
        strategy: TreeStrategy::Inferred,
        nodes,
        skipped_nodes: skipped,
    }
}
