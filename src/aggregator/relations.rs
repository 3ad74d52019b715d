//! Calling/called edge views and per-line views.

use super::schema::{CallEdgeView, LineView};
use super::session_stats::SessionStatistics;
use crate::parser::schema::ParsedProfile;
use crate::utils::config::TIME_PLACES;
use crate::utils::numeric::safe_ratio;
use serde::{Deserialize, Serialize};

/// Relation lists derived from one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relations {
    /// Rows keyed by callee, peer is the caller
    pub calling: Vec<CallEdgeView>,

    /// Rows keyed by caller, peer is the callee
    pub called: Vec<CallEdgeView>,

    pub lines: Vec<LineView>,
}

/// Build calling/called rows, one pair per call-graph edge
///
/// Rows sharing a module and peer are not merged.
pub fn build_call_edges(
    profile: &ParsedProfile,
    stats: &SessionStatistics,
) -> (Vec<CallEdgeView>, Vec<CallEdgeView>) {
    let mut calling = Vec::with_capacity(profile.call_graph.len());
    let mut called = Vec::with_capacity(profile.call_graph.len());

    for edge in &profile.call_graph {
        calling.push(CallEdgeView {
            module_id: edge.callee_id,
            peer_module_id: edge.caller_id,
            peer_name: stats.name_of(edge.caller_id),
            call_count: edge.call_count,
            peer_times_called: None,
            peer_percent_session: stats.percent_of(edge.caller_id),
        });

        called.push(CallEdgeView {
            module_id: edge.caller_id,
            peer_module_id: edge.callee_id,
            peer_name: stats.name_of(edge.callee_id),
            call_count: edge.call_count,
            peer_times_called: Some(
                stats
                    .module(edge.callee_id)
                    .map(|m| m.times_called)
                    .unwrap_or(0),
            ),
            peer_percent_session: stats.percent_of(edge.callee_id),
        });
    }

    (calling, called)
}

/// One row per line summary record
pub fn build_line_views(profile: &ParsedProfile, stats: &SessionStatistics) -> Vec<LineView> {
    profile
        .line_summaries
        .iter()
        .map(|record| LineView {
            module_id: record.module_id,
            line: record.line,
            times_executed: record.exec_count,
            average_time: safe_ratio(record.active_time, record.exec_count as f64, TIME_PLACES),
            total_time: record.active_time,
            has_link: stats
                .module(record.module_id)
                .map(|m| m.has_link)
                .unwrap_or(false),
        })
        .collect()
}

pub fn build_relations(profile: &ParsedProfile, stats: &SessionStatistics) -> Relations {
    let (calling, called) = build_call_edges(profile, stats);
    Relations {
        calling,
        called,
        lines: build_line_views(profile, stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::session_stats::compute_session_statistics;
    use crate::parser::parse_profile;
    use crate::resolver::NoSourceResolver;
    use crate::utils::diagnostics::Diagnostics;
    use std::path::Path;

    const TRACE: &str = "1 05/11/2023 \"demo\" 10:00:00 \"\"
.
1 \"main.p\" \"\" 0
2 \"calc main.p\" \"\" 0
.
0 0 1 1
1 10 2 3
1 12 2 2
.
1 10 1 0.500000 0.900000
2 40 2 0.009226 0.009226
2 41 0 0.000000 0.000000
.
";

    fn relations() -> Relations {
        let profile = parse_profile(Path::new("t.prof"), TRACE).unwrap();
        let mut diags = Diagnostics::new();
        let stats = compute_session_statistics(&profile, &NoSourceResolver, &mut diags).unwrap();
        build_relations(&profile, &stats)
    }

    #[test]
    fn test_one_row_per_edge_in_each_view() {
        let rel = relations();
        assert_eq!(rel.calling.len(), 3);
        assert_eq!(rel.called.len(), 3);

        // Not merged even though module and peer repeat
        let calc_callers: Vec<_> = rel.calling.iter().filter(|r| r.module_id == 2).collect();
        assert_eq!(calc_callers.len(), 2);
        assert_eq!(calc_callers[0].peer_name, "main.p");
        assert!(calc_callers[0].peer_times_called.is_none());
    }

    #[test]
    fn test_called_view_carries_callee_totals() {
        let rel = relations();
        let row = rel
            .called
            .iter()
            .find(|r| r.module_id == 1 && r.peer_module_id == 2)
            .unwrap();
        assert_eq!(row.peer_name, "calc main.p");
        assert_eq!(row.peer_times_called, Some(5));
        assert_eq!(row.call_count, 3);
    }

    #[test]
    fn test_session_caller_name() {
        let rel = relations();
        let row = rel.calling.iter().find(|r| r.module_id == 1).unwrap();
        assert_eq!(row.peer_name, "Session");
        assert_eq!(row.peer_percent_session, 0.0);
    }

    #[test]
    fn test_line_average() {
        let rel = relations();
        let line = rel.lines.iter().find(|l| l.line == 40).unwrap();
        assert_eq!(line.average_time, 0.004613);

        let unexecuted = rel.lines.iter().find(|l| l.line == 41).unwrap();
        assert_eq!(unexecuted.average_time, 0.0);
    }
}
