//! Call tree reconstruction.
//!
//! Two strategies, chosen by format version:
//! - `explicit`: version 3+ traces carry a call tree section
//! - `inferred`: older traces only have the flat chronological trace

mod explicit;
mod inferred;

pub use explicit::build_explicit_tree;
pub use inferred::{build_inferred_tree, drop_empty_constructors};

use crate::aggregator::SessionStatistics;
use crate::parser::schema::{ParsedProfile, TraceEvent};
use crate::utils::diagnostics::Diagnostics;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One invocation in the call tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub node_id: u32,

    /// 0 for the root
    pub parent_id: u32,

    pub module_id: u32,
    pub module_name: String,

    /// Line in the caller where the call happened
    pub line: i64,

    pub call_count: u64,

    /// Time including callees
    pub cumulative_time: f64,

    /// Absolute start, when a trace event could be matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    pub percent_session: f64,
}

/// How the tree was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStrategy {
    /// Read from the call tree section
    Explicit,
    /// Reconstructed from the flat trace
    Inferred,
}

/// A single-rooted call tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTree {
    pub strategy: TreeStrategy,
    pub nodes: Vec<TreeNode>,

    /// Inferred calls dropped because no parent could be matched
    pub skipped_nodes: usize,
}

impl CallTree {
    pub fn empty(strategy: TreeStrategy) -> Self {
        Self {
            strategy,
            nodes: Vec::new(),
            skipped_nodes: 0,
        }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.parent_id == 0)
    }

    pub fn children_of(&self, node_id: u32) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(move |n| n.parent_id == node_id)
    }

    /// Check the structural invariants: one root, no dangling parents,
    /// no cycles
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Ok(());
        }

        let roots = self.nodes.iter().filter(|n| n.parent_id == 0).count();
        if roots != 1 {
            return Err(format!("expected exactly one root, found {}", roots));
        }

        let parents: HashMap<u32, u32> = self
            .nodes
            .iter()
            .map(|n| (n.node_id, n.parent_id))
            .collect();
        if parents.len() != self.nodes.len() {
            return Err("duplicate node ids".to_string());
        }

        for node in &self.nodes {
            let mut visited = HashSet::new();
            let mut current = node.node_id;
            while current != 0 {
                if !visited.insert(current) {
                    return Err(format!("cycle through node {}", current));
                }
                current = *parents
                    .get(&current)
                    .ok_or_else(|| format!("node {} has a dangling parent", node.node_id))?;
                if current != 0 && !parents.contains_key(&current) {
                    return Err(format!(
                        "node {} has a dangling parent {}",
                        node.node_id, current
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Trace events with a "used" marker per index.
///
/// Matching scans skip used indices instead of removing items.
#[derive(Debug)]
pub(crate) struct EventPool<'a> {
    events: &'a [TraceEvent],
    used: Vec<bool>,
}

impl<'a> EventPool<'a> {
    pub(crate) fn new(events: &'a [TraceEvent]) -> Self {
        Self {
            events,
            used: vec![false; events.len()],
        }
    }

    pub(crate) fn mark_used(&mut self, index: usize) {
        if let Some(flag) = self.used.get_mut(index) {
            *flag = true;
        }
    }

    /// Consume the earliest unused entry event of `module_id`
    pub(crate) fn take_entry(&mut self, module_id: u32) -> Option<&'a TraceEvent> {
        let events = self.events;
        let index = events
            .iter()
            .enumerate()
            .find(|(i, e)| !self.used[*i] && e.module_id == module_id && e.is_entry())
            .map(|(i, _)| i)?;
        self.used[index] = true;
        Some(&events[index])
    }
}

/// Events ordered by start time; ties keep file order
pub(crate) fn sorted_events(events: &[TraceEvent]) -> Vec<TraceEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    sorted
}

/// Build the call tree with the strategy matching the trace
///
/// **Public** - main entry point for tree reconstruction
pub fn build_call_tree(
    profile: &ParsedProfile,
    stats: &SessionStatistics,
    diagnostics: &mut Diagnostics,
) -> CallTree {
    let tree = if profile.has_call_tree() {
        build_explicit_tree(profile, stats, diagnostics)
    } else {
        build_inferred_tree(profile, stats, diagnostics)
    };

    debug!(
        "Built {:?} call tree with {} nodes ({} skipped)",
        tree.strategy,
        tree.nodes.len(),
        tree.skipped_nodes
    );

    tree
}
