//! Session totals and per-module statistics.

use super::schema::ModuleStats;
use crate::parser::schema::ParsedProfile;
use crate::resolver::SourceResolver;
use crate::utils::config::{
    EXTENDED_FORMAT_VERSION, PERCENT_PLACES, SESSION_MODULE_ID, SESSION_MODULE_NAME, TIME_PLACES,
};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::ProfileError;
use crate::utils::numeric::{percent_of, round_to, safe_ratio};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Total session time plus the module list (session module first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_session_time: f64,
    pub modules: Vec<ModuleStats>,
}

impl SessionStatistics {
    pub fn module(&self, id: u32) -> Option<&ModuleStats> {
        self.modules.iter().find(|m| m.module_id == id)
    }

    /// Display name for `id`, or a placeholder for unknown IDs
    pub fn name_of(&self, id: u32) -> String {
        self.module(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("<unknown {}>", id))
    }

    pub fn percent_of(&self, id: u32) -> f64 {
        self.module(id).map(|m| m.percent_session).unwrap_or(0.0)
    }
}

/// Compute the session total
///
/// Version 1-2 traces sum line active times. Later versions read the
/// cumulative time of the session node from the call tree.
pub fn total_session_time(
    profile: &ParsedProfile,
    diagnostics: &mut Diagnostics,
) -> Result<f64, ProfileError> {
    if profile.version() >= EXTENDED_FORMAT_VERSION {
        if !profile.call_tree.is_empty() {
            return profile
                .call_tree
                .iter()
                .find(|n| n.module_id == SESSION_MODULE_ID)
                .map(|n| n.cumulative_time)
                .ok_or_else(|| ProfileError::MissingSessionRoot(profile.path.clone()));
        }
        diagnostics.report(
            "calltree",
            "No call tree section; session time taken from line summaries",
            None,
        );
    }

    let sum: f64 = profile.line_summaries.iter().map(|r| r.active_time).sum();
    Ok(round_to(sum, TIME_PLACES))
}

/// Build per-module statistics
///
/// **Public** - main entry point for aggregation
///
/// Source links for all modules are resolved in one batch.
pub fn compute_session_statistics(
    profile: &ParsedProfile,
    resolver: &dyn SourceResolver,
    diagnostics: &mut Diagnostics,
) -> Result<SessionStatistics, ProfileError> {
    let total = total_session_time(profile, diagnostics)?;
    debug!("Total session time: {}", total);

    let mut times_called: HashMap<u32, u64> = HashMap::new();
    for edge in &profile.call_graph {
        *times_called.entry(edge.callee_id).or_insert(0) += edge.call_count;
    }

    let mut line_time: HashMap<u32, f64> = HashMap::new();
    for record in &profile.line_summaries {
        *line_time.entry(record.module_id).or_insert(0.0) += record.active_time;
    }

    let mut modules = vec![ModuleStats {
        module_id: SESSION_MODULE_ID,
        name: SESSION_MODULE_NAME.to_string(),
        line: None,
        times_called: 1,
        total_time: 0.0,
        average_time: 0.0,
        percent_session: 0.0,
        has_link: false,
        listing_file: String::new(),
    }];

    let mut seen: HashSet<u32> = HashSet::from([SESSION_MODULE_ID]);
    for record in &profile.modules {
        if !seen.insert(record.id) {
            diagnostics.report(
                "module",
                format!("Duplicate module id {} ignored", record.id),
                Some(record.name.clone()),
            );
            continue;
        }

        let called = times_called.get(&record.id).copied().unwrap_or(0);
        let total_time = round_to(
            line_time.get(&record.id).copied().unwrap_or(0.0),
            TIME_PLACES,
        );

        modules.push(ModuleStats {
            module_id: record.id,
            name: record.name.clone(),
            line: record.line,
            times_called: called,
            total_time,
            average_time: safe_ratio(total_time, called as f64, TIME_PLACES),
            percent_session: 0.0,
            has_link: false,
            listing_file: record.listing_file.clone(),
        });
    }

    // Percentages need the complete list
    for module in modules.iter_mut().skip(1) {
        module.percent_session = percent_of(module.total_time, total, PERCENT_PLACES);
    }

    let names: Vec<&str> = modules.iter().skip(1).map(|m| m.name.as_str()).collect();
    let links = resolver.resolve_batch(&names);
    for (module, has_link) in modules.iter_mut().skip(1).zip(links) {
        module.has_link = has_link;
    }

    check_references(profile, &seen, diagnostics);

    Ok(SessionStatistics {
        total_session_time: total,
        modules,
    })
}

/// Report module IDs referenced by records that have no module definition
fn check_references(profile: &ParsedProfile, known: &HashSet<u32>, diagnostics: &mut Diagnostics) {
    let referenced = profile
        .call_graph
        .iter()
        .flat_map(|e| [e.caller_id, e.callee_id])
        .chain(profile.line_summaries.iter().map(|r| r.module_id))
        .chain(profile.trace_events.iter().map(|e| e.module_id))
        .chain(profile.call_tree.iter().map(|n| n.module_id));

    let mut unknown: Vec<u32> = referenced.filter(|id| !known.contains(id)).collect();
    unknown.sort_unstable();
    unknown.dedup();

    for id in unknown {
        diagnostics.report(
            "reference",
            format!("Module id {} is referenced but never defined", id),
            None,
        );
    }
}
