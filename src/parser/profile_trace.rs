//! Main parser for execution profile traces.
//!
//! A trace is a sequence of sections separated by a line holding a lone
//! `.`. The section index decides how each line is tokenized.

use super::records::{
    parse_call_graph_edge, parse_description, parse_line_summary, parse_module, parse_trace_event,
    parse_tree_node,
};
use super::schema::{ParsedProfile, SessionDescription};
use crate::utils::config::{
    SECTION_CALL_GRAPH, SECTION_CALL_TREE, SECTION_DESCRIPTION, SECTION_LINE_SUMMARY,
    SECTION_MODULES, SECTION_SEPARATOR, SECTION_TRACE,
};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::ProfileError;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Version assumed for module lines seen before any description
const FALLBACK_VERSION: u32 = 1;

/// Read and parse a trace file
///
/// **Public** - thin I/O wrapper around [`parse_profile`]
pub fn read_profile_trace(path: impl AsRef<Path>) -> Result<ParsedProfile, ProfileError> {
    let path = path.as_ref();
    info!("Reading trace: {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_profile(path, &text)
}

/// Parse trace text into raw record collections
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `path` - Where the text came from, used in messages only
/// * `text` - Full trace contents
///
/// # Errors
/// * `ProfileError::Malformed` - One or more lines could not be tokenized;
///   every offending line is listed
/// * `ProfileError::MissingDescription` - The description section is empty
pub fn parse_profile(path: &Path, text: &str) -> Result<ParsedProfile, ProfileError> {
    let mut diagnostics = Diagnostics::new();
    let mut failures: Vec<String> = Vec::new();

    let mut description: Option<SessionDescription> = None;
    let mut profile = ParsedProfile {
        path: path.to_path_buf(),
        description: SessionDescription {
            version: FALLBACK_VERSION,
            date: String::new(),
            description: String::new(),
            time: String::new(),
            user: None,
            aux: None,
        },
        modules: Vec::new(),
        call_graph: Vec::new(),
        line_summaries: Vec::new(),
        trace_events: Vec::new(),
        call_tree: Vec::new(),
        diagnostics: Diagnostics::new(),
    };

    let mut section = SECTION_DESCRIPTION;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');

        if line == SECTION_SEPARATOR {
            section += 1;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let version = description
            .as_ref()
            .map(|d| d.version)
            .unwrap_or(FALLBACK_VERSION);

        let result = match section {
            SECTION_DESCRIPTION => {
                if description.is_some() {
                    Err("unexpected second description line".to_string())
                } else {
                    parse_description(line, &mut diagnostics).map(|d| description = Some(d))
                }
            }
            SECTION_MODULES => parse_module(line, version).map(|m| profile.modules.push(m)),
            SECTION_CALL_GRAPH => {
                parse_call_graph_edge(line).map(|e| profile.call_graph.push(e))
            }
            SECTION_LINE_SUMMARY => {
                parse_line_summary(line).map(|r| profile.line_summaries.push(r))
            }
            SECTION_TRACE => parse_trace_event(line).map(|e| profile.trace_events.push(e)),
            SECTION_CALL_TREE => parse_tree_node(line).map(|n| profile.call_tree.push(n)),
            _ => Ok(()),
        };

        if let Err(message) = result {
            failures.push(format!("line {} (section {}): {}", index + 1, section, message));
        }
    }

    if !failures.is_empty() {
        return Err(ProfileError::Malformed {
            path: path.to_path_buf(),
            messages: failures,
        });
    }

    profile.description =
        description.ok_or_else(|| ProfileError::MissingDescription(path.to_path_buf()))?;
    profile.diagnostics = diagnostics;

    debug!(
        "Parsed trace v{}: {} modules, {} edges, {} line summaries, {} events, {} tree nodes",
        profile.version(),
        profile.modules.len(),
        profile.call_graph.len(),
        profile.line_summaries.len(),
        profile.trace_events.len(),
        profile.call_tree.len()
    );

    Ok(profile)
}
