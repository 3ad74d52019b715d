//! Per-section line tokenizers.
//!
//! Each function turns one trace line into a typed record. Errors are plain
//! messages; the caller adds the line number and aggregates them.

use super::module_name::normalize_module_name;
use super::schema::{
    CallGraphEdge, LineSummaryRecord, ModuleRecord, SessionAux, SessionDescription, TraceEvent,
    TreeNodeRecord,
};
use crate::utils::config::EXTENDED_FORMAT_VERSION;
use crate::utils::diagnostics::Diagnostics;
use std::str::FromStr;

/// Parse the session description line
///
/// A malformed auxiliary JSON block is recorded in `diagnostics` and the
/// description is returned without it.
pub fn parse_description(
    line: &str,
    diagnostics: &mut Diagnostics,
) -> Result<SessionDescription, String> {
    let version = line
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| format!("description must start with a version digit: {:?}", line))?;

    let (head, aux_text) = match line.find('{') {
        Some(idx) if version >= EXTENDED_FORMAT_VERSION => (&line[..idx], Some(&line[idx..])),
        _ => (line, None),
    };

    let parts: Vec<&str> = head.split('"').collect();
    if parts.len() < 3 {
        return Err(format!(
            "description needs a quoted text and a time, found {} segments",
            parts.len()
        ));
    }

    let date = parts[0].split_whitespace().nth(1).unwrap_or("").to_string();
    let time = parts[2].trim().to_string();
    let user = parts.get(3).map(|u| u.to_string());

    let aux = aux_text.and_then(|text| parse_session_aux(text, diagnostics));

    Ok(SessionDescription {
        version,
        date,
        description: parts[1].to_string(),
        time,
        user,
        aux,
    })
}

/// Backslashes in paths are not escaped by the profiler
fn parse_session_aux(text: &str, diagnostics: &mut Diagnostics) -> Option<SessionAux> {
    let escaped = text.trim().replace('\\', "\\\\");
    match serde_json::from_str::<SessionAux>(&escaped) {
        Ok(aux) => Some(aux),
        Err(e) => {
            diagnostics.report(
                "description",
                format!("Failed to parse auxiliary session block: {}", e),
                Some(text.trim().to_string()),
            );
            None
        }
    }
}

/// Parse a module line
///
/// `ID "name" "listing" CRC` and, for version 3+, `... CRC LINE "signature"`.
pub fn parse_module(line: &str, version: u32) -> Result<ModuleRecord, String> {
    let parts: Vec<&str> = line.split('"').collect();
    if parts.len() < 5 {
        return Err(format!(
            "module line needs quoted name and listing, found {} segments",
            parts.len()
        ));
    }

    let id = parse_token::<u32>(parts[0].trim(), "module id")?;
    let numbers: Vec<&str> = parts[4].split_whitespace().collect();

    let (crc, def_line, signature) = if version >= EXTENDED_FORMAT_VERSION {
        if numbers.len() != 2 {
            return Err(format!(
                "module line expects CRC and line number, found {} fields",
                numbers.len()
            ));
        }
        let signature = parts.get(5).map(|s| s.to_string());
        (
            parse_token::<i64>(numbers[0], "crc")?,
            Some(parse_token::<u32>(numbers[1], "module line")?),
            signature,
        )
    } else {
        if numbers.len() != 1 {
            return Err(format!(
                "module line expects a CRC, found {} fields",
                numbers.len()
            ));
        }
        (parse_token::<i64>(numbers[0], "crc")?, None, None)
    };

    Ok(ModuleRecord {
        id,
        name: normalize_module_name(parts[1]),
        listing_file: parts[3].to_string(),
        crc,
        line: def_line,
        signature,
    })
}

/// `callerId callerLine calleeId count`
pub fn parse_call_graph_edge(line: &str) -> Result<CallGraphEdge, String> {
    let tokens = positional(line, 4, "call graph")?;
    Ok(CallGraphEdge {
        caller_id: parse_token(tokens[0], "caller id")?,
        caller_line: parse_token(tokens[1], "caller line")?,
        callee_id: parse_token(tokens[2], "callee id")?,
        call_count: parse_token(tokens[3], "call count")?,
    })
}

/// `moduleId line execCount activeTime cumulativeTime`
pub fn parse_line_summary(line: &str) -> Result<LineSummaryRecord, String> {
    let tokens = positional(line, 5, "line summary")?;
    Ok(LineSummaryRecord {
        module_id: parse_token(tokens[0], "module id")?,
        line: parse_token(tokens[1], "line")?,
        exec_count: parse_token(tokens[2], "execution count")?,
        active_time: parse_token(tokens[3], "active time")?,
        cumulative_time: parse_token(tokens[4], "cumulative time")?,
    })
}

/// `moduleId line activeTime startTime`
pub fn parse_trace_event(line: &str) -> Result<TraceEvent, String> {
    let tokens = positional(line, 4, "trace")?;
    Ok(TraceEvent {
        module_id: parse_token(tokens[0], "module id")?,
        line: parse_token(tokens[1], "line")?,
        active_time: parse_token(tokens[2], "active time")?,
        start_time: parse_token(tokens[3], "start time")?,
    })
}

/// `nodeId parentId moduleId line calls cumTime [childCount child...]`
pub fn parse_tree_node(line: &str) -> Result<TreeNodeRecord, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        return Err(format!(
            "call tree line expects at least 6 fields, found {}",
            tokens.len()
        ));
    }

    let children = if tokens.len() > 6 {
        let count: usize = parse_token(tokens[6], "child count")?;
        if tokens.len() != 7 + count {
            return Err(format!(
                "call tree line declares {} children but lists {}",
                count,
                tokens.len() - 7
            ));
        }
        tokens[7..]
            .iter()
            .map(|t| parse_token::<u32>(t, "child id"))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    Ok(TreeNodeRecord {
        node_id: parse_token(tokens[0], "node id")?,
        parent_id: parse_token(tokens[1], "parent id")?,
        module_id: parse_token(tokens[2], "module id")?,
        line: parse_token(tokens[3], "line")?,
        call_count: parse_token(tokens[4], "call count")?,
        cumulative_time: parse_token(tokens[5], "cumulative time")?,
        children,
    })
}

fn positional<'a>(line: &'a str, expected: usize, section: &str) -> Result<Vec<&'a str>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != expected {
        return Err(format!(
            "{} line expects {} fields, found {}",
            section,
            expected,
            tokens.len()
        ));
    }
    Ok(tokens)
}

fn parse_token<T: FromStr>(token: &str, field: &str) -> Result<T, String> {
    token
        .parse::<T>()
        .map_err(|_| format!("invalid {}: {:?}", field, token))
}
