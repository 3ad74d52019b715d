//! Module display-name handling.
//!
//! Names are either `file` or `procedure file`; the profiler also emits
//! `procedure file file` for constructors and destructors, which is
//! collapsed to the two-token form.

use serde::Serialize;

/// Collapse `a b b` to `a b`; every other name is returned unchanged
pub fn normalize_module_name(name: &str) -> String {
    let tokens: Vec<&str> = name.split(' ').collect();
    if tokens.len() == 3 && tokens[1] == tokens[2] {
        format!("{} {}", tokens[0], tokens[1])
    } else {
        name.to_string()
    }
}

/// A display name split into its procedure and file parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleName<'a> {
    /// Internal procedure, function or method name
    pub procedure: Option<&'a str>,

    /// File the module lives in
    pub file: &'a str,
}

impl<'a> ModuleName<'a> {
    pub fn parse(display: &'a str) -> Self {
        let mut tokens = display.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(procedure), Some(file)) => ModuleName {
                procedure: Some(procedure),
                file,
            },
            (Some(file), None) => ModuleName {
                procedure: None,
                file,
            },
            _ => ModuleName {
                procedure: None,
                file: "",
            },
        }
    }
}
