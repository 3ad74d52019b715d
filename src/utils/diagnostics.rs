//! Collector for non-fatal anomalies found while building a report.

use log::warn;
use serde::{Deserialize, Serialize};

/// A single non-fatal anomaly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Area that raised it (e.g. "description", "reference", "calltree")
    pub category: String,

    /// Short human-readable message
    pub message: String,

    /// Extra detail such as the offending text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Diagnostics sink threaded through the pipeline.
///
/// Every entry is also logged at warn level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, category: &str, message: impl Into<String>, detail: Option<String>) {
        let message = message.into();
        match &detail {
            Some(d) => warn!("[{}] {} ({})", category, message, d),
            None => warn!("[{}] {}", category, message),
        }
        self.entries.push(Diagnostic {
            category: category.to_string(),
            message,
            detail,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Count entries of one category
    pub fn count(&self, category: &str) -> usize {
        self.entries.iter().filter(|d| d.category == category).count()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_count() {
        let mut diags = Diagnostics::new();
        diags.report("description", "bad json", Some("{".to_string()));
        diags.report("reference", "unknown module 7", None);
        diags.report("reference", "unknown module 8", None);

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count("reference"), 2);
        assert_eq!(diags.entries()[0].detail.as_deref(), Some("{"));
    }
}
