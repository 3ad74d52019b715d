//! Source-link resolution.
//!
//! The statistics and relation builders ask whether a source artifact
//! exists for each module. Lookups never fail: a missing file, an empty
//! name or an unreadable search path all answer `false`.

mod search_path;

pub use search_path::SearchPathResolver;

use crate::parser::ModuleName;

/// Answers "does a source or listing file exist" for module names
pub trait SourceResolver: Sync {
    /// Whether a source file exists for the decomposed module name
    fn has_source(&self, name: &ModuleName<'_>) -> bool;

    /// Whether a listing file exists
    fn has_listing(&self, listing_file: &str) -> bool;

    /// Resolve many display names at once, in input order
    fn resolve_batch(&self, display_names: &[&str]) -> Vec<bool> {
        display_names
            .iter()
            .map(|name| self.has_source(&ModuleName::parse(name)))
            .collect()
    }
}

/// Resolver used when no search paths are configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSourceResolver;

impl SourceResolver for NoSourceResolver {
    fn has_source(&self, _name: &ModuleName<'_>) -> bool {
        false
    }

    fn has_listing(&self, _listing_file: &str) -> bool {
        false
    }
}
