//! Configuration and constants for the CLI.

use super::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Current comparison report schema version
pub const DIFF_VERSION: &str = "1.0.0";

/// A line made of this alone closes the current section
pub const SECTION_SEPARATOR: &str = ".";

// Section indices in the trace file
pub const SECTION_DESCRIPTION: usize = 0;
pub const SECTION_MODULES: usize = 1;
pub const SECTION_CALL_GRAPH: usize = 2;
pub const SECTION_LINE_SUMMARY: usize = 3;
pub const SECTION_TRACE: usize = 4;
pub const SECTION_CALL_TREE: usize = 6;

/// First format version carrying the auxiliary description block,
/// extended module lines and the call tree section
pub const EXTENDED_FORMAT_VERSION: u32 = 3;

/// Synthetic module representing the whole run
pub const SESSION_MODULE_ID: u32 = 0;
pub const SESSION_MODULE_NAME: &str = "Session";

// Rounding precision for derived values
pub const TIME_PLACES: u32 = 6;
pub const PERCENT_PLACES: u32 = 4;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "exec-profile.toml";

/// User configuration (loaded from TOML)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudioConfig {
    /// Directories searched for module sources and listings
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Extensions tried when a module name has none
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Worker threads used for batched source lookups
    #[serde(default = "default_resolver_threads")]
    pub resolver_threads: usize,
}

fn default_source_extensions() -> Vec<String> {
    vec![".p".to_string(), ".w".to_string(), ".cls".to_string()]
}

fn default_resolver_threads() -> usize {
    4
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            source_extensions: default_source_extensions(),
            resolver_threads: default_resolver_threads(),
        }
    }
}

impl StudioConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: StudioConfig = toml::from_str(&contents)?;
        debug!(
            "Loaded config from {} ({} search paths)",
            path.as_ref().display(),
            config.search_paths.len()
        );
        Ok(config)
    }

    /// Load `path` if given, else the default file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
