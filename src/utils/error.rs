//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a trace file unusable
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read trace file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed trace {}: {}", .path.display(), .messages.join("; "))]
    Malformed {
        path: PathBuf,
        messages: Vec<String>,
    },

    #[error("Trace {} has no session description line", .0.display())]
    MissingDescription(PathBuf),

    #[error("Trace {} has a call tree section without a session root node", .0.display())]
    MissingSessionRoot(PathBuf),
}

impl ProfileError {
    /// Human-readable messages, one per underlying problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            ProfileError::Malformed { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
