//! Utility modules for configuration, error handling, and diagnostics.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod numeric;

// Re-export commonly used types for convenience
pub use config::StudioConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConfigError, OutputError, ProfileError};
