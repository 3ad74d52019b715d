use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace file to analyze
    pub trace_file: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Configuration file (defaults to exec-profile.toml when present)
    pub config: Option<PathBuf>,

    /// Extra search paths, appended to the configured ones
    pub search_paths: Vec<PathBuf>,

    /// Number of modules listed in the summary
    pub top_modules: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace_file: PathBuf::new(),
            output_json: None,
            print_summary: false,
            config: None,
            search_paths: Vec::new(),
            top_modules: 10,
        }
    }
}

/// Arguments for the compare command
#[derive(Debug, Clone, Default)]
pub struct CompareArgs {
    /// Baseline trace or JSON report
    pub baseline: PathBuf,

    /// Target trace or JSON report
    pub target: PathBuf,

    /// Output path for the comparison JSON (optional)
    pub output: Option<PathBuf>,

    /// Print terminal summary
    pub summary: bool,

    /// Exit with an error when a matched module got slower
    pub fail_on_regression: bool,

    pub config: Option<PathBuf>,
    pub search_paths: Vec<PathBuf>,
}
