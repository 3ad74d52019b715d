//! Exec Profile Studio CLI
//!
//! Parses execution profile traces, aggregates per-module statistics,
//! rebuilds call trees and compares sessions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use exec_profile_studio::commands::{
    display_schema, display_version, execute_analyze, execute_compare, validate_args,
    validate_trace_file, AnalyzeArgs, CompareArgs,
};

/// Exec Profile Studio - analysis and comparison of execution profile traces
#[derive(Parser, Debug)]
#[command(name = "exec-profile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a trace and write a JSON report
    Analyze {
        /// Trace file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Output path for JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of modules listed in the summary
        #[arg(long, default_value = "10")]
        top_modules: usize,

        /// Configuration file (TOML)
        #[arg(short, long, env = "EXEC_PROFILE_CONFIG")]
        config: Option<PathBuf>,

        /// Additional source search path (repeatable)
        #[arg(long = "search-path")]
        search_paths: Vec<PathBuf>,
    },

    /// Compare two sessions (trace files or JSON reports)
    Compare {
        /// Baseline trace or report
        #[arg(short, long)]
        baseline: PathBuf,

        /// Target trace or report
        #[arg(short, long)]
        target: PathBuf,

        /// Output path for comparison JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print terminal summary
        #[arg(long)]
        summary: bool,

        /// Exit non-zero when a module got slower
        #[arg(long)]
        fail_on_regression: bool,

        /// Configuration file (TOML)
        #[arg(short, long, env = "EXEC_PROFILE_CONFIG")]
        config: Option<PathBuf>,

        /// Additional source search path (repeatable)
        #[arg(long = "search-path")]
        search_paths: Vec<PathBuf>,
    },

    /// Parse a trace file and print its contents
    Validate {
        /// Path to trace file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            file,
            output,
            summary,
            top_modules,
            config,
            search_paths,
        } => {
            let args = AnalyzeArgs {
                trace_file: file,
                output_json: output,
                print_summary: summary,
                config,
                search_paths,
                top_modules,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Compare {
            baseline,
            target,
            output,
            summary,
            fail_on_regression,
            config,
            search_paths,
        } => {
            execute_compare(CompareArgs {
                baseline,
                target,
                output,
                summary,
                fail_on_regression,
                config,
                search_paths,
            })?;
        }

        Commands::Validate { file } => {
            validate_trace_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
