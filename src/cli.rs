use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "speclens",
    author = "Jarad DeLorenzo <jarad@33god.ai>",
    version,
    about = "speclens UI-Test Quality Analyzer - Component of 33GOD Agentic Software Pipeline",
    long_about = "Walks a source tree for UI test specs, extracts selectors, assertions, dependencies and timeouts from their text, and aggregates everything into a coverage matrix for downstream dashboards.",
    disable_version_flag = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Emit machine-readable JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the test tree and rebuild metadata and the coverage matrix
    #[command(alias = "scan")]
    Analyze {
        /// Root directory to scan (overrides the configured candidates)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Results directory (overrides the configured location)
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Show the last persisted analysis results without re-scanning
    #[command(alias = "last")]
    Results {
        /// Results directory (overrides the configured location)
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Show aggregate quality metrics for the last analysis run
    Stats {
        /// Results directory (overrides the configured location)
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Generate shell completions for speclens
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
