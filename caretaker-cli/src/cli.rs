//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Caretaker -- quality reports for H5P packages.
///
/// Use `caretaker <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "caretaker", version, about, long_about = None)]
pub struct Cli {
    /// Path to the caretaker.toml configuration file (optional; defaults apply when missing).
    #[arg(short, long, default_value = "caretaker.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an unpacked package and print the quality report.
    Check(CheckArgs),

    /// Print the content tree of an unpacked package.
    Tree(TreeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- check ----

/// Analyze an unpacked H5P package directory.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Package directory containing h5p.json (default: current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// JSON file with extra media and accessibility facts.
    #[arg(long)]
    pub facts: Option<PathBuf>,

    /// Exit with code 4 when a message at or above this level is reported
    /// (info, caution, warning, error).
    #[arg(long)]
    pub fail_on: Option<String>,

    /// Override the minimum reported level.
    #[arg(long)]
    pub min_level: Option<String>,

    /// Run only these modules (repeatable).
    #[arg(long = "module", value_name = "MODULE")]
    pub modules: Vec<String>,
}

// ---- tree ----

/// Print the content tree of an unpacked package.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Package directory containing h5p.json (default: current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

// ---- config ----

/// Manage caretaker configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analysis, efficiency).
        #[arg(long)]
        section: Option<String>,
    },
}
