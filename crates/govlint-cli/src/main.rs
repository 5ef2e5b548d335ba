//! govlint CLI tool.
//!
//! Usage:
//! ```bash
//! govlint check [OPTIONS] [PATH]...
//! govlint list-rules
//! govlint init
//! ```
//!
//! Exit codes: 0 = no violations, 1 = violations found, 2 = usage error.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Governance linter for agent code: catches ungoverned tool calls,
/// unchecked spending, unconsented data access, and unlogged decisions.
#[derive(Parser)]
#[command(name = "govlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run governance lint checks
    Check {
        /// Files or directories to lint (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Engine: "tree" parses sources, "window" scans raw text with
        /// fixed line windows (degraded, for unparsable drafts)
        #[arg(long, default_value = "tree")]
        engine: EngineHint,

        /// Print suggested fix placeholders after the report
        #[arg(long)]
        fixes: bool,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Engine selection.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum EngineHint {
    /// Tree-sitter parsing with real scope resolution.
    #[default]
    Tree,
    /// Text-window heuristics over raw lines.
    Window,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            format,
            rules,
            exclude,
            engine,
            fixes,
        } => commands::check::run(
            &paths,
            format,
            rules,
            exclude,
            engine,
            fixes,
            cli.config.as_deref(),
        ),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
