//! chroma-lint CLI tool.
//!
//! Usage:
//! ```bash
//! chroma-lint lint [OPTIONS] [PATH]
//! chroma-lint validate [PATH]
//! chroma-lint list-rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod settings;

/// Style checker for PHP projects using the Chroma sniffs
#[derive(Parser)]
#[command(name = "chroma-lint")]
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
    /// Lint the project's source directories
    Lint {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Check the project for discouraged directory layouts
    Validate {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List available rules
    ListRules,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Progress markers and the grouped report.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets rendered by miette.
    Rich,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Lint {
            path,
            format,
            rules,
            exclude,
        } => commands::lint::run(
            &path,
            format,
            rules.as_deref(),
            exclude,
            cli.config.as_deref(),
        ),
        Commands::Validate { path } => commands::validate::run(&path),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
    }
}
