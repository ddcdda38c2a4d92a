//! Lint command implementation.

use anyhow::{Context, Result};
use chroma_lint_core::{FileScanner, LintEngine};
use std::io::Write;
use std::path::Path;

use crate::settings::Settings;
use crate::OutputFormat;

/// Runs the lint command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    config_flag: Option<&Path>,
) -> Result<()> {
    // the only whole-run failure: the project itself cannot be listed
    std::fs::read_dir(path)
        .with_context(|| format!("Cannot read project directory {}", path.display()))?;

    let settings = Settings::load(path, config_flag)?;
    tracing::info!("Using configuration: {}", settings.origin);

    let rules = settings.rules(rules_filter);

    let mut scan = settings.config.scan.clone();
    scan.exclude.extend(exclude);
    let scanner = FileScanner::from_config(&scan).context("Invalid scan patterns")?;

    let engine = LintEngine::builder()
        .root(path)
        .rules(rules)
        .config(settings.config.clone())
        .build()
        .context("Failed to build lint engine")?;

    let roots = settings.roots(engine.root());
    if roots.is_empty() {
        tracing::info!("No enforceable directories under {}", engine.root().display());
    }

    let files = scanner.scan(&roots);
    let report = if format == OutputFormat::Text {
        println!("Configuration: {}", settings.origin);
        let mut stdout = std::io::stdout();
        let report = engine.run_with_progress(files, |outcome| {
            let _ = write!(stdout, "{}", outcome.marker());
            let _ = stdout.flush();
        });
        print!("\n\n");
        report
    } else {
        engine.run(files)
    };

    let exit_code = super::output::print(&report, format, engine.root())?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
