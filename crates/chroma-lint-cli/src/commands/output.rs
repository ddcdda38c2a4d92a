//! Shared output formatting for scan reports.

use anyhow::Result;
use chroma_lint_core::{ReportRenderer, ScanReport, ViolationDiagnostic};
use miette::NamedSource;
use std::io::IsTerminal;
use std::path::Path;

use crate::OutputFormat;

/// Prints `report` in the requested format and returns the exit code.
pub fn print(report: &ScanReport, format: OutputFormat, root: &Path) -> Result<i32> {
    match format {
        OutputFormat::Text => return Ok(print_text(report)),
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Rich => print_rich(report, root),
    }
    Ok(if report.is_clean() { 0 } else { 1 })
}

fn print_text(report: &ScanReport) -> i32 {
    let renderer = ReportRenderer::new().with_color(std::io::stdout().is_terminal());
    let rendered = renderer.render(report);
    print!("{}", rendered.text);
    rendered.exit_code
}

fn print_json(report: &ScanReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &ScanReport) {
    for violation in report.violations() {
        println!("{violation}");
    }
    for failed in report.failed() {
        println!("{}: could not analyze: {}", failed.path.display(), failed.reason);
    }
}

fn print_rich(report: &ScanReport, root: &Path) {
    for file in report.files() {
        if file.violations.is_empty() {
            continue;
        }
        let name = file.path.display().to_string();
        let source = std::fs::read_to_string(root.join(&file.path)).unwrap_or_default();

        for violation in &file.violations {
            let diagnostic = miette::Report::new(ViolationDiagnostic::from(violation))
                .with_source_code(NamedSource::new(&name, source.clone()));
            println!("{diagnostic:?}");
        }
    }

    for failed in report.failed() {
        println!("{}: could not analyze: {}", failed.path.display(), failed.reason);
    }

    println!(
        "Found {} error(s), {} warning(s) in {} file(s)",
        report.error_count(),
        report.warning_count(),
        report.files_checked()
    );
}
