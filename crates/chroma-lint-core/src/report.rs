//! Rendering of a finished scan into text and an exit code.

use crate::types::{FileResult, ScanReport, Severity, Violation};

use std::fmt::Write;

/// Line printed when a scan finds no errors and no warnings.
pub const SUCCESS_BANNER: &str = "GREAT JOB! IT'S BEAUTIFUL";

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const BOLD: &str = "\x1b[1m";
const SUCCESS: &str = "\x1b[37;42m";

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Report text. The caller decides where to write it.
    pub text: String,
    /// `0` with no errors and no warnings, `1` otherwise.
    pub exit_code: i32,
}

/// Turns a [`ScanReport`] into the grouped text report.
///
/// The output only depends on the report, so repeated scans of an unchanged
/// tree render byte-identical text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    color: bool,
}

impl ReportRenderer {
    /// Creates a renderer producing plain text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer that styles headers, paths and rule ids with ANSI escapes.
    #[must_use]
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Enables or disables ANSI styling.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Renders `report`.
    #[must_use]
    pub fn render(&self, report: &ScanReport) -> Rendered {
        let mut text = String::new();

        let with_errors: Vec<&FileResult> = report
            .files()
            .iter()
            .filter(|f| f.error_count() > 0)
            .collect();
        let with_warnings: Vec<&FileResult> = report
            .files()
            .iter()
            .filter(|f| f.warning_count() > 0)
            .collect();

        if !with_errors.is_empty() {
            let _ = writeln!(text, "{}", self.paint("Errors:", RED));
            self.render_files(&mut text, &with_errors, Severity::Error);
        }

        if !with_warnings.is_empty() {
            let _ = writeln!(text, "{}", self.paint("Warning:", YELLOW));
            self.render_files(&mut text, &with_warnings, Severity::Warning);
        }

        if !report.failed().is_empty() {
            let _ = writeln!(text, "{}", self.paint("Could not analyze:", RED));
            for failed in report.failed() {
                let _ = writeln!(
                    text,
                    "{}",
                    self.paint(&failed.path.display().to_string(), BOLD)
                );
                let _ = writeln!(text, "    {}", failed.reason);
                let _ = writeln!(text);
            }
        }

        let exit_code = if report.is_clean() {
            let _ = writeln!(text, "{}", self.paint(SUCCESS_BANNER, SUCCESS));
            0
        } else {
            1
        };

        Rendered { text, exit_code }
    }

    fn render_files(&self, text: &mut String, files: &[&FileResult], severity: Severity) {
        for file in files {
            let _ = writeln!(text, "{}", self.paint(&file.path.display().to_string(), BOLD));

            let mut messages: Vec<&Violation> = file
                .violations
                .iter()
                .filter(|v| v.severity == severity)
                .collect();
            // stable: same-position violations keep production order
            messages.sort_by_key(|v| (v.location.line, v.location.column));

            for v in messages {
                let _ = writeln!(
                    text,
                    ">>  {}:{}  {}",
                    v.location.line,
                    v.location.column,
                    self.paint(&v.rule_id(), BLUE)
                );
                let _ = writeln!(text, "    {}", v.message);
            }

            let _ = writeln!(text);
        }
    }

    fn paint(&self, s: &str, style: &str) -> String {
        if self.color {
            format!("{style}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}
