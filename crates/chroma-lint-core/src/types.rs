//! Core types for lint violations and scan results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation code within its rule (e.g., "BraceOnSameLine").
    pub code: String,
    /// Name of the rule that reported it (e.g., "Chroma.Functions.OpeningFunctionBrace").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Whether an automatic rewrite could resolve this violation.
    #[serde(default)]
    pub fixable: bool,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            fixable: false,
        }
    }

    /// Marks this violation as automatically fixable.
    #[must_use]
    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    /// Full identifier of the check, `<rule>.<code>`.
    #[must_use]
    pub fn rule_id(&self) -> String {
        format!("{}.{}", self.rule, self.code)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule_id(),
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.rule_id(), v.message),
            help: v
                .fixable
                .then(|| "this violation can be fixed automatically".to_string()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.code.clone(),
        }
    }
}

/// One-character progress marker emitted as each file finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressMarker {
    /// `.` - no issues.
    Clean,
    /// `W` - warnings only.
    Warning,
    /// `E` - at least one error.
    Error,
    /// `F` - the file could not be analyzed.
    Failed,
}

impl ProgressMarker {
    /// The marker character.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Clean => '.',
            Self::Warning => 'W',
            Self::Error => 'E',
            Self::Failed => 'F',
        }
    }
}

impl std::fmt::Display for ProgressMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Violations collected for one analyzed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// File path relative to the project root.
    pub path: PathBuf,
    /// Violations in the order rules produced them.
    pub violations: Vec<Violation>,
}

impl FileResult {
    /// Creates an empty result for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            violations: Vec::new(),
        }
    }

    /// Number of error-severity violations.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning-severity violations.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Progress marker for this file.
    #[must_use]
    pub fn marker(&self) -> ProgressMarker {
        if self.error_count() > 0 {
            ProgressMarker::Error
        } else if self.warning_count() > 0 {
            ProgressMarker::Warning
        } else {
            ProgressMarker::Clean
        }
    }
}

/// A file that could not be read or tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    /// File path relative to the project root.
    pub path: PathBuf,
    /// Why the file could not be analyzed.
    pub reason: String,
}

/// Outcome of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was tokenized and every rule ran.
    Analyzed(FileResult),
    /// The file could not be analyzed.
    Failed(FailedFile),
}

impl FileOutcome {
    /// Progress marker for this outcome.
    #[must_use]
    pub fn marker(&self) -> ProgressMarker {
        match self {
            Self::Analyzed(result) => result.marker(),
            Self::Failed(_) => ProgressMarker::Failed,
        }
    }
}

/// Aggregate result of a scan, in scanner order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    files: Vec<FileResult>,
    failed: Vec<FailedFile>,
    error_count: usize,
    warning_count: usize,
}

impl ScanReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished file and updates the running counts.
    pub fn push(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Analyzed(result) => {
                self.error_count += result.error_count();
                self.warning_count += result.warning_count();
                self.files.push(result);
            }
            FileOutcome::Failed(failed) => self.failed.push(failed),
        }
    }

    /// Analyzed files, in scanner order.
    #[must_use]
    pub fn files(&self) -> &[FileResult] {
        &self.files
    }

    /// Files that could not be analyzed, in scanner order.
    #[must_use]
    pub fn failed(&self) -> &[FailedFile] {
        &self.failed
    }

    /// Total error-severity violations.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Total warning-severity violations.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Number of files visited, analyzed or not.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.files.len() + self.failed.len()
    }

    /// Returns true when there are no errors and no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Iterates over every violation in file order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.files.iter().flat_map(|f| f.violations.iter())
    }
}

impl Extend<FileOutcome> for ScanReport {
    fn extend<T: IntoIterator<Item = FileOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.push(outcome);
        }
    }
}
