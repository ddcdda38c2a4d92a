//! Rule placing the opening brace of a function body on its own line.
//!
//! The brace goes on the line after the declaration, at the indentation of
//! the declaration. A declaration whose parameter list spans several lines
//! may keep the brace on the line of the closing parenthesis.
//!
//! ```php
//! public function run($a)
//! {
//! }
//!
//! public function configure(
//!     array $options,
//!     bool $strict
//! ) {
//! }
//! ```

use chroma_lint_core::utils::function_parts;
use chroma_lint_core::{FileContext, Rule, Severity, TokenKind, TokenStream, Violation};

/// Rule name for the opening brace sniff.
pub const NAME: &str = "Chroma.Functions.OpeningFunctionBrace";

/// Checks placement of the `{` opening a function body.
#[derive(Debug, Clone)]
pub struct OpeningFunctionBrace {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for OpeningFunctionBrace {
    fn default() -> Self {
        Self::new()
    }
}

impl OpeningFunctionBrace {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Option<Vec<Violation>> {
        let parts = function_parts(tokens, position)?;
        let brace_index = parts.open_brace?;

        let brace = tokens.get(brace_index)?;
        let opener_line = tokens.get(parts.open_parenthesis)?.line;
        let closer_line = tokens.get(parts.close_parenthesis)?.line;
        let line_difference = brace.line.saturating_sub(closer_line);
        let multiline = opener_line != closer_line;

        let location = ctx.location(brace);
        let mut violations = Vec::new();

        if line_difference == 0 && !multiline {
            violations.push(
                Violation::new(
                    "BraceOnSameLine",
                    NAME,
                    self.severity,
                    location.clone(),
                    "Opening brace should be on a new line",
                )
                .fixable(),
            );
        } else if line_difference > 1 {
            violations.push(
                Violation::new(
                    "BraceSpacing",
                    NAME,
                    self.severity,
                    location.clone(),
                    format!(
                        "Opening brace should be on the line after the declaration; found {} blank line(s)",
                        line_difference - 1
                    ),
                )
                .fixable(),
            );
        }

        if let Some(next) = tokens.next_significant(brace_index + 1) {
            let same_line = tokens.get(next).is_some_and(|t| t.line == brace.line);
            let empty_body = tokens.matching_close(brace_index) == Some(next);
            if same_line && !empty_body {
                violations.push(
                    Violation::new(
                        "ContentAfterBrace",
                        NAME,
                        self.severity,
                        location.clone(),
                        "Opening brace must be the last content on the line",
                    )
                    .fixable(),
                );
            }
        }

        if line_difference != 1 {
            return Some(violations);
        }

        let line_start = tokens.get(tokens.first_on_line(position)?)?;
        if brace.column != line_start.column {
            violations.push(
                Violation::new(
                    "BraceIndent",
                    NAME,
                    self.severity,
                    location,
                    format!(
                        "Opening brace indented incorrectly; expected {} spaces, found {}",
                        line_start.column - 1,
                        brace.column - 1
                    ),
                )
                .fixable(),
            );
        }

        Some(violations)
    }
}

impl Rule for OpeningFunctionBrace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires the function opening brace on the line after the declaration"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interested_kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
        self.check(ctx, tokens, position).unwrap_or_default()
    }
}
