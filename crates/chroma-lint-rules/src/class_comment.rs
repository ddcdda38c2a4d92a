//! Rule requiring a doc comment with author and package tags on classes,
//! interfaces and traits.
//!
//! # Detected Patterns
//!
//! - Missing or `//`-style comments, and blank lines between comment and declaration
//! - A first line that does not read `Class Name`, `Interface Name` or `Trait Name`
//! - Missing `@author` or `@package` tags, repeated single-use tags
//! - A `@package` that differs from the file's namespace
//!
//! # Good Patterns
//!
//! ```php
//! namespace App\Models;
//!
//! /**
//!  * Class User
//!  *
//!  * @author Jane Doe <jane@example.com>
//!  * @package App\Models
//!  */
//! class User
//! {
//! }
//! ```

use crate::function_comment::{closer_location, follows_code};
use chroma_lint_core::utils::{comment_anchor, declaration_name, namespace_of, DocBlock};
use chroma_lint_core::{
    FileContext, Location, Rule, Severity, Token, TokenKind, TokenStream, Violation,
};

/// Rule name for the class comment sniff.
pub const NAME: &str = "Chroma.Commenting.ClassComment";

/// Tags every class comment must carry.
const REQUIRED_TAGS: &[&str] = &["@author", "@package"];

/// Tags that may appear at most once.
const SINGLE_USE_TAGS: &[&str] = &[
    "@category",
    "@license",
    "@version",
    "@since",
    "@deprecated",
    "@package",
    "@subpackage",
];

/// Modifiers that may sit between a class comment and its keyword.
const CLASS_PREFIXES: &[TokenKind] = &[TokenKind::Abstract, TokenKind::Final, TokenKind::Readonly];

/// Checks doc comments on named classes, interfaces and traits.
#[derive(Debug, Clone)]
pub struct ClassComment {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ClassComment {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassComment {
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

    fn violation(&self, code: &str, location: Location, message: impl Into<String>) -> Violation {
        Violation::new(code, NAME, self.severity, location, message)
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Option<Vec<Violation>> {
        let keyword = tokens.get(position)?;
        let name = tokens.get(declaration_name(tokens, position)?)?;
        let kind = keyword_label(keyword.kind)?;

        let comment = comment_anchor(tokens, position, CLASS_PREFIXES)
            .and_then(|i| tokens.get(i))
            .filter(|t| {
                t.kind == TokenKind::DocComment
                    || (t.kind == TokenKind::Comment && !follows_code(tokens, t))
            });
        let Some(comment) = comment else {
            return Some(vec![self.violation(
                "Missing",
                ctx.location(keyword),
                format!("Missing doc comment for {} {}", kind.to_ascii_lowercase(), name.content),
            )]);
        };
        if comment.kind != TokenKind::DocComment {
            return Some(vec![self.violation(
                "WrongStyle",
                ctx.location(keyword),
                format!(
                    "You must use \"/**\" style comments for a {} comment",
                    kind.to_ascii_lowercase()
                ),
            )]);
        }

        let mut violations = Vec::new();

        let declaration = tokens
            .next_significant(comment.index + 1)
            .and_then(|i| tokens.get(i))?;
        if comment.end_line() + 1 != declaration.line {
            violations.push(self.violation(
                "SpacingAfter",
                closer_location(ctx, comment),
                format!(
                    "There must be no blank lines after the {} comment",
                    kind.to_ascii_lowercase()
                ),
            ));
        }

        let block = DocBlock::parse(comment)?;
        self.check_first_line(ctx, comment, &block, kind, &mut violations);
        self.check_tags(ctx, comment, &block, kind, &mut violations);
        self.check_package(ctx, tokens, &block, &mut violations);

        Some(violations)
    }

    fn check_first_line(
        &self,
        ctx: &FileContext,
        comment: &Token,
        block: &DocBlock,
        kind: &str,
        out: &mut Vec<Violation>,
    ) {
        let location = match &block.summary {
            Some(summary) if names_kind(&summary.text, kind) => return,
            Some(summary) => ctx.location_at(
                summary.line,
                summary.column,
                summary.offset,
                summary.text.len(),
            ),
            None => ctx.location(comment),
        };
        out.push(self.violation(
            "FirstLine",
            location,
            format!("First line should have form: \"{kind} ClassName\""),
        ));
    }

    fn check_tags(
        &self,
        ctx: &FileContext,
        comment: &Token,
        block: &DocBlock,
        kind: &str,
        out: &mut Vec<Violation>,
    ) {
        let kind = kind.to_ascii_lowercase();

        for (i, tag) in block.tags.iter().enumerate() {
            let single_use = SINGLE_USE_TAGS.contains(&tag.name.as_str());
            if single_use && block.tags[..i].iter().any(|t| t.name == tag.name) {
                out.push(self.violation(
                    "DuplicateTag",
                    ctx.location_at(tag.line, tag.column, tag.offset, tag.name.len()),
                    format!("Only one {} tag is allowed in a {kind} comment", tag.name),
                ));
            }
        }

        for required in REQUIRED_TAGS {
            if block.tags_named(required).next().is_none() {
                out.push(self.violation(
                    "MissingTag",
                    closer_location(ctx, comment),
                    format!("Missing {required} tag in {kind} comment"),
                ));
            }
        }
    }

    fn check_package(
        &self,
        ctx: &FileContext,
        tokens: &TokenStream,
        block: &DocBlock,
        out: &mut Vec<Violation>,
    ) {
        let namespace = namespace_of(tokens).unwrap_or_default();
        for tag in block.tags_named("@package") {
            let Some(package) = &tag.content else {
                continue;
            };
            if *package != namespace {
                out.push(self.violation(
                    "InvalidPackage",
                    ctx.location_at(tag.line, tag.column, tag.offset, tag.name.len()),
                    format!("Package name \"{package}\" should be \"{namespace}\""),
                ));
            }
        }
    }
}

impl Rule for ClassComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires class doc comments with @author and a @package matching the namespace"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interested_kinds(&self) -> &'static [TokenKind] {
        TokenKind::CLASS_LIKE
    }

    fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
        self.check(ctx, tokens, position).unwrap_or_default()
    }
}

/// Whether `text` opens with the whole word `kind`.
fn names_kind(text: &str, kind: &str) -> bool {
    text.strip_prefix(kind)
        .is_some_and(|rest| rest.chars().next().map_or(true, char::is_whitespace))
}

fn keyword_label(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Class => Some("Class"),
        TokenKind::Interface => Some("Interface"),
        TokenKind::Trait => Some("Trait"),
        _ => None,
    }
}
