//! Rule trait for defining sniffs.

use crate::context::FileContext;
use crate::token::{TokenKind, TokenStream};
use crate::types::{Severity, Violation};

/// A token-pattern lint rule ("sniff").
///
/// The engine calls [`Rule::evaluate`] once for every token whose kind is
/// listed in [`Rule::interested_kinds`]. Rules may look backward and
/// forward in the stream but must not keep state between invocations; the
/// only per-file state lives in the [`FileContext`].
///
/// A rule that cannot proceed (an expected token is missing) returns no
/// violations for that position instead of failing the file.
///
/// # Example
///
/// ```ignore
/// use chroma_lint_core::{FileContext, Rule, TokenKind, TokenStream, Violation};
///
/// pub struct NoInlineHtml;
///
/// impl Rule for NoInlineHtml {
///     fn name(&self) -> &'static str { "Example.Files.NoInlineHtml" }
///     fn interested_kinds(&self) -> &'static [TokenKind] { &[TokenKind::InlineHtml] }
///
///     fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
///         let Some(token) = tokens.get(position) else { return Vec::new() };
///         vec![Violation::new(
///             "Found",
///             self.name(),
///             self.default_severity(),
///             ctx.location(token),
///             "Inline HTML is not allowed",
///         )]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the dotted name of this rule (e.g., "Chroma.Files.MatchingCase").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Token kinds that trigger an evaluation.
    fn interested_kinds(&self) -> &'static [TokenKind];

    /// Evaluates the rule at `position`, a token of an interested kind.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `tokens` - The full token stream of the file
    /// * `position` - Index of the triggering token
    ///
    /// # Returns
    ///
    /// The violations found at this position, possibly none.
    fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize)
        -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
