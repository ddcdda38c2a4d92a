//! Rule enforcing `snake_case` function and method names.
//!
//! A single leading underscore is ignored. Names starting with a double
//! underscore are reserved for PHP magic methods.

use chroma_lint_core::utils::declaration_name;
use chroma_lint_core::{FileContext, Rule, Severity, TokenKind, TokenStream, Violation};

/// Rule name for the function name sniff.
pub const NAME: &str = "Chroma.NamingConventions.FunctionName";

/// Magic method names without their `__` prefix, lower-cased.
const MAGIC_NAMES: &[&str] = &[
    "construct",
    "destruct",
    "call",
    "callstatic",
    "get",
    "set",
    "isset",
    "unset",
    "sleep",
    "wakeup",
    "serialize",
    "unserialize",
    "tostring",
    "invoke",
    "set_state",
    "clone",
    "debuginfo",
    "autoload",
];

/// Checks that function names are `snake_case`.
#[derive(Debug, Clone)]
pub struct FunctionName {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for FunctionName {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionName {
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
}

impl Rule for FunctionName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires snake_case function names; double underscore only for magic methods"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interested_kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
        let Some(keyword) = tokens.get(position) else {
            return Vec::new();
        };
        let Some(name) = declaration_name(tokens, position).and_then(|i| tokens.get(i)) else {
            return Vec::new();
        };
        let name = name.content.as_str();

        if let Some(magic) = name.strip_prefix("__") {
            if is_magic(magic) {
                return Vec::new();
            }
            return vec![Violation::new(
                "FunctionDoubleUnderscore",
                NAME,
                self.severity,
                ctx.location(keyword),
                format!(
                    "Function name \"{name}\" is invalid; only PHP magic methods should be prefixed with a double underscore"
                ),
            )];
        }

        let bare = name.strip_prefix('_').unwrap_or(name);
        if is_snake_case(bare) {
            return Vec::new();
        }

        vec![Violation::new(
            "NotSnakeCase",
            NAME,
            self.severity,
            ctx.location(keyword),
            format!("Function name \"{name}\" is not in snake case format"),
        )]
    }
}

fn is_magic(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MAGIC_NAMES.contains(&lower.as_str())
}

/// Matches `^[a-z][a-z_]*$`.
fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c == '_')
}
