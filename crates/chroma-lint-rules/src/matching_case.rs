//! Rule requiring a file to be named after the class it declares.

use chroma_lint_core::utils::declaration_name;
use chroma_lint_core::{FileContext, Rule, Severity, TokenKind, TokenStream, Violation};

/// Rule name for the matching case sniff.
pub const NAME: &str = "Chroma.Files.MatchingCase";

/// Checks that `Foo.php` declares `class Foo`, with matching case.
///
/// Only files declaring exactly one class, interface or trait are checked.
#[derive(Debug, Clone)]
pub struct MatchingCase {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MatchingCase {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingCase {
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

impl Rule for MatchingCase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires the file name to match the declared class name"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interested_kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::OpenTag]
    }

    fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
        // only the first open tag of a file
        if tokens.find_previous(&[TokenKind::OpenTag], position).is_some() {
            return Vec::new();
        }
        let (Some(open_tag), Some(file_name)) = (tokens.get(position), ctx.file_name()) else {
            return Vec::new();
        };

        let mut declared = tokens
            .iter()
            .filter(|t| TokenKind::CLASS_LIKE.contains(&t.kind))
            .filter_map(|t| declaration_name(tokens, t.index))
            .filter_map(|i| tokens.get(i));
        let (Some(declared_name), None) = (declared.next(), declared.next()) else {
            return Vec::new();
        };

        let expected = format!(
            "{}.{}",
            declared_name.content,
            ctx.extension().unwrap_or("php")
        );
        if expected == file_name {
            return Vec::new();
        }

        vec![Violation::new(
            "NotFound",
            NAME,
            self.severity,
            ctx.location(open_tag),
            format!("Filename \"{file_name}\" doesn't match the expected filename \"{expected}\""),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_lint_core::{PhpTokenizer, Tokenizer};
    use std::path::Path;

    fn check(file: &str, source: &str) -> Vec<Violation> {
        let rule = MatchingCase::new();
        let tokens = PhpTokenizer.tokenize(source).expect("tokenize");
        let path = Path::new("/p/src").join(file);
        let ctx = FileContext::new(&path, source, Path::new("/p"));
        tokens
            .iter()
            .filter(|t| t.kind == TokenKind::OpenTag)
            .flat_map(|t| rule.evaluate(&ctx, &tokens, t.index))
            .collect()
    }

    #[test]
    fn matching_name_passes() {
        assert!(check("UserRepository.php", "<?php\nclass UserRepository {}\n").is_empty());
    }

    #[test]
    fn case_mismatch_is_reported_once() {
        let source = "<?php\ninterface userRepository {}\n?>\n<?php\n";
        let violations = check("UserRepository.php", source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "NotFound");
        assert_eq!(
            violations[0].message,
            "Filename \"UserRepository.php\" doesn't match the expected filename \"userRepository.php\""
        );
        assert_eq!(violations[0].location.line, 1);
        assert_eq!(violations[0].location.column, 1);
    }

    #[test]
    fn expected_name_keeps_extension() {
        let violations = check("helpers.inc", "<?php\ntrait Helpers {}\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with("\"Helpers.inc\""));
    }

    #[test]
    fn files_without_exactly_one_declaration_are_skipped() {
        assert!(check("functions.php", "<?php\nfunction a() {}\n").is_empty());
        assert!(check("Two.php", "<?php\nclass One {}\nclass Other {}\n").is_empty());
        assert!(check("anon.php", "<?php\n$a = new class {};\n$b = Foo::class;\n").is_empty());
    }
}
