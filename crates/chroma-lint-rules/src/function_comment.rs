//! Rule requiring well-formed doc comments on named functions and methods.
//!
//! # Detected Patterns
//!
//! - Functions without a comment, or with a `//`, `#` or `/* */` comment
//! - A blank line between the doc comment and the declaration
//! - Empty `@see` and `@throws` tags, more than one `@return`
//! - `@param` tags without a type or name, with bad spacing, or whose name
//!   does not match the declared parameter at the same position
//! - Fully qualified or unimported class names in `@param` and `@return` types
//!
//! # Good Patterns
//!
//! ```php
//! use App\Models\User;
//!
//! /**
//!  * Finds a user by id.
//!  *
//!  * @param int $id The identifier
//!  *
//!  * @return User|null
//!  */
//! function find_user($id)
//! {
//! }
//! ```
//!
//! Functions whose name starts with the test prefix (`test` by default) are
//! not checked.

use chroma_lint_core::utils::{comment_anchor, function_parts, parameter_names, DocBlock, DocTag};
use chroma_lint_core::{
    FileContext, Location, Rule, RuleConfig, Severity, Token, TokenKind, TokenStream, Violation,
};
use tracing::debug;

/// Rule name for the function comment sniff.
pub const NAME: &str = "Chroma.Commenting.FunctionComment";

/// Type names accepted in doc comments without an import. Compared ignoring case.
const PRIMITIVES: &[&str] = &[
    "string", "int", "integer", "bool", "boolean", "float", "double", "null", "array", "mixed",
    "static", "self", "callable", "resource", "object", "void", "true", "false", "iterable",
    "never", "$this",
];

/// Requires doc comments on named functions and checks their tags.
#[derive(Debug, Clone)]
pub struct FunctionComment {
    /// Custom severity.
    pub severity: Severity,
    /// Functions whose name starts with this prefix are skipped.
    pub test_prefix: String,
}

impl Default for FunctionComment {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionComment {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            test_prefix: "test".to_string(),
        }
    }

    /// Creates the rule from its configuration table, if any.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        match config {
            Some(config) => {
                let prefix = config.get_str("test_prefix", &rule.test_prefix).to_string();
                rule.test_prefix(prefix)
            }
            None => rule,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the prefix that marks test functions. An empty prefix checks everything.
    #[must_use]
    pub fn test_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.test_prefix = prefix.into();
        self
    }

    fn violation(&self, code: &str, location: Location, message: impl Into<String>) -> Violation {
        Violation::new(code, NAME, self.severity, location, message)
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Option<Vec<Violation>> {
        let keyword = tokens.get(position)?;
        let parts = function_parts(tokens, position)?;
        let name = &tokens.get(parts.name)?.content;

        if !self.test_prefix.is_empty() && name.starts_with(self.test_prefix.as_str()) {
            debug!("{NAME}: skipping test function {name}");
            return Some(Vec::new());
        }

        let Some(comment) = preceding_comment(tokens, position) else {
            return Some(vec![self.violation(
                "Missing",
                ctx.location(keyword),
                "Missing function doc comment",
            )]);
        };
        if comment.kind != TokenKind::DocComment {
            return Some(vec![self.violation(
                "WrongStyle",
                ctx.location(keyword),
                "You must use \"/**\" style comments for a function comment",
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
                "There must be no blank lines after the function comment",
            ));
        }

        let block = DocBlock::parse(comment)?;
        self.check_sees(ctx, &block, &mut violations);
        self.check_return(ctx, tokens, &block, &mut violations);
        self.check_throws(ctx, &block, &mut violations);

        let declared = parameter_names(tokens, parts.open_parenthesis, parts.close_parenthesis);
        self.check_params(ctx, tokens, &block, &declared, &mut violations);

        Some(violations)
    }

    fn check_sees(&self, ctx: &FileContext, block: &DocBlock, out: &mut Vec<Violation>) {
        for tag in block.tags_named("@see").filter(|t| t.content.is_none()) {
            out.push(self.violation(
                "EmptySees",
                tag_location(ctx, tag),
                "Content missing for @see tag in function comment",
            ));
        }
    }

    fn check_return(
        &self,
        ctx: &FileContext,
        tokens: &TokenStream,
        block: &DocBlock,
        out: &mut Vec<Violation>,
    ) {
        let mut seen = false;
        for tag in block.tags_named("@return") {
            if seen {
                out.push(self.violation(
                    "DuplicateReturn",
                    tag_location(ctx, tag),
                    "Only 1 @return tag is allowed in a function comment",
                ));
                return;
            }
            seen = true;

            let Some(content) = &tag.content else {
                continue;
            };
            let types = content.split_whitespace().next().unwrap_or_default();
            for alternative in alternatives(types) {
                if let Some(v) = self.check_type(ctx, tokens, alternative, tag) {
                    out.push(v);
                }
            }
        }
    }

    fn check_throws(&self, ctx: &FileContext, block: &DocBlock, out: &mut Vec<Violation>) {
        for tag in block.tags_named("@throws").filter(|t| t.content.is_none()) {
            out.push(self.violation(
                "InvalidThrows",
                tag_location(ctx, tag),
                "Exception type missing for @throws tag in function comment",
            ));
        }
    }

    fn check_params(
        &self,
        ctx: &FileContext,
        tokens: &TokenStream,
        block: &DocBlock,
        declared: &[String],
        out: &mut Vec<Violation>,
    ) {
        let params: Vec<(&DocTag, ParsedParam<'_>)> = block
            .tags_named("@param")
            .map(|tag| (tag, parse_param(&tag.raw)))
            .collect();

        for (tag, parsed) in &params {
            match parsed {
                ParsedParam::MissingType => out.push(self.violation(
                    "MissingParamType",
                    tag_location(ctx, tag),
                    "Missing parameter type",
                )),
                ParsedParam::MissingName => out.push(self.violation(
                    "MissingParamName",
                    tag_location(ctx, tag),
                    "Missing parameter name",
                )),
                ParsedParam::Complete(_) => {}
            }
        }

        // positions count every @param tag, complete or not
        for (position, (tag, parsed)) in params.iter().enumerate() {
            let ParsedParam::Complete(param) = parsed else {
                continue;
            };
            let location = tag_location(ctx, tag);

            for alternative in alternatives(param.types) {
                if let Some(v) = self.check_type(ctx, tokens, alternative, tag) {
                    out.push(v);
                }
            }

            if param.type_space != 1 {
                out.push(
                    self.violation(
                        "SpacingAfterParamType",
                        location.clone(),
                        format!(
                            "Expected 1 spaces after parameter type; {} found",
                            param.type_space
                        ),
                    )
                    .fixable(),
                );
            }

            match declared.get(position) {
                Some(actual) if actual != param.name() => {
                    let (code, relation) = if actual.eq_ignore_ascii_case(param.name()) {
                        ("ParamNameNoCaseMatch", "case of actual")
                    } else {
                        ("ParamNameNoMatch", "actual")
                    };
                    out.push(self.violation(
                        code,
                        location.clone(),
                        format!(
                            "Doc comment for parameter {} does not match {relation} variable name {actual}",
                            param.var
                        ),
                    ));
                }
                Some(_) => {}
                None if !param.variadic => out.push(self.violation(
                    "ExtraParamComment",
                    location.clone(),
                    "Superfluous parameter comment",
                )),
                None => {}
            }

            if param.has_comment && param.var_space != 1 {
                out.push(
                    self.violation(
                        "SpacingAfterParamName",
                        location,
                        format!(
                            "Expected 1 spaces after parameter name; {} found",
                            param.var_space
                        ),
                    )
                    .fixable(),
                );
            }
        }
    }

    /// Checks one type alternative from a `@param` or `@return` tag.
    fn check_type(
        &self,
        ctx: &FileContext,
        tokens: &TokenStream,
        raw: &str,
        tag: &DocTag,
    ) -> Option<Violation> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if raw.contains(|c: char| matches!(c, '\\' | '/' | '.')) {
            return Some(self.violation(
                "DocblockFullType",
                tag_location(ctx, tag),
                "Docblock types should use the basic class name, not the full path.",
            ));
        }

        let name = base_type(raw);
        if name.is_empty()
            || is_primitive(name)
            || ctx.is_imported(tokens, name)
            || ctx.has_sibling(name)
        {
            return None;
        }

        Some(self.violation(
            "DocblockTypeImport",
            tag_location(ctx, tag),
            format!("The type {name} was not found in the class use statements."),
        ))
    }
}

impl Rule for FunctionComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires well-formed doc comments on named functions"
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

/// Pieces of a complete `@param` tag: `type $var comment`.
#[derive(Debug, PartialEq, Eq)]
struct ParamDoc<'a> {
    types: &'a str,
    type_space: usize,
    var: &'a str,
    var_space: usize,
    has_comment: bool,
    variadic: bool,
}

impl ParamDoc<'_> {
    /// The variable name as declared in code: no `&`, no `,...` marker.
    fn name(&self) -> &str {
        let name = self.var.trim_start_matches('&');
        name.strip_suffix(",...").unwrap_or(name)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ParsedParam<'a> {
    MissingType,
    MissingName,
    Complete(ParamDoc<'a>),
}

fn parse_param(raw: &str) -> ParsedParam<'_> {
    let Some(dollar) = raw.find('$') else {
        return if raw.trim().is_empty() {
            ParsedParam::MissingType
        } else {
            ParsedParam::MissingName
        };
    };
    let var_start = if raw[..dollar].ends_with('&') {
        dollar - 1
    } else {
        dollar
    };

    let mut variadic = false;
    let mut type_part = &raw[..var_start];
    if let Some(head) = type_part.strip_suffix("...") {
        variadic = true;
        type_part = head;
    }

    let mut types = type_part.trim();
    let type_space = type_part.len() - type_part.trim_end().len();
    if let Some(head) = types.strip_suffix("...") {
        variadic = true;
        types = head.trim_end();
    }
    if types.is_empty() {
        return ParsedParam::MissingType;
    }

    let rest = &raw[var_start..];
    let var_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let var = &rest[..var_end];
    let after = &rest[var_end..];
    let comment = after.trim_start();

    ParsedParam::Complete(ParamDoc {
        types,
        type_space,
        var,
        var_space: after.len() - comment.len(),
        has_comment: !comment.is_empty(),
        variadic: variadic || var.ends_with(",..."),
    })
}

/// Splits a union or intersection type into its members.
fn alternatives(types: &str) -> impl Iterator<Item = &str> {
    types.split(|c: char| c == '|' || c == '&')
}

/// Reduces `?Foo`, `Foo[]`, `(Foo)` and `Foo<Bar>` to `Foo`.
fn base_type(raw: &str) -> &str {
    let mut name = raw.trim_start_matches(|c: char| c == '?' || c == '(');
    if let Some(end) = name.find(|c: char| c == '<' || c == '{') {
        name = &name[..end];
    }
    name.trim_end_matches(|c: char| matches!(c, '[' | ']' | ')'))
}

fn is_primitive(name: &str) -> bool {
    PRIMITIVES.iter().any(|p| p.eq_ignore_ascii_case(name))
}

/// The comment directly above the declaration at `keyword`, if any.
///
/// A `//`, `#` or `/* */` comment trailing other code on its line belongs to
/// that code and is not returned.
fn preceding_comment(tokens: &TokenStream, keyword: usize) -> Option<&Token> {
    let anchor = comment_anchor(tokens, keyword, TokenKind::METHOD_PREFIXES)?;
    let token = tokens.get(anchor)?;
    match token.kind {
        TokenKind::DocComment => Some(token),
        TokenKind::Comment if !follows_code(tokens, token) => Some(token),
        _ => None,
    }
}

/// Whether a comment shares its first line with earlier code.
pub(crate) fn follows_code(tokens: &TokenStream, token: &Token) -> bool {
    tokens
        .prev_significant(token.index)
        .and_then(|p| tokens.get(p))
        .is_some_and(|p| p.end_line() == token.line)
}

fn tag_location(ctx: &FileContext, tag: &DocTag) -> Location {
    ctx.location_at(tag.line, tag.column, tag.offset, tag.name.len())
}

/// Location of the `*/` closing a doc comment.
pub(crate) fn closer_location(ctx: &FileContext, comment: &Token) -> Location {
    let content = &comment.content;
    let close = content.len().saturating_sub(2);
    let (line, column) = match content.rfind('\n') {
        Some(newline) => (
            comment.end_line(),
            content.get(newline + 1..close).map_or(0, |s| s.chars().count()) + 1,
        ),
        None => (
            comment.line,
            comment.column + content.get(..close).map_or(0, |s| s.chars().count()),
        ),
    };
    ctx.location_at(line, column, comment.offset + close, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_lint_core::{PhpTokenizer, Tokenizer};
    use std::path::Path;

    fn check_at(rule: &FunctionComment, path: &Path, root: &Path, source: &str) -> Vec<Violation> {
        let tokens = PhpTokenizer.tokenize(source).expect("tokenize");
        let ctx = FileContext::new(path, source, root);
        tokens
            .iter()
            .filter(|t| rule.interested_kinds().contains(&t.kind))
            .flat_map(|t| rule.evaluate(&ctx, &tokens, t.index))
            .collect()
    }

    fn check(source: &str) -> Vec<Violation> {
        check_at(
            &FunctionComment::new(),
            Path::new("/project/src/Foo.php"),
            Path::new("/project"),
            source,
        )
    }

    fn codes(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.code.as_str()).collect()
    }

    #[test]
    fn repeated_evaluation_is_stable() {
        let source = "<?php\nuse App\\User;\n\n/**\n * Finds.\n *\n * @param User $user\n * @param Missing $other\n *\n * @return Order\n */\nfunction find_it($user, $extra, $more)\n{\n}\n";
        let rule = FunctionComment::new();
        let tokens = PhpTokenizer.tokenize(source).expect("tokenize");
        let ctx = FileContext::new(
            Path::new("/project/src/Foo.php"),
            source,
            Path::new("/project"),
        );
        let position = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Function)
            .map(|t| t.index)
            .expect("function keyword");

        let first = rule.evaluate(&ctx, &tokens, position);
        assert!(ctx.is_imported(&tokens, "User"));
        let second = rule.evaluate(&ctx, &tokens, position);

        assert_eq!(first, second);
        assert_eq!(
            codes(&first),
            vec!["DocblockTypeImport", "DocblockTypeImport", "ParamNameNoMatch"]
        );
    }

    #[test]
    fn documented_function_passes() {
        let source = r"<?php
namespace App;

use App\Models\User;

/**
 * Finds a user.
 *
 * @param int $id The identifier
 * @param User|null $fallback
 *
 * @return User
 */
function find_user($id, $fallback = null)
{
}
";
        assert!(check(source).is_empty(), "{:?}", check(source));
    }

    #[test]
    fn missing_comment() {
        let violations = check("<?php\n\nfunction run()\n{\n}\n");
        assert_eq!(codes(&violations), vec!["Missing"]);
        assert_eq!(violations[0].message, "Missing function doc comment");
        assert_eq!(violations[0].location.line, 3);
        assert_eq!(violations[0].location.column, 1);
        assert_eq!(violations[0].rule_id(), "Chroma.Commenting.FunctionComment.Missing");
    }

    #[test]
    fn line_comment_is_wrong_style() {
        let violations = check("<?php\n// Runs.\nfunction run()\n{\n}\n");
        assert_eq!(codes(&violations), vec!["WrongStyle"]);
    }

    #[test]
    fn trailing_comment_belongs_to_previous_code() {
        let violations = check("<?php\n$a = 1; // note\nfunction run()\n{\n}\n");
        assert_eq!(codes(&violations), vec!["Missing"]);
    }

    #[test]
    fn blank_line_after_comment() {
        let violations = check("<?php\n/**\n * Runs.\n */\n\nfunction run()\n{\n}\n");
        assert_eq!(codes(&violations), vec!["SpacingAfter"]);
        assert_eq!(violations[0].location.line, 4);
        assert_eq!(violations[0].location.column, 2);
    }

    #[test]
    fn modifiers_and_attributes_sit_between_comment_and_keyword() {
        let source = r"<?php
class A
{
    /**
     * Does a thing.
     */
    #[Pure]
    public static function act()
    {
    }
}
";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_functions_and_closures_are_skipped() {
        assert!(check("<?php\nfunction testItWorks()\n{\n}\n").is_empty());
        assert!(check("<?php\n$f = function () {};\n").is_empty());
    }

    #[test]
    fn custom_test_prefix() {
        let rule = FunctionComment::new().test_prefix("it");
        let source = "<?php\nfunction itWorks() {}\nfunction testWorks() {}\n";
        let violations = check_at(&rule, Path::new("/p/a.php"), Path::new("/p"), source);
        assert_eq!(codes(&violations), vec!["Missing"]);
        assert_eq!(violations[0].location.line, 3);
    }

    #[test]
    fn tag_checks_run_in_order() {
        let source = r"<?php
/**
 * Runs.
 *
 * @see
 * @return void
 * @return int
 * @throws
 */
function run()
{
}
";
        let violations = check(source);
        assert_eq!(codes(&violations), vec!["EmptySees", "DuplicateReturn", "InvalidThrows"]);
        assert_eq!(violations[1].location.line, 7);
    }

    #[test]
    fn incomplete_param_tags() {
        let source = r"<?php
/**
 * Runs.
 *
 * @param
 * @param string
 */
function run()
{
}
";
        assert_eq!(codes(&check(source)), vec!["MissingParamType", "MissingParamName"]);
    }

    #[test]
    fn param_names_and_spacing() {
        let source = r"<?php
/**
 * Runs.
 *
 * @param int  $a
 * @param int $B
 * @param int $x
 * @param int $d   wide
 * @param int $extra
 * @param mixed $more,...
 */
function run($a, $b, $c, $d)
{
}
";
        let violations = check(source);
        assert_eq!(
            codes(&violations),
            vec![
                "SpacingAfterParamType",
                "ParamNameNoCaseMatch",
                "ParamNameNoMatch",
                "SpacingAfterParamName",
                "ExtraParamComment",
            ]
        );
        assert_eq!(violations[0].message, "Expected 1 spaces after parameter type; 2 found");
        assert!(violations[0].fixable);
        assert_eq!(
            violations[1].message,
            "Doc comment for parameter $B does not match case of actual variable name $b"
        );
        assert_eq!(
            violations[2].message,
            "Doc comment for parameter $x does not match actual variable name $c"
        );
        assert_eq!(violations[3].message, "Expected 1 spaces after parameter name; 3 found");
    }

    #[test]
    fn type_checks() {
        let source = r"<?php
/**
 * Runs.
 *
 * @param \App\User $a
 * @param Missing[] $b
 * @param ?string $c
 * @param array<int, Foo> $d
 *
 * @return $this
 */
function run($a, $b, $c, $d)
{
}
";
        let violations = check(source);
        assert_eq!(codes(&violations), vec!["DocblockFullType", "DocblockTypeImport"]);
        assert_eq!(
            violations[1].message,
            "The type Missing was not found in the class use statements."
        );
    }

    #[test]
    fn sibling_files_count_as_known_types() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Bar.php"), "<?php\n").expect("write");
        let file = dir.path().join("Foo.php");

        let source = "<?php\n/**\n * Builds.\n *\n * @return Bar\n */\nfunction build()\n{\n}\n";
        let violations = check_at(&FunctionComment::new(), &file, dir.path(), source);
        assert!(violations.is_empty());
    }

    #[test]
    fn variadic_params() {
        let source = r"<?php
/**
 * Joins.
 *
 * @param string ...$parts
 * @param string ...$more
 */
function join_all(string ...$parts)
{
}
";
        assert!(check(source).is_empty());
    }

    #[test]
    fn parses_param_parts() {
        assert_eq!(parse_param(""), ParsedParam::MissingType);
        assert_eq!(parse_param("$a"), ParsedParam::MissingType);
        assert_eq!(parse_param("int"), ParsedParam::MissingName);
        assert_eq!(
            parse_param("int|null  &$a  the value"),
            ParsedParam::Complete(ParamDoc {
                types: "int|null",
                type_space: 2,
                var: "&$a",
                var_space: 2,
                has_comment: true,
                variadic: false,
            })
        );
    }

    #[test]
    fn base_type_strips_decoration() {
        assert_eq!(base_type("?Foo"), "Foo");
        assert_eq!(base_type("Foo[][]"), "Foo");
        assert_eq!(base_type("Collection<int, Foo>"), "Collection");
        assert_eq!(base_type("array{a: int}"), "array");
    }

    #[test]
    fn options_from_config() {
        let config = chroma_lint_core::Config::parse(
            "[rules.\"Chroma.Commenting.FunctionComment\"]\ntest_prefix = \"it\"\n",
        )
        .expect("config");
        let rule = FunctionComment::from_config(config.rule_config(NAME));
        assert_eq!(rule.test_prefix, "it");
        assert_eq!(FunctionComment::from_config(None).test_prefix, "test");
    }
}
