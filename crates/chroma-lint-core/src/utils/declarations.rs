//! Helpers for locating the pieces of function and class declarations.

use super::is_identifier;
use crate::token::{TokenKind, TokenStream};

/// Token positions of a named function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionParts {
    /// The `function` keyword.
    pub keyword: usize,
    /// The function name.
    pub name: usize,
    /// `(` opening the parameter list.
    pub open_parenthesis: usize,
    /// `)` closing the parameter list.
    pub close_parenthesis: usize,
    /// `{` opening the body, `None` for abstract and interface methods.
    pub open_brace: Option<usize>,
}

/// Finds the name token of the declaration introduced by the keyword at `keyword`.
///
/// Returns `None` for anonymous declarations: closures, `new class`, and the
/// `function` qualifier of a `use function` import.
#[must_use]
pub fn declaration_name(tokens: &TokenStream, keyword: usize) -> Option<usize> {
    let kind = tokens.kind(keyword)?;
    let previous = tokens
        .prev_significant(keyword)
        .and_then(|p| tokens.get(p));

    match kind {
        TokenKind::Function => {
            if previous.is_some_and(|p| p.kind == TokenKind::Use) {
                return None;
            }
        }
        TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Enum => {
            if previous.is_some_and(|p| p.content.eq_ignore_ascii_case("new")) {
                return None;
            }
        }
        _ => return None,
    }

    let mut name = tokens.next_significant(keyword + 1)?;
    if kind == TokenKind::Function && tokens.kind(name) == Some(TokenKind::Ampersand) {
        name = tokens.next_significant(name + 1)?;
    }

    tokens.get(name).filter(|t| is_identifier(t)).map(|t| t.index)
}

/// Locates name, parameter list and body brace of the function at `keyword`.
#[must_use]
pub fn function_parts(tokens: &TokenStream, keyword: usize) -> Option<FunctionParts> {
    let name = declaration_name(tokens, keyword)?;
    let open_parenthesis = tokens.next_significant(name + 1)?;
    if tokens.kind(open_parenthesis)? != TokenKind::OpenParenthesis {
        return None;
    }
    let close_parenthesis = tokens.matching_close(open_parenthesis)?;

    let terminator = tokens.find_next(
        &[TokenKind::OpenCurlyBracket, TokenKind::Semicolon],
        close_parenthesis + 1,
        None,
    );
    let open_brace = terminator.filter(|&t| tokens.kind(t) == Some(TokenKind::OpenCurlyBracket));

    Some(FunctionParts {
        keyword,
        name,
        open_parenthesis,
        close_parenthesis,
        open_brace,
    })
}

/// Finds the token a comment for the declaration at `keyword` would end on.
///
/// Walks backward over whitespace, the given modifier kinds and `#[...]`
/// attribute groups, and returns the first other token.
#[must_use]
pub fn comment_anchor(tokens: &TokenStream, keyword: usize, modifiers: &[TokenKind]) -> Option<usize> {
    let mut skip = vec![TokenKind::Whitespace];
    skip.extend_from_slice(modifiers);

    let mut before = keyword;
    loop {
        let previous = tokens.find_previous_except(&skip, before)?;
        if tokens.kind(previous) == Some(TokenKind::CloseSquareBracket) {
            if let Some(attribute) = attribute_start(tokens, previous) {
                before = attribute;
                continue;
            }
        }
        return Some(previous);
    }
}

/// Index of the `#[` opening the attribute group that ends at `close`.
fn attribute_start(tokens: &TokenStream, close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        match tokens.kind(i)? {
            TokenKind::CloseSquareBracket => depth += 1,
            kind @ (TokenKind::OpenSquareBracket | TokenKind::Attribute) => {
                depth -= 1;
                if depth == 0 {
                    return (kind == TokenKind::Attribute).then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Variable names (with `$`) of the parameters between `open` and `close`.
///
/// Default values, attributes and nested expressions are skipped so only
/// the declared parameter variables are returned, in order.
#[must_use]
pub fn parameter_names(tokens: &TokenStream, open: usize, close: usize) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut in_default = false;

    for token in tokens.iter().take(close).skip(open + 1) {
        match token.kind {
            TokenKind::OpenParenthesis
            | TokenKind::OpenSquareBracket
            | TokenKind::OpenCurlyBracket
            | TokenKind::Attribute => depth += 1,
            TokenKind::CloseParenthesis
            | TokenKind::CloseSquareBracket
            | TokenKind::CloseCurlyBracket => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => in_default = false,
            TokenKind::Equal if depth == 0 => in_default = true,
            TokenKind::Variable if depth == 0 && !in_default => {
                names.push(token.content.clone());
            }
            _ => {}
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{PhpTokenizer, Tokenizer};

    fn stream(source: &str) -> TokenStream {
        PhpTokenizer.tokenize(source).expect("tokenize")
    }

    fn first(tokens: &TokenStream, kind: TokenKind) -> usize {
        tokens
            .iter()
            .position(|t| t.kind == kind)
            .expect("token present")
    }

    #[test]
    fn finds_function_name() {
        let tokens = stream("<?php\nfunction &get_value($a) {}\n");
        let keyword = first(&tokens, TokenKind::Function);
        let name = declaration_name(&tokens, keyword).expect("named");
        assert_eq!(tokens.get(name).map(|t| t.content.as_str()), Some("get_value"));
    }

    #[test]
    fn closures_and_imports_have_no_name() {
        let tokens = stream("<?php\n$f = function ($a) {};\n");
        assert_eq!(declaration_name(&tokens, first(&tokens, TokenKind::Function)), None);

        let tokens = stream("<?php\nuse function foo\\bar;\n");
        assert_eq!(declaration_name(&tokens, first(&tokens, TokenKind::Function)), None);
    }

    #[test]
    fn anonymous_classes_have_no_name() {
        let tokens = stream("<?php\n$a = new class {};\n");
        assert_eq!(declaration_name(&tokens, first(&tokens, TokenKind::Class)), None);
    }

    #[test]
    fn function_parts_of_abstract_method() {
        let tokens = stream("<?php\nabstract function run(array $a): void;\n");
        let parts = function_parts(&tokens, first(&tokens, TokenKind::Function)).expect("parts");
        assert_eq!(parts.open_brace, None);
        assert_eq!(tokens.kind(parts.close_parenthesis), Some(TokenKind::CloseParenthesis));
    }

    #[test]
    fn function_parts_with_return_type() {
        let tokens = stream("<?php\nfunction run(): array\n{\n}\n");
        let parts = function_parts(&tokens, first(&tokens, TokenKind::Function)).expect("parts");
        let brace = parts.open_brace.expect("body");
        assert_eq!(tokens.get(brace).map(|t| t.line), Some(3));
    }

    #[test]
    fn comment_anchor_skips_modifiers_and_attributes() {
        let tokens = stream(
            "<?php\nclass A {\n    /** Doc */\n    #[Route('/a'), Other([1])]\n    public static function a() {}\n}\n",
        );
        let keyword = first(&tokens, TokenKind::Function);
        let anchor = comment_anchor(&tokens, keyword, TokenKind::METHOD_PREFIXES).expect("anchor");
        assert_eq!(tokens.kind(anchor), Some(TokenKind::DocComment));
    }

    #[test]
    fn comment_anchor_stops_at_code() {
        let tokens = stream("<?php\n$a = [1];\nfunction a() {}\n");
        let keyword = first(&tokens, TokenKind::Function);
        let anchor = comment_anchor(&tokens, keyword, TokenKind::METHOD_PREFIXES).expect("anchor");
        assert_eq!(tokens.kind(anchor), Some(TokenKind::Semicolon));
    }

    #[test]
    fn parameter_names_skip_defaults() {
        let tokens = stream(
            "<?php\nfunction f(#[Attr($x)] int $a, array $b = [$c], ?Foo &$d = null, ...$rest) {}\n",
        );
        let parts = function_parts(&tokens, first(&tokens, TokenKind::Function)).expect("parts");
        assert_eq!(
            parameter_names(&tokens, parts.open_parenthesis, parts.close_parenthesis),
            vec!["$a", "$b", "$d", "$rest"]
        );
    }
}
