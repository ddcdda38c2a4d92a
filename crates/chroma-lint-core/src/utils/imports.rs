//! Import (`use`) statement and namespace resolution.

use super::is_identifier;
use crate::token::{Token, TokenKind, TokenStream};

/// A name imported into the file scope by a `use` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAlias {
    /// Fully qualified path without a leading separator (e.g. `App\Models\User`).
    pub path: String,
    /// Name the import is visible as in the file (e.g. `User`).
    pub alias: String,
}

impl ImportAlias {
    fn new(path: String, alias: Option<String>) -> Self {
        let alias = alias.unwrap_or_else(|| {
            path.rsplit('\\')
                .next()
                .map_or_else(|| path.clone(), str::to_string)
        });
        Self { path, alias }
    }
}

/// Collects the top-level import aliases of a file.
///
/// Trait `use` inside class-like bodies and closure `use (...)` clauses are
/// not imports and are skipped. Group uses (`use A\{B, C as D};`), comma
/// lists and `use function` / `use const` are all supported.
#[must_use]
pub fn collect_imports(tokens: &TokenStream) -> Vec<ImportAlias> {
    let mut imports = Vec::new();
    let mut depth = 0usize;
    let mut class_bodies: Vec<usize> = Vec::new();
    let mut pending_class = false;
    let mut i = 0;

    while i < tokens.len() {
        let Some(token) = tokens.get(i) else {
            break;
        };

        match token.kind {
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Enum => {
                pending_class = true;
            }
            TokenKind::OpenCurlyBracket => {
                depth += 1;
                if pending_class {
                    class_bodies.push(depth);
                    pending_class = false;
                }
            }
            TokenKind::CloseCurlyBracket => {
                if class_bodies.last() == Some(&depth) {
                    class_bodies.pop();
                }
                depth = depth.saturating_sub(1);
            }
            TokenKind::Use if class_bodies.is_empty() => {
                let is_closure_use = tokens
                    .next_significant(i + 1)
                    .and_then(|n| tokens.kind(n))
                    == Some(TokenKind::OpenParenthesis);
                if !is_closure_use {
                    let end = tokens
                        .find_next(&[TokenKind::Semicolon], i + 1, None)
                        .unwrap_or(tokens.len());
                    imports.extend(parse_use_clauses(tokens, i + 1, end));
                    i = end + 1;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    imports
}

/// Returns the name of the file's first declared namespace, if any.
#[must_use]
pub fn namespace_of(tokens: &TokenStream) -> Option<String> {
    let keyword = tokens.iter().find(|t| {
        t.kind == TokenKind::Namespace
            && tokens
                .next_significant(t.index + 1)
                .and_then(|n| tokens.get(n))
                .is_some_and(is_identifier)
    })?;

    let mut name = String::new();
    for token in tokens.iter().skip(keyword.index + 1) {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment => {}
            TokenKind::NsSeparator => name.push('\\'),
            _ if is_identifier(token) => name.push_str(&token.content),
            _ => break,
        }
    }

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Parses the clauses of one `use` statement between `start` and `end` (the `;`).
fn parse_use_clauses(tokens: &TokenStream, start: usize, end: usize) -> Vec<ImportAlias> {
    let significant: Vec<&Token> = (start..end)
        .filter_map(|i| tokens.get(i))
        .filter(|t| !t.is_whitespace() && !t.kind.is_comment())
        .collect();

    let mut cursor = Cursor {
        tokens: &significant,
        pos: 0,
    };
    cursor.skip_import_kind();

    let mut imports = Vec::new();
    loop {
        let path = cursor.path();
        if cursor.eat(TokenKind::OpenCurlyBracket) {
            let prefix = path.trim_end_matches('\\').to_string();
            loop {
                cursor.skip_import_kind();
                let member = cursor.path();
                if member.is_empty() {
                    break;
                }
                let alias = cursor.alias();
                imports.push(ImportAlias::new(format!("{prefix}\\{member}"), alias));
                if !cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            cursor.eat(TokenKind::CloseCurlyBracket);
        } else if !path.is_empty() {
            let alias = cursor.alias();
            imports.push(ImportAlias::new(path, alias));
        }

        if !cursor.eat(TokenKind::Comma) {
            break;
        }
    }

    imports
}

struct Cursor<'a> {
    tokens: &'a [&'a Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skips a `function` or `const` import qualifier.
    fn skip_import_kind(&mut self) {
        let qualifier = self.peek().is_some_and(|t| {
            t.kind == TokenKind::Function || t.content.eq_ignore_ascii_case("const")
        });
        let followed_by_name = self
            .tokens
            .get(self.pos + 1)
            .is_some_and(|t| is_identifier(t) || t.kind == TokenKind::NsSeparator);
        if qualifier && followed_by_name {
            self.pos += 1;
        }
    }

    /// Reads a qualified name, dropping a leading separator.
    fn path(&mut self) -> String {
        let mut path = String::new();
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::NsSeparator {
                if !path.is_empty() {
                    path.push('\\');
                }
            } else if token.kind != TokenKind::As && is_identifier(token) {
                path.push_str(&token.content);
            } else {
                break;
            }
            self.pos += 1;
        }
        path
    }

    fn alias(&mut self) -> Option<String> {
        if !self.eat(TokenKind::As) {
            return None;
        }
        let token = self.peek().filter(|t| is_identifier(t))?;
        let alias = token.content.clone();
        self.pos += 1;
        Some(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{PhpTokenizer, Tokenizer};

    fn aliases(source: &str) -> Vec<(String, String)> {
        let tokens = PhpTokenizer.tokenize(source).expect("tokenize");
        collect_imports(&tokens)
            .into_iter()
            .map(|i| (i.path, i.alias))
            .collect()
    }

    fn pair(path: &str, alias: &str) -> (String, String) {
        (path.to_string(), alias.to_string())
    }

    #[test]
    fn simple_and_aliased_imports() {
        let got = aliases("<?php\nuse App\\Models\\User;\nuse \\Foo\\Bar as Baz;\n");
        assert_eq!(
            got,
            vec![pair("App\\Models\\User", "User"), pair("Foo\\Bar", "Baz")]
        );
    }

    #[test]
    fn comma_lists_and_groups() {
        let got = aliases("<?php\nuse A\\B, C\\D as E;\nuse X\\{Y, Z as W};\n");
        assert_eq!(
            got,
            vec![
                pair("A\\B", "B"),
                pair("C\\D", "E"),
                pair("X\\Y", "Y"),
                pair("X\\Z", "W"),
            ]
        );
    }

    #[test]
    fn function_and_const_imports() {
        let got = aliases("<?php\nuse function App\\helper;\nuse const App\\LIMIT;\n");
        assert_eq!(got, vec![pair("App\\helper", "helper"), pair("App\\LIMIT", "LIMIT")]);
    }

    #[test]
    fn keyword_named_segments() {
        let got = aliases("<?php\nuse Enum\\Status;\n");
        assert_eq!(got, vec![pair("Enum\\Status", "Status")]);
    }

    #[test]
    fn ignores_trait_and_closure_use() {
        let source = "<?php\nuse Foo\\Bar;\nclass A {\n    use SomeTrait;\n    function f() {\n        return function () use ($x) {};\n    }\n}\n";
        assert_eq!(aliases(source), vec![pair("Foo\\Bar", "Bar")]);
    }

    #[test]
    fn imports_after_a_class_are_still_collected() {
        let source = "<?php\nclass A { use T; }\nuse Foo\\Late;\n";
        assert_eq!(aliases(source), vec![pair("Foo\\Late", "Late")]);
    }

    #[test]
    fn namespace_is_read() {
        let tokens = PhpTokenizer
            .tokenize("<?php\n\nnamespace App\\Http\\Controllers;\n")
            .expect("tokenize");
        assert_eq!(namespace_of(&tokens).as_deref(), Some("App\\Http\\Controllers"));
    }

    #[test]
    fn no_namespace() {
        let tokens = PhpTokenizer.tokenize("<?php\nclass A {}\n").expect("tokenize");
        assert_eq!(namespace_of(&tokens), None);
    }
}
