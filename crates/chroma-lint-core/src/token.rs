//! Lexical tokens and the per-file token stream rules navigate.

use std::fmt;

/// Kind of a lexical token.
///
/// The set mirrors the token codes PHP coding-standard sniffs listen for.
/// Keywords the rules do not care about are tokenized as [`TokenKind::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// Text outside of `<?php ... ?>`.
    InlineHtml,
    /// `<?php` or `<?=`.
    OpenTag,
    /// `?>`.
    CloseTag,
    /// Spaces, tabs and at most one trailing newline.
    Whitespace,
    /// `//`, `#` or `/* */` comment.
    Comment,
    /// `/** */` documentation block.
    DocComment,
    /// `$name`.
    Variable,
    /// Identifier (function, class, constant or type name).
    String,
    /// `\` between namespace segments.
    NsSeparator,
    /// Integer or floating point literal.
    Number,
    /// Quoted string literal.
    ConstantString,
    /// Heredoc or nowdoc literal.
    Heredoc,
    /// `function` keyword.
    Function,
    /// `fn` keyword (arrow function).
    Fn,
    /// `class` keyword.
    Class,
    /// `interface` keyword.
    Interface,
    /// `trait` keyword.
    Trait,
    /// `enum` keyword.
    Enum,
    /// `namespace` keyword.
    Namespace,
    /// `use` keyword.
    Use,
    /// `as` keyword.
    As,
    /// `abstract` keyword.
    Abstract,
    /// `final` keyword.
    Final,
    /// `public` keyword.
    Public,
    /// `private` keyword.
    Private,
    /// `protected` keyword.
    Protected,
    /// `static` keyword.
    Static,
    /// `readonly` keyword.
    Readonly,
    /// `#[` attribute opener.
    Attribute,
    /// `(`.
    OpenParenthesis,
    /// `)`.
    CloseParenthesis,
    /// `{`.
    OpenCurlyBracket,
    /// `}`.
    CloseCurlyBracket,
    /// `[`.
    OpenSquareBracket,
    /// `]`.
    CloseSquareBracket,
    /// `;`.
    Semicolon,
    /// `,`.
    Comma,
    /// `:`.
    Colon,
    /// `::`.
    DoubleColon,
    /// `->` or `?->`.
    ObjectOperator,
    /// `=>`.
    DoubleArrow,
    /// `...`.
    Ellipsis,
    /// `&`.
    Ampersand,
    /// `=`.
    Equal,
    /// `?`.
    QuestionMark,
    /// Any other operator or punctuation.
    Operator,
}

impl TokenKind {
    /// Method modifiers that may sit between a doc comment and `function`.
    pub const METHOD_PREFIXES: &'static [TokenKind] = &[
        TokenKind::Public,
        TokenKind::Private,
        TokenKind::Protected,
        TokenKind::Static,
        TokenKind::Abstract,
        TokenKind::Final,
    ];

    /// Keywords that open a named class-like declaration.
    pub const CLASS_LIKE: &'static [TokenKind] =
        &[TokenKind::Class, TokenKind::Interface, TokenKind::Trait];

    /// Returns true for comment tokens of either style.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::Comment | Self::DocComment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A single lexical token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Exact source text.
    pub content: String,
    /// Line number (1-indexed) where the token starts.
    pub line: usize,
    /// Column number (1-indexed, in characters) where the token starts.
    pub column: usize,
    /// Position of the token in its stream.
    pub index: usize,
    /// Byte offset of the token in the source.
    pub offset: usize,
}

impl Token {
    /// Line on which the token ends.
    #[must_use]
    pub fn end_line(&self) -> usize {
        let newlines = self.content.matches('\n').count();
        // a trailing newline belongs to the line it terminates
        if self.content.ends_with('\n') {
            self.line + newlines - 1
        } else {
            self.line + newlines
        }
    }

    /// Returns true if the token is whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

/// The ordered tokens of one source file.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Creates a stream, renumbering token indices to match their positions.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        for (index, token) in tokens.iter_mut().enumerate() {
            token.index = index;
        }
        Self { tokens }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the stream has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Iterates over all tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Returns the kind of the token at `index`.
    #[must_use]
    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.get(index).map(|t| t.kind)
    }

    /// First non-whitespace token at or after `from`.
    #[must_use]
    pub fn next_significant(&self, from: usize) -> Option<usize> {
        self.find_next_except(&[TokenKind::Whitespace], from, None)
    }

    /// Last non-whitespace token strictly before `before`.
    #[must_use]
    pub fn prev_significant(&self, before: usize) -> Option<usize> {
        self.find_previous_except(&[TokenKind::Whitespace], before)
    }

    /// First token at or after `from` (and before `until`) whose kind is in `kinds`.
    #[must_use]
    pub fn find_next(&self, kinds: &[TokenKind], from: usize, until: Option<usize>) -> Option<usize> {
        let end = until.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..end).find(|&i| kinds.contains(&self.tokens[i].kind))
    }

    /// First token at or after `from` (and before `until`) whose kind is NOT in `skip`.
    #[must_use]
    pub fn find_next_except(
        &self,
        skip: &[TokenKind],
        from: usize,
        until: Option<usize>,
    ) -> Option<usize> {
        let end = until.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..end).find(|&i| !skip.contains(&self.tokens[i].kind))
    }

    /// Last token strictly before `before` whose kind is in `kinds`.
    #[must_use]
    pub fn find_previous(&self, kinds: &[TokenKind], before: usize) -> Option<usize> {
        let start = before.min(self.tokens.len());
        (0..start)
            .rev()
            .find(|&i| kinds.contains(&self.tokens[i].kind))
    }

    /// Last token strictly before `before` whose kind is NOT in `skip`.
    #[must_use]
    pub fn find_previous_except(&self, skip: &[TokenKind], before: usize) -> Option<usize> {
        let start = before.min(self.tokens.len());
        (0..start)
            .rev()
            .find(|&i| !skip.contains(&self.tokens[i].kind))
    }

    /// Finds the bracket closing the one opened at `open`.
    ///
    /// Works for parentheses, curly brackets and square brackets. Returns
    /// `None` when `open` is not an opening bracket or the stream ends first.
    #[must_use]
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        let (opener, closer) = match self.kind(open)? {
            TokenKind::OpenParenthesis => (TokenKind::OpenParenthesis, TokenKind::CloseParenthesis),
            TokenKind::OpenCurlyBracket => {
                (TokenKind::OpenCurlyBracket, TokenKind::CloseCurlyBracket)
            }
            TokenKind::OpenSquareBracket => {
                (TokenKind::OpenSquareBracket, TokenKind::CloseSquareBracket)
            }
            _ => return None,
        };

        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.kind == opener {
                depth += 1;
            } else if token.kind == closer {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// First non-whitespace token on the line where the token at `index` starts.
    #[must_use]
    pub fn first_on_line(&self, index: usize) -> Option<usize> {
        let line = self.get(index)?.line;
        let mut start = index;
        while start > 0 && self.tokens[start - 1].line == line {
            start -= 1;
        }
        self.find_next_except(&[TokenKind::Whitespace], start, Some(index + 1))
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
