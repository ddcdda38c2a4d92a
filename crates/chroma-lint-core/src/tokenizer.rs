//! PHP tokenizer producing the [`TokenStream`] rules run against.
//!
//! This is deliberately a lexer, not a parser: it recognizes comments,
//! strings, variables, identifiers, keywords and punctuation with their
//! positions, which is all the token-pattern rules need.

use crate::token::{Token, TokenKind, TokenStream};
use thiserror::Error;

/// Errors that make a file impossible to tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A string, heredoc or block comment is never closed.
    #[error("unterminated {what} starting on line {line}")]
    Unterminated {
        /// What was left open.
        what: &'static str,
        /// Line where it started.
        line: usize,
    },
}

/// Turns source text into a token stream.
pub trait Tokenizer: Send + Sync {
    /// Tokenizes one file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError`] when the source cannot be tokenized.
    fn tokenize(&self, source: &str) -> Result<TokenStream, TokenizeError>;
}

/// Tokenizer for PHP sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpTokenizer;

impl PhpTokenizer {
    /// Creates a new tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for PhpTokenizer {
    fn tokenize(&self, source: &str) -> Result<TokenStream, TokenizeError> {
        let mut lexer = Lexer::new(source);
        lexer.run()?;
        Ok(TokenStream::new(lexer.tokens))
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    in_php: bool,
    tokens: Vec<Token>,
}

/// Start position of the token being lexed.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn push(&mut self, kind: TokenKind, mark: Mark) {
        self.tokens.push(Token {
            kind,
            content: self.src[mark.pos..self.pos].to_string(),
            line: mark.line,
            column: mark.column,
            index: self.tokens.len(),
            offset: mark.pos,
        });
    }

    fn last_significant_kind(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .find(|t| !t.kind.is_comment() && t.kind != TokenKind::Whitespace)
            .map(|t| t.kind)
    }

    fn run(&mut self) -> Result<(), TokenizeError> {
        while self.pos < self.src.len() {
            if self.in_php {
                self.lex_php()?;
            } else {
                self.lex_inline_html();
            }
        }
        Ok(())
    }

    fn lex_inline_html(&mut self) {
        let rest = self.rest();
        let lower = rest.to_ascii_lowercase();
        let open = [lower.find("<?php"), lower.find("<?=")]
            .into_iter()
            .flatten()
            .min();

        let html_len = open.unwrap_or(rest.len());
        if html_len > 0 {
            let mark = self.mark();
            let target = self.pos + html_len;
            while self.pos < target {
                self.bump();
            }
            self.push(TokenKind::InlineHtml, mark);
        }

        if open.is_some() {
            let mark = self.mark();
            let len = if self.starts_with("<?=") { 3 } else { 5 };
            self.bump_n(len);
            self.push(TokenKind::OpenTag, mark);
            self.in_php = true;
        }
    }

    fn lex_php(&mut self) -> Result<(), TokenizeError> {
        let Some(c) = self.peek() else {
            return Ok(());
        };
        let mark = self.mark();

        if c.is_whitespace() {
            while let Some(c) = self.peek() {
                if !c.is_whitespace() {
                    break;
                }
                self.bump();
                if c == '\n' {
                    break;
                }
            }
            self.push(TokenKind::Whitespace, mark);
            return Ok(());
        }

        if self.starts_with("?>") {
            self.bump_n(2);
            self.push(TokenKind::CloseTag, mark);
            self.in_php = false;
            return Ok(());
        }

        if self.starts_with("#[") {
            self.bump_n(2);
            self.push(TokenKind::Attribute, mark);
            return Ok(());
        }

        if self.starts_with("//") || c == '#' {
            while let Some(c) = self.peek() {
                if c == '\n' || self.starts_with("?>") {
                    break;
                }
                self.bump();
            }
            self.push(TokenKind::Comment, mark);
            return Ok(());
        }

        if self.starts_with("/*") {
            let is_doc =
                self.starts_with("/**") && self.peek_nth(3).is_some_and(char::is_whitespace);
            self.bump_n(2);
            self.consume_until("*/", "comment", mark.line)?;
            let kind = if is_doc {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            };
            self.push(kind, mark);
            return Ok(());
        }

        if self.starts_with("<<<") {
            return self.lex_heredoc(mark);
        }

        if c == '$' && self.peek_nth(1).is_some_and(is_ident_start) {
            self.bump();
            self.consume_ident();
            self.push(TokenKind::Variable, mark);
            return Ok(());
        }

        if is_ident_start(c) {
            self.consume_ident();
            let word = &self.src[mark.pos..self.pos];
            let after_member_access = matches!(
                self.last_significant_kind(),
                Some(TokenKind::DoubleColon | TokenKind::ObjectOperator | TokenKind::NsSeparator)
            );
            let kind = if after_member_access {
                TokenKind::String
            } else {
                keyword_kind(word)
            };
            self.push(kind, mark);
            return Ok(());
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()))
        {
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                    self.bump();
                } else {
                    break;
                }
            }
            self.push(TokenKind::Number, mark);
            return Ok(());
        }

        if matches!(c, '\'' | '"' | '`') {
            self.bump();
            self.consume_quoted(c, mark.line)?;
            self.push(TokenKind::ConstantString, mark);
            return Ok(());
        }

        let (kind, len) = self.punctuation(c);
        self.bump_n(len);
        self.push(kind, mark);
        Ok(())
    }

    fn punctuation(&self, c: char) -> (TokenKind, usize) {
        const MULTI: &[(&str, TokenKind)] = &[
            ("?->", TokenKind::ObjectOperator),
            ("...", TokenKind::Ellipsis),
            ("->", TokenKind::ObjectOperator),
            ("::", TokenKind::DoubleColon),
            ("=>", TokenKind::DoubleArrow),
            ("===", TokenKind::Operator),
            ("!==", TokenKind::Operator),
            ("==", TokenKind::Operator),
            ("!=", TokenKind::Operator),
            ("&&", TokenKind::Operator),
            ("&=", TokenKind::Operator),
            ("??=", TokenKind::Operator),
            ("??", TokenKind::Operator),
        ];

        for (text, kind) in MULTI {
            if self.starts_with(text) {
                return (*kind, text.chars().count());
            }
        }

        let kind = match c {
            '(' => TokenKind::OpenParenthesis,
            ')' => TokenKind::CloseParenthesis,
            '{' => TokenKind::OpenCurlyBracket,
            '}' => TokenKind::CloseCurlyBracket,
            '[' => TokenKind::OpenSquareBracket,
            ']' => TokenKind::CloseSquareBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '\\' => TokenKind::NsSeparator,
            '&' => TokenKind::Ampersand,
            '=' => TokenKind::Equal,
            '?' => TokenKind::QuestionMark,
            _ => TokenKind::Operator,
        };
        (kind, 1)
    }

    fn consume_ident(&mut self) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn consume_until(
        &mut self,
        terminator: &str,
        what: &'static str,
        line: usize,
    ) -> Result<(), TokenizeError> {
        loop {
            if self.starts_with(terminator) {
                self.bump_n(terminator.chars().count());
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(TokenizeError::Unterminated { what, line });
            }
        }
    }

    fn consume_quoted(&mut self, quote: char, line: usize) -> Result<(), TokenizeError> {
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return Ok(());
            }
        }
        Err(TokenizeError::Unterminated {
            what: "string",
            line,
        })
    }

    fn lex_heredoc(&mut self, mark: Mark) -> Result<(), TokenizeError> {
        self.bump_n(3);
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
        let quoted = matches!(self.peek(), Some('\'' | '"'));
        if quoted {
            self.bump();
        }
        let label_start = self.pos;
        self.consume_ident();
        let label = self.src[label_start..self.pos].to_string();
        if quoted {
            self.bump();
        }

        let unterminated = TokenizeError::Unterminated {
            what: "heredoc",
            line: mark.line,
        };
        if label.is_empty() {
            return Err(unterminated);
        }

        loop {
            // advance to the start of the next line
            loop {
                match self.bump() {
                    Some('\n') => break,
                    Some(_) => {}
                    None => return Err(unterminated),
                }
            }
            while matches!(self.peek(), Some(' ' | '\t')) {
                self.bump();
            }
            if self.starts_with(&label)
                && !self
                    .rest()
                    .chars()
                    .nth(label.chars().count())
                    .is_some_and(is_ident_continue)
            {
                self.bump_n(label.chars().count());
                self.push(TokenKind::Heredoc, mark);
                return Ok(());
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

fn keyword_kind(word: &str) -> TokenKind {
    match word.to_ascii_lowercase().as_str() {
        "function" => TokenKind::Function,
        "fn" => TokenKind::Fn,
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "trait" => TokenKind::Trait,
        "enum" => TokenKind::Enum,
        "namespace" => TokenKind::Namespace,
        "use" => TokenKind::Use,
        "as" => TokenKind::As,
        "abstract" => TokenKind::Abstract,
        "final" => TokenKind::Final,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "static" => TokenKind::Static,
        "readonly" => TokenKind::Readonly,
        _ => TokenKind::String,
    }
}
