//! Lexer for exposition sample lines using logos.

use crate::span::Span;
use logos::Logos;

/// Token types for a single sample line.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token {
    // Metric or label name; also `NaN` and `Inf` in value position
    #[regex(r"[a-zA-Z_:][a-zA-Z0-9_:]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Label value (double-quoted)
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape_label_value(&s[1..s.len() - 1])
    })]
    String(String),

    // Sample value or timestamp, kept as text until the parser knows which
    #[regex(r"[+-]?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[+-]?\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[+-][a-zA-Z]+", |lex| lex.slice().to_string())]
    Number(String),

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("=")]
    Eq,
    #[token(",")]
    Comma,

    /// Input the lexer could not match, such as an unterminated quote.
    Invalid,
}

impl Token {
    /// Short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{}'", name),
            Token::String(value) => format!("\"{}\"", value),
            Token::Number(text) => format!("'{}'", text),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Comma => "','".to_string(),
            Token::Invalid => "invalid input".to_string(),
        }
    }
}

/// Decode the escapes allowed inside a label value.
///
/// Only `\\`, `\"` and `\n` are escapes; any other backslash is literal.
fn unescape_label_value(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                result.push('\\');
            }
            Some('"') => {
                chars.next();
                result.push('"');
            }
            Some('n') => {
                chars.next();
                result.push('\n');
            }
            _ => result.push('\\'),
        }
    }

    result
}

/// A token with its span in the line.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer that produces spanned tokens.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    peeked: Option<Option<SpannedToken>>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given line.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&SpannedToken> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_inner());
        }
        self.peeked.as_ref().and_then(|o| o.as_ref())
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        if let Some(peeked) = self.peeked.take() {
            peeked
        } else {
            self.next_inner()
        }
    }

    fn next_inner(&mut self) -> Option<SpannedToken> {
        let token = match self.inner.next()? {
            Ok(token) => token,
            Err(()) => Token::Invalid,
        };
        Some(SpannedToken {
            token,
            span: self.inner.span().into(),
        })
    }

    /// Span of the end of the line, for "expected X" errors at end of input.
    pub fn end_span(&self) -> Span {
        let len = self.inner.source().len();
        Span::new(len, len)
    }
}

impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a sample line into a vector of spanned tokens.
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    Lexer::new(source).collect()
}
