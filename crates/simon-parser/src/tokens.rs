//! Token definitions.

use std::fmt;

use crate::span::Span;

/// A lexical token of Simon source.
///
/// Whitespace and comments are consumed by the lexer and never appear in the
/// token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Language,
    Import,
    True,
    False,

    Identifier(&'src str),
    IntegerLiteral(i64),
    DecimalLiteral(f64),
    StringLiteral(String),

    // Punctuation
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    /// `#(`, the opening of a record literal.
    RecordOpen,
    Equals,
    Colon,
    Dot,
    Comma,
    Semicolon,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Language => write!(f, "language"),
            Token::Import => write!(f, "import"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Identifier(name) => write!(f, "{name}"),
            Token::IntegerLiteral(value) => write!(f, "{value}"),
            Token::DecimalLiteral(value) => write!(f, "{value}"),
            Token::StringLiteral(text) => write!(f, "{text:?}"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::RecordOpen => write!(f, "#("),
            Token::Equals => write!(f, "="),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}
