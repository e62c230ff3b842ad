//! Lexical analyzer for Simon source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! Whitespace and `//` comments are skipped. The public entry point is
//! [`tokenize`], which recovers from bad input and reports every lexical
//! problem in a single pass.

use winnow::{
    Parser as _,
    ascii::{digit1, multispace1},
    combinator::{alt, cut_err, delimited, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Category, Diagnostic, DiagnosticCollector, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`; the error span covers from
/// `start` to the position where lexing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    message: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Build a committed error carrying `diagnostic`.
fn cut_with(input: &Input<'_>, diagnostic: LexerDiagnostic) -> ErrMode<ContextError<LexerDiagnostic>> {
    ErrMode::Cut(ContextError::new().add_context(input, &input.checkpoint(), diagnostic))
}

/// Whitespace or a `//` comment.
fn trivia<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    alt((
        multispace1.void(),
        preceded("//", take_while(0.., |c| c != '\n')).void(),
    ))
    .parse_next(input)
}

/// Parse an escape sequence after a backslash: `\n`, `\r`, `\t`, `\0`,
/// `\\`, `\"`, `\'` or `\u{XXXX}`.
fn string_escape<'a>(input: &mut Input<'a>) -> IResult<'a, char> {
    let escape_start = input.current_token_start();

    preceded(
        '\\',
        cut_err(alt((
            one_of(['n', 'r', 't', '0', '\\', '"', '\'']).map(|c| match c {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                '0' => '\0',
                other => other,
            }),
            preceded(
                'u',
                delimited('{', take_while(1..=6, |c: char| c.is_ascii_hexdigit()), '}'),
            )
            .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)),
        )))
        .context(LexerDiagnostic {
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\n`, `\\r`, `\\t`, `\\0`, `\\\\`, `\\\"`, `\\'`, `\\u{XXXX}`"),
            start: escape_start,
        }),
    )
    .parse_next(input)
}

/// Parse a double-quoted string literal.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();

    let content = repeat(0.., alt((string_escape, none_of(['"', '\\', '\n', '\r']))))
        .fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    preceded(
        '"',
        cut_err(terminated(content, '"')).context(LexerDiagnostic {
            message: "unterminated string literal",
            help: Some("add a closing `\"` before the end of the line"),
            start,
        }),
    )
    .map(Token::StringLiteral)
    .parse_next(input)
}

/// Parse an integer or decimal literal with an optional leading `-`.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();

    let text = terminated(
        (
            opt('-'),
            digit1,
            opt(('.', digit1)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
        )
            .take(),
        // `12abc` is not a number followed by an identifier
        peek(not(one_of(is_identifier_char))),
    )
    .parse_next(input)?;

    let token = if text.contains(['.', 'e', 'E']) {
        text.parse().ok().map(Token::DecimalLiteral)
    } else {
        text.parse().ok().map(Token::IntegerLiteral)
    };

    token.ok_or_else(|| {
        cut_with(
            input,
            LexerDiagnostic {
                message: "number literal out of range",
                help: Some("integer literals must fit in a signed 64-bit integer"),
                start,
            },
        )
    })
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((
            literal("language").value(Token::Language),
            literal("import").value(Token::Import),
            literal("true").value(Token::True),
            literal("false").value(Token::False),
        )),
        peek(not(one_of(is_identifier_char))),
    )
    .parse_next(input)
}

/// Parse identifiers
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., is_identifier_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse punctuation; `#(` must come before single characters.
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("#(").value(Token::RecordOpen),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '='.value(Token::Equals),
        ':'.value(Token::Colon),
        '.'.value(Token::Dot),
        ','.value(Token::Comma),
        ';'.value(Token::Semicolon),
    ))
    .parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        string_literal,
        number_literal, // Must come before punctuation (`-`) and identifier
        keyword,        // Must come before identifier
        identifier,
        punctuation,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// A token, or `None` for skipped trivia.
fn lexeme<'a>(input: &mut Input<'a>) -> IResult<'a, Option<PositionedToken<'a>>> {
    alt((trivia.map(|()| None), positioned_token.map(Some))).parse_next(input)
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match lexeme(&mut input) {
                Ok(Some(token)) => self.tokens.push(token),
                Ok(None) => {}
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    // Skip one character and resume.
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|_| self.tokens)
    }

    /// Convert a winnow error to a fatal syntax diagnostic.
    ///
    /// Uses the first `LexerDiagnostic` context when present and falls back
    /// to "unexpected character" otherwise.
    fn convert_err_mode(err: ErrMode<ContextError<LexerDiagnostic>>, error_pos: usize) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));
            let mut diag = Diagnostic::fatal(*message)
                .with_category(Category::SyntaxError)
                .with_label(span, *message);
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::fatal("unexpected character")
            .with_category(Category::SyntaxError)
            .with_label(span, "not valid in Simon source")
    }
}

/// Tokenize source text, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - the significant tokens, without whitespace or comments
/// - `Err(ParseError)` - one or more fatal syntax diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}
