//! Parser for Simon source tokens.
//!
//! Transforms the token stream from the [`lexer`](super::lexer) into the
//! syntax tree of [`parser_types`](super::parser_types). The public entry
//! point is [`build_unit`].

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, opt, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Category, Diagnostic},
    events::{Literal, RecordField},
    parser_types::{Declaration, Item, Member, Unit},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected
    Label(&'static str),
}

type Input<'src> = SimonTokenSlice<'src>;
type IResult<O> = ModalResult<O, ContextError<Context>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type SimonTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Parse one punctuation or keyword token, returning its span.
fn punct<'src>(input: &mut Input<'src>, expected: Token<'static>, label: &'static str) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'_>| token.token == expected)
        .map(|token: &PositionedToken<'_>| token.span)
        .context(Context::Label(label))
        .parse_next(input)
}

fn semicolon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punct(input, Token::Semicolon, "`;`")
}

/// Build a committed error expecting `label` at the current token.
fn cut_error(input: &Input<'_>, label: &'static str) -> ErrMode<ContextError<Context>> {
    ErrMode::Cut(ContextError::new().add_context(input, &input.checkpoint(), Context::Label(label)))
}

/// Returns `true` if the next token is `expected`.
fn next_is(input: &Input<'_>, expected: &Token<'_>) -> bool {
    input
        .peek_token()
        .is_some_and(|token| &token.token == expected)
}

/// Parse an identifier with its span
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(name.to_string(), token.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse a dotted path: `a.b.c`
fn path<'src>(input: &mut Input<'src>) -> IResult<Spanned<Vec<String>>> {
    let first = identifier.parse_next(input)?;
    let mut span = first.span();
    let mut components = vec![first.into_inner()];

    let rest: Vec<Spanned<String>> = repeat(
        0..,
        preceded(
            |i: &mut Input<'src>| punct(i, Token::Dot, "`.`"),
            cut_err(identifier),
        ),
    )
    .parse_next(input)?;

    for component in rest {
        span = span.union(component.span());
        components.push(component.into_inner());
    }
    Ok(Spanned::new(components, span))
}

/// Parse `language Name`
fn language_header<'src>(input: &mut Input<'src>) -> IResult<Item> {
    preceded(
        |i: &mut Input<'src>| punct(i, Token::Language, "`language`"),
        cut_err(identifier).context(Context::Label("language name")),
    )
    .map(Item::Language)
    .parse_next(input)
}

/// Parse `import a.b` or `import "a.b"`
fn import_header<'src>(input: &mut Input<'src>) -> IResult<Item> {
    let unit = alt((
        path.map(|path| path.map(|components| components.join("."))),
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::StringLiteral(text) => Some(Spanned::new(text.clone(), token.span)),
            _ => None,
        }),
    ));

    preceded(
        |i: &mut Input<'src>| punct(i, Token::Import, "`import`"),
        cut_err(unit).context(Context::Label("unit name")),
    )
    .map(Item::Import)
    .parse_next(input)
}

/// Parse a literal value
fn literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<Literal>> {
    if next_is(input, &Token::RecordOpen) {
        return record_literal(input);
    }

    any.verify_map(|token: &PositionedToken<'_>| {
        let literal = match &token.token {
            Token::IntegerLiteral(value) => Literal::Integer(*value),
            Token::DecimalLiteral(value) => Literal::Decimal(*value),
            Token::StringLiteral(text) => Literal::String(text.clone()),
            Token::True => Literal::Boolean(true),
            Token::False => Literal::Boolean(false),
            Token::Identifier(name) => Literal::Identifier(name.to_string()),
            _ => return None,
        };
        Some(Spanned::new(literal, token.span))
    })
    .context(Context::Label("literal"))
    .parse_next(input)
}

/// Parse `#( a = 1, b: "x" )`
fn record_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<Literal>> {
    let open = punct(input, Token::RecordOpen, "`#(`")?;

    let field = (
        identifier,
        cut_err(alt((
            |i: &mut Input<'src>| punct(i, Token::Equals, "`=`"),
            |i: &mut Input<'src>| punct(i, Token::Colon, "`:`"),
        ))),
        cut_err(literal),
        opt(|i: &mut Input<'src>| punct(i, Token::Comma, "`,`")),
    )
        .map(|(name, _, value, _)| RecordField { name, value });

    let fields: Vec<RecordField> = repeat(0.., field).parse_next(input)?;
    let close = cut_err(|i: &mut Input<'src>| punct(i, Token::RightParen, "`)`"))
        .context(Context::Label("record field or `)`"))
        .parse_next(input)?;

    Ok(Spanned::new(Literal::Record(fields), open.union(close)))
}

/// Parse `[tag, tag]`
fn modifiers<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<String>>> {
    punct(input, Token::LeftBracket, "`[`")?;

    let tags: Vec<Spanned<String>> = repeat(
        1..,
        terminated(
            identifier,
            opt(|i: &mut Input<'src>| punct(i, Token::Comma, "`,`")),
        ),
    )
    .context(Context::Label("modifier"))
    .parse_next(input)?;

    cut_err(|i: &mut Input<'src>| punct(i, Token::RightBracket, "`]`")).parse_next(input)?;
    Ok(tags)
}

/// Parse a member of a declaration body
///
/// - `name = literal` - slot assignment
/// - `name: a.b` - link statement
/// - `name: literal` - slot assignment
/// - `name { declarations }` - containment block
fn member<'src>(input: &mut Input<'src>) -> IResult<Member> {
    let name = identifier.parse_next(input)?;

    let member = match input.peek_token().map(|token| &token.token) {
        Some(Token::Equals) => {
            punct(input, Token::Equals, "`=`")?;
            let value = cut_err(literal).parse_next(input)?;
            Member::Slot { name, value }
        }
        Some(Token::Colon) => {
            punct(input, Token::Colon, "`:`")?;
            if matches!(
                input.peek_token().map(|token| &token.token),
                Some(Token::Identifier(_))
            ) {
                let path = cut_err(path).parse_next(input)?;
                Member::Link {
                    feature: name,
                    path,
                }
            } else {
                let value = cut_err(literal).parse_next(input)?;
                Member::Slot { name, value }
            }
        }
        Some(Token::LeftBrace) => {
            let open = punct(input, Token::LeftBrace, "`{`")?;
            let declarations = declarations(input)?;
            let close = cut_err(|i: &mut Input<'src>| punct(i, Token::RightBrace, "`}`"))
                .context(Context::Label("declaration or `}`"))
                .parse_next(input)?;
            Member::Block {
                feature: name,
                declarations,
                span: open.union(close),
            }
        }
        _ => return Err(cut_error(input, "`=`, `:` or `{`")),
    };

    opt(semicolon).parse_next(input)?;
    Ok(member)
}

/// Parse `{ members }`
fn body<'src>(input: &mut Input<'src>) -> IResult<(Vec<Member>, Span)> {
    let open = punct(input, Token::LeftBrace, "`{`")?;
    let members: Vec<Member> = repeat(0.., member).parse_next(input)?;
    let close = cut_err(|i: &mut Input<'src>| punct(i, Token::RightBrace, "`}`"))
        .context(Context::Label("member or `}`"))
        .parse_next(input)?;
    Ok((members, open.union(close)))
}

/// Parse `[modifiers] typeWord name? { members }`
fn declaration<'src>(input: &mut Input<'src>) -> IResult<Declaration> {
    let (modifiers, type_word) = if next_is(input, &Token::LeftBracket) {
        let tags = modifiers(input)?;
        let type_word = cut_err(identifier)
            .context(Context::Label("declaration after modifiers"))
            .parse_next(input)?;
        (tags, type_word)
    } else {
        (Vec::new(), identifier.parse_next(input)?)
    };

    let name = opt(identifier).parse_next(input)?;
    let body = opt(body).parse_next(input)?;
    opt(semicolon).parse_next(input)?;

    let header_end = name.as_ref().map_or(type_word.span(), Spanned::span);
    let (members, span) = match body {
        Some((members, body_span)) => (members, type_word.span().union(body_span)),
        None => (Vec::new(), type_word.span().union(header_end)),
    };

    Ok(Declaration {
        modifiers,
        type_word,
        name,
        members,
        span,
    })
}

fn declarations<'src>(input: &mut Input<'src>) -> IResult<Vec<Declaration>> {
    repeat(0.., declaration).parse_next(input)
}

/// Parse a top-level item
fn item<'src>(input: &mut Input<'src>) -> IResult<Item> {
    let item = match input.peek_token().map(|token| &token.token) {
        Some(Token::Language) => language_header(input)?,
        Some(Token::Import) => import_header(input)?,
        _ => declaration.map(Item::Declaration).parse_next(input)?,
    };
    opt(semicolon).parse_next(input)?;
    Ok(item)
}

/// Convert a parser error to a fatal syntax diagnostic.
///
/// The error is located at the first unconsumed token, or at the end of the
/// source if every token was consumed.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
    source_len: usize,
) -> Diagnostic {
    let position = tokens.len() - current_remaining;
    let (span, found) = match tokens.get(position) {
        Some(token) => (token.span, format!("`{}`", token.token)),
        None => (
            Span::new(source_len.saturating_sub(1)..source_len),
            "end of input".to_string(),
        ),
    };

    let expected: Vec<&str> = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
            .context()
            .map(|ctx| match ctx {
                Context::Label(label) => *label,
            })
            .collect(),
        ErrMode::Incomplete(_) => Vec::new(),
    };

    let message = match expected.first() {
        Some(label) => format!("expected {label}, found {found}"),
        None => format!("unexpected {found}"),
    };

    let mut diag = Diagnostic::fatal(message)
        .with_category(Category::SyntaxError)
        .with_label(span, "unexpected token");
    if expected.len() > 1 {
        diag = diag.with_help(format!("while parsing {}", expected[1..].join(", ")));
    }
    diag
}

/// Build a unit syntax tree from tokens
pub(crate) fn build_unit<'src>(
    tokens: &'src [PositionedToken<'src>],
    source_len: usize,
) -> Result<Unit, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    let result: IResult<Vec<Item>> = repeat(0.., item).parse_next(&mut token_slice);
    match result {
        Ok(items) if token_slice.eof_offset() == 0 => Ok(Unit { items }),
        Ok(_) => Err(convert_error(
            cut_error(&token_slice, "declaration"),
            tokens,
            token_slice.eof_offset(),
            source_len,
        )),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining, source_len))
        }
    }
}
