//! Construction events.
//!
//! A unit is delivered to the compiler as a flat, left-to-right sequence of
//! [`Event`]s. Nesting is expressed by matching start and end events:
//!
//! ```text
//! language UI                      Language("UI")
//! [main] screen home {             Modifier("main"), ObjectStart{screen, home}
//!     title = "Home"               Slot{title, "Home"}
//!     next: about                  Link{next, [about]}
//!     panels {                     BlockStart{panels}
//!         panel a                  ObjectStart{panel, a}, ObjectEnd
//!     }                            BlockEnd{panels, 1}
//! }                                ObjectEnd
//! ```

use std::fmt;

use crate::{
    parser_types::{Declaration, Item, Member, Unit},
    span::{Span, Spanned},
};

/// A literal value in a slot assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    /// A string literal, already unescaped.
    String(String),
    /// A bare identifier, such as an enumerated literal.
    Identifier(String),
    /// `#( field = literal ... )`
    Record(Vec<RecordField>),
}

impl Literal {
    /// Short human-readable kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::Integer(_) => "integer",
            Literal::Decimal(_) => "decimal",
            Literal::Boolean(_) => "boolean",
            Literal::String(_) => "string",
            Literal::Identifier(_) => "identifier",
            Literal::Record(_) => "record",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::Decimal(value) => write!(f, "{value}"),
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::String(value) => write!(f, "{value:?}"),
            Literal::Identifier(name) => write!(f, "{name}"),
            Literal::Record(fields) => {
                write!(f, "#(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{} = {}", field.name.inner(), field.value.inner())?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One field of a record literal.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: Spanned<String>,
    pub value: Spanned<Literal>,
}

/// A construction event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `language UI`
    Language(String),
    /// `import a.b` or `import "a.b"`
    Import(String),
    /// One tag of a `[tag, tag]` list preceding a declaration.
    Modifier(String),
    /// Header of a declaration: lower-case type word and optional name.
    ObjectStart {
        type_word: Spanned<String>,
        name: Option<Spanned<String>>,
    },
    /// End of the most recent declaration.
    ObjectEnd,
    Slot {
        name: Spanned<String>,
        value: Spanned<Literal>,
    },
    BlockStart {
        feature: Spanned<String>,
    },
    /// End of a containment block holding `children` direct declarations.
    BlockEnd {
        feature: Spanned<String>,
        children: usize,
    },
    Link {
        feature: Spanned<String>,
        path: Spanned<Vec<String>>,
    },
}

/// Flattens a parsed unit into events, in source order.
pub(crate) fn flatten(unit: Unit) -> Vec<Spanned<Event>> {
    let mut events = Vec::new();
    for item in unit.items {
        match item {
            Item::Language(name) => {
                let span = name.span();
                events.push(Spanned::new(Event::Language(name.into_inner()), span));
            }
            Item::Import(name) => {
                let span = name.span();
                events.push(Spanned::new(Event::Import(name.into_inner()), span));
            }
            Item::Declaration(declaration) => flatten_declaration(declaration, &mut events),
        }
    }
    events
}

fn flatten_declaration(declaration: Declaration, events: &mut Vec<Spanned<Event>>) {
    let header_span = declaration.header_span();
    let end_span = Span::new(declaration.span.end().saturating_sub(1)..declaration.span.end());

    for modifier in declaration.modifiers {
        let span = modifier.span();
        events.push(Spanned::new(Event::Modifier(modifier.into_inner()), span));
    }
    events.push(Spanned::new(
        Event::ObjectStart {
            type_word: declaration.type_word,
            name: declaration.name,
        },
        header_span,
    ));

    for member in declaration.members {
        match member {
            Member::Slot { name, value } => {
                let span = name.span().union(value.span());
                events.push(Spanned::new(Event::Slot { name, value }, span));
            }
            Member::Link { feature, path } => {
                let span = feature.span().union(path.span());
                events.push(Spanned::new(Event::Link { feature, path }, span));
            }
            Member::Block {
                feature,
                declarations,
                span,
            } => {
                let children = declarations.len();
                events.push(Spanned::new(
                    Event::BlockStart {
                        feature: feature.clone(),
                    },
                    feature.span(),
                ));
                for child in declarations {
                    flatten_declaration(child, events);
                }
                let close = Span::new(span.end().saturating_sub(1)..span.end());
                events.push(Spanned::new(Event::BlockEnd { feature, children }, close));
            }
        }
    }

    events.push(Spanned::new(Event::ObjectEnd, end_span));
}
