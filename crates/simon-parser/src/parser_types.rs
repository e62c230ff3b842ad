//! Syntax tree produced by the parser and flattened into construction
//! events.

use crate::{
    events::Literal,
    span::{Span, Spanned},
};

/// A parsed source unit.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Unit {
    pub items: Vec<Item>,
}

/// A top-level item.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Language(Spanned<String>),
    Import(Spanned<String>),
    Declaration(Declaration),
}

/// `[modifiers] typeWord name? { members }`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Declaration {
    pub modifiers: Vec<Spanned<String>>,
    pub type_word: Spanned<String>,
    pub name: Option<Spanned<String>>,
    pub members: Vec<Member>,
    /// From the type word to the closing brace (or the header end).
    pub span: Span,
}

impl Declaration {
    /// The span of the header: type word and name.
    pub fn header_span(&self) -> Span {
        match &self.name {
            Some(name) => self.type_word.span().union(name.span()),
            None => self.type_word.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Member {
    /// `name = literal` or `name: literal`
    Slot {
        name: Spanned<String>,
        value: Spanned<Literal>,
    },
    /// `feature: a.b.c`
    Link {
        feature: Spanned<String>,
        path: Spanned<Vec<String>>,
    },
    /// `feature { declarations }`
    Block {
        feature: Spanned<String>,
        declarations: Vec<Declaration>,
        span: Span,
    },
}
