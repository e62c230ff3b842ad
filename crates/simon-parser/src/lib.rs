//! # Simon Parser
//!
//! Reads Simon source text into the construction events the compiler
//! consumes.
//!
//! ## Usage
//!
//! ```
//! # use simon_parser::{parse, Event, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         language UI
//!         Application myApp {
//!             screens { screen home }
//!         }
//!     "#;
//!
//!     let events = parse(source)?;
//!     assert!(matches!(events[0].inner(), Event::Language(name) if name == "UI"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod events;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use error::{Category, Diagnostic, ParseError, Severity};
pub use events::{Event, Literal, RecordField};
pub use lexer::tokenize;
pub use span::{LineIndex, Span, Spanned};
pub use tokens::{PositionedToken, Token};

use log::trace;

/// Parse source text into construction events.
///
/// 1. **Tokenize** - Convert source text to tokens, dropping trivia
/// 2. **Parse** - Build a syntax tree from tokens
/// 3. **Flatten** - Emit the tree as left-to-right events
///
/// # Errors
///
/// Returns a [`ParseError`] holding fatal [`Category::SyntaxError`]
/// diagnostics if the text is not well formed. No events are produced for a
/// malformed unit.
pub fn parse(source: &str) -> Result<Vec<Spanned<Event>>, ParseError> {
    let tokens = tokenize(source)?;
    trace!(tokens = tokens.len(); "Tokenized source");

    let unit = parser::build_unit(&tokens, source.len())?;
    let events = events::flatten(unit);
    trace!(events = events.len(); "Parsed source");
    Ok(events)
}
