//! Diagnostics for Simon sources.
//!
//! A [`Diagnostic`] is a single problem with a [`Severity`], a [`Category`],
//! labelled source spans and optional help text. The lexer and parser return
//! their diagnostics wrapped in a [`ParseError`]; the compiler positions
//! them in a named unit.
//!
//! # Example
//!
//! ```
//! # use simon_parser::error::{Category, Diagnostic};
//! # use simon_parser::Span;
//!
//! let diag = Diagnostic::fatal("feature `widgets` not found in `Screen`")
//!     .with_category(Category::MissingFeature)
//!     .with_label(Span::new(40..47), "unknown composition")
//!     .with_help("declared compositions: `panels`");
//! assert!(diag.severity().is_fatal());
//! ```

mod category;
mod collector;
mod diagnostic;
mod label;
mod parse_error;
mod severity;

pub use category::Category;
pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
