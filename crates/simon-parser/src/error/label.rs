//! Labeled source spans for diagnostic messages.
//!
//! A label ties a short message to a byte range of a unit, so a problem can
//! point at the construct that caused it and at related declarations.

use crate::span::Span;

/// A message attached to a span of source.
///
/// Primary labels mark where a problem is; secondary labels add context,
/// such as where a type or name was declared.
///
/// # Example
///
/// ```text
/// fatal[S203]: Feature `widgets` not found in `Application`
///   --> main:2:19
///    |
///  2 | Application app { widgets {} }
///    | -----------       ^^^^^^^ unknown composition
///    | |
///    | element declared here
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a label marking where the problem is.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a label adding context to the problem.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// The byte range this label points at.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The text shown next to the span.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` for the label marking the problem itself.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Returns `true` for context labels.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_label() {
        let label = Label::primary(Span::new(10..20), "error here");

        assert_eq!(label.span().start(), 10);
        assert_eq!(label.span().end(), 20);
        assert_eq!(label.message(), "error here");
        assert!(label.is_primary());
        assert!(!label.is_secondary());
    }

    #[test]
    fn test_secondary_label() {
        let label = Label::secondary(Span::new(5..15), "first declared here");

        assert_eq!(label.span().range(), 5..15);
        assert_eq!(label.message(), "first declared here");
        assert!(!label.is_primary());
        assert!(label.is_secondary());
    }
}
