//! The error type returned by the lexer and parser.

use thiserror::Error;

use crate::error::Diagnostic;

/// One or more diagnostics that stopped a source unit from being read.
#[derive(Debug, Clone, Error)]
#[error("{}", summary(.diagnostics))]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// The first diagnostic, and how many follow it.
fn summary(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => String::new(),
        [first] => first.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_single() {
        let err: ParseError = Diagnostic::fatal("unexpected character").into();
        assert_eq!(err.to_string(), "fatal[S000]: unexpected character");
    }

    #[test]
    fn test_parse_error_display_multiple() {
        let err: ParseError = vec![
            Diagnostic::fatal("first"),
            Diagnostic::fatal("second"),
            Diagnostic::fatal("third"),
        ]
        .into();
        assert_eq!(err.to_string(), "fatal[S000]: first (+2 more)");
        assert_eq!(err.into_diagnostics().len(), 3);
    }

    #[test]
    fn test_parse_error_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(ParseError::new(vec![Diagnostic::error("bad token")]));
        assert_eq!(err.to_string(), "error[S000]: bad token");
        assert!(err.source().is_none());
    }
}
