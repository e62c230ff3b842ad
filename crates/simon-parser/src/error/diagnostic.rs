//! The core diagnostic type.

use std::fmt;

use crate::{
    error::{Category, Severity, label::Label},
    span::Span,
};

/// A problem found in a source unit.
///
/// ```text
/// fatal[S203]: feature `widgets` not found in `Screen`
///   --> main.simon:4:5
///    |
///  4 |     widgets {
///    |     ^^^^^^^ unknown composition
///    |
///    = help: declared compositions: `panels`
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    category: Category,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the given severity and message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: Category::Unspecified,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Create a fatal diagnostic.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }

    /// Create an error diagnostic.
    ///
    /// ```
    /// # use simon_parser::error::{Category, Diagnostic};
    /// # use simon_parser::Span;
    /// let diag = Diagnostic::error("Unknown name: 'home'")
    ///     .with_category(Category::UnresolvedName)
    ///     .with_label(Span::new(10..14), "not found");
    /// assert_eq!(diag.to_string(), "error[S300]: Unknown name: 'home'");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.category, self.message)
    }
}

impl std::error::Error for Diagnostic {}
