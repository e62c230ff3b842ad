//! Problems positioned in named source units.

use std::fmt;

use indexmap::IndexMap;

use simon_core::backend::BackendError;
use simon_parser::{
    LineIndex,
    error::{Category, Diagnostic, Severity},
};

/// A [`Diagnostic`] attributed to a source unit, with a 1-based line and
/// column.
///
/// Problems that do not point into a source (a unit that could not be
/// fetched) report line and column `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    source: String,
    line: usize,
    column: usize,
    diagnostic: Diagnostic,
}

impl Problem {
    pub fn new(
        source: impl Into<String>,
        line: usize,
        column: usize,
        diagnostic: Diagnostic,
    ) -> Self {
        Self {
            source: source.into(),
            line,
            column,
            diagnostic,
        }
    }

    /// Positions `diagnostic` at the start of its primary label.
    pub fn locate(source: impl Into<String>, lines: &LineIndex<'_>, diagnostic: Diagnostic) -> Self {
        let (line, column) = diagnostic
            .primary_span()
            .map(|span| lines.line_col(span.start()))
            .unwrap_or((0, 0));
        Self::new(source, line, column, diagnostic)
    }

    /// A problem concerning a whole unit rather than a position in it.
    pub fn unpositioned(source: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self::new(source, 0, 0, diagnostic)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn message(&self) -> &str {
        self.diagnostic.message()
    }

    pub fn severity(&self) -> Severity {
        self.diagnostic.severity()
    }

    pub fn category(&self) -> Category {
        self.diagnostic.category()
    }

    /// The underlying diagnostic, with its labels and help text.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.source, self.diagnostic)
        } else {
            write!(
                f,
                "{}:{}:{}: {}",
                self.source, self.line, self.column, self.diagnostic
            )
        }
    }
}

/// Collects problems per source unit for one compilation session.
///
/// Sources are kept in the order they first received a problem, and each
/// source's problems in report order. Whether a fatal problem was ever
/// reported is remembered even after the problems are taken.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    problems: IndexMap<String, Vec<Problem>>,
    fatal_seen: bool,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, problem: Problem) {
        if problem.severity().is_fatal() {
            self.fatal_seen = true;
        }
        self.problems
            .entry(problem.source.clone())
            .or_default()
            .push(problem);
    }

    /// Returns `true` once any fatal problem has been reported in the session.
    pub fn has_fatal(&self) -> bool {
        self.fatal_seen
    }

    /// Returns `true` if `source` has a pending fatal problem.
    pub fn has_fatal_in(&self, source: &str) -> bool {
        self.problems(source)
            .iter()
            .any(|problem| problem.severity().is_fatal())
    }

    /// Returns `true` if `source` has a pending error or fatal problem.
    pub fn has_errors_in(&self, source: &str) -> bool {
        self.problems(source)
            .iter()
            .any(|problem| problem.severity().is_error())
    }

    pub fn problems(&self, source: &str) -> &[Problem] {
        self.problems
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Removes and returns the problems of `source`.
    pub fn take(&mut self, source: &str) -> Vec<Problem> {
        self.problems.shift_remove(source).unwrap_or_default()
    }

    /// Sources with pending problems, in first-report order.
    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.problems.keys().map(String::as_str)
    }

    /// Number of pending problems across all sources.
    pub fn len(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.values().all(Vec::is_empty)
    }
}

/// Converts a failed backend operation into a diagnostic.
///
/// Type and multiplicity violations are recoverable errors; the rest signal
/// a broken object graph and are fatal.
pub(crate) fn backend_failure(error: &BackendError) -> Diagnostic {
    match error {
        BackendError::TypeMismatch { .. } => {
            Diagnostic::error(error.to_string()).with_category(Category::TypeError)
        }
        BackendError::MultiplicityViolation { .. } => {
            Diagnostic::error(error.to_string()).with_category(Category::Unspecified)
        }
        BackendError::AlreadyContained(_) | BackendError::UnknownObject(_) => {
            Diagnostic::fatal(error.to_string()).with_category(Category::Internal)
        }
    }
}
