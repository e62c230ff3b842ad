//! Per-unit compilation results.

use simon_core::backend::ObjectId;

use crate::diagnostics::Problem;

/// The outcome of compiling one source unit.
///
/// A result carrying error or fatal problems is not authoritative even if it
/// holds root objects.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationResult {
    source: String,
    roots: Vec<ObjectId>,
    problems: Vec<Problem>,
}

impl CompilationResult {
    pub fn new(source: impl Into<String>, roots: Vec<ObjectId>, problems: Vec<Problem>) -> Self {
        Self {
            source: source.into(),
            roots,
            problems,
        }
    }

    /// Name of the unit.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root objects built by the unit, in declaration order.
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Problems attributed to the unit, including those found while
    /// resolving its links.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Returns `true` if any problem is an error or fatal.
    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .any(|problem| problem.severity().is_error())
    }

    pub fn has_fatal(&self) -> bool {
        self.problems
            .iter()
            .any(|problem| problem.severity().is_fatal())
    }

    /// Returns `true` if the roots can be trusted.
    pub fn is_authoritative(&self) -> bool {
        !self.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use simon_parser::error::Diagnostic;

    use super::*;

    #[test]
    fn test_warnings_keep_result_authoritative() {
        let result = CompilationResult::new(
            "main",
            vec![ObjectId::new(0)],
            vec![Problem::new("main", 1, 1, Diagnostic::warning("unused"))],
        );
        assert!(result.is_authoritative());
        assert!(!result.has_fatal());

        let result = CompilationResult::new(
            "main",
            Vec::new(),
            vec![Problem::new("main", 3, 7, Diagnostic::error("Unknown name: 'x'"))],
        );
        assert!(result.has_errors());
        assert!(!result.is_authoritative());
    }
}
