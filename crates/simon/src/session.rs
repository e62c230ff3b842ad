//! State shared by every unit of one compilation.

use crate::{
    config::FatalScope,
    diagnostics::{DiagnosticSink, Problem},
    resolve::Deferred,
};

/// Diagnostics and deferred requests of one compilation session.
///
/// Passed to the builder for each unit and to the resolution pass once all
/// units are parsed.
#[derive(Debug)]
pub(crate) struct Session {
    diagnostics: DiagnosticSink,
    requests: Vec<Deferred>,
    fatal_scope: FatalScope,
}

impl Session {
    pub fn new(fatal_scope: FatalScope) -> Self {
        Self {
            diagnostics: DiagnosticSink::new(),
            requests: Vec::new(),
            fatal_scope,
        }
    }

    pub fn report(&mut self, problem: Problem) {
        self.diagnostics.report(problem);
    }

    pub fn defer(&mut self, request: Deferred) {
        self.requests.push(request);
    }

    /// Removes every deferred request, in creation order.
    pub fn take_requests(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.requests)
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.has_fatal()
    }

    /// Whether a root closed now in `source` is kept.
    pub fn accepts_roots(&self, source: &str) -> bool {
        match self.fatal_scope {
            FatalScope::Session => !self.diagnostics.has_fatal(),
            FatalScope::Unit => !self.diagnostics.has_fatal_in(source),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticSink {
        &mut self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use simon_parser::error::Diagnostic;

    use super::*;

    #[test]
    fn test_session_scope_gates_every_unit() {
        let mut session = Session::new(FatalScope::Session);
        assert!(session.accepts_roots("a"));
        session.report(Problem::unpositioned("a", Diagnostic::fatal("boom")));
        assert!(!session.accepts_roots("a"));
        assert!(!session.accepts_roots("b"));
    }

    #[test]
    fn test_unit_scope_gates_only_that_unit() {
        let mut session = Session::new(FatalScope::Unit);
        session.report(Problem::unpositioned("a", Diagnostic::fatal("boom")));
        assert!(!session.accepts_roots("a"));
        assert!(session.accepts_roots("b"));
        assert!(session.has_fatal());
    }
}
