//! Deferred name resolution.
//!
//! Link statements are not resolved while a unit is parsed: the target may
//! be declared further down the unit or in a unit that has not been
//! discovered yet. The builder records a [`Deferred`] request instead, and
//! [`resolve_all`] services every request once the whole import closure has
//! been parsed.

use log::{debug, info, trace};

use simon_core::{
    backend::{Backend, ObjectId},
    metamodel::{LanguageSet, Reference},
};
use simon_parser::{
    Span,
    error::{Category, Diagnostic},
};

use crate::diagnostics::{DiagnosticSink, Problem, backend_failure};

/// A construction step postponed until every unit is parsed.
#[derive(Debug, Clone)]
pub(crate) enum Deferred {
    LinkReference(LinkRequest),
}

/// `feature: a.b.c` written inside `scope`.
#[derive(Debug, Clone)]
pub(crate) struct LinkRequest {
    pub source: String,
    pub line: usize,
    pub column: usize,
    /// Span of the link statement.
    pub span: Span,
    pub scope: ObjectId,
    pub reference: Reference,
    pub path: Vec<String>,
    /// Languages active in the unit when the link was written.
    pub languages: LanguageSet,
}

impl LinkRequest {
    fn problem(&self, diagnostic: Diagnostic) -> Problem {
        Problem::new(self.source.clone(), self.line, self.column, diagnostic)
    }
}

/// Services `requests` in creation order.
///
/// Unresolved names and rejected links are reported to `sink`; neither stops
/// the remaining requests. Returns the number of requests that failed.
pub(crate) fn resolve_all<B: Backend>(
    requests: Vec<Deferred>,
    backend: &mut B,
    sink: &mut DiagnosticSink,
) -> usize {
    info!(requests = requests.len(); "Resolving deferred references");

    let mut failed = 0;
    for request in requests {
        let outcome = match &request {
            Deferred::LinkReference(link) => resolve_link(link, backend),
        };
        if let Err(problem) = outcome {
            debug!(source = problem.source(), line = problem.line(); "Resolution failed");
            sink.report(problem);
            failed += 1;
        }
    }

    debug!(failed = failed; "Resolution pass finished");
    failed
}

fn resolve_link<B: Backend>(link: &LinkRequest, backend: &mut B) -> Result<(), Problem> {
    let dotted = link.path.join(".");
    let components: Vec<&str> = link.path.iter().map(String::as_str).collect();
    trace!(
        path = dotted.as_str(),
        scope = link.scope.index(),
        languages = link.languages.len();
        "Resolving link"
    );

    let Some(target) = backend.resolve_name(link.scope, &components) else {
        return Err(link.problem(
            Diagnostic::error(format!("Unknown name: '{dotted}'"))
                .with_category(Category::UnresolvedName)
                .with_label(link.span, "no element with this name is visible here"),
        ));
    };

    backend
        .link(&link.reference, link.scope, target)
        .map_err(|err| link.problem(backend_failure(&err).with_label(link.span, "linked here")))
}
