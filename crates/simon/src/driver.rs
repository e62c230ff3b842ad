//! Discovery and compilation of the transitive import closure.
//!
//! Units are processed in batches. The first batch holds the entry points;
//! each following batch holds the units imported by the previous one that
//! have not been processed yet. One [`Builder`] and one backend session are
//! shared by every unit, so elements of different units can reference one
//! another. Links are resolved once, after the last batch.

use std::mem;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};

use simon_core::{
    backend::{Backend, ObjectId},
    metamodel::Metamodel,
    source::{Layered, SourceAccess},
};
use simon_parser::error::{Category, Diagnostic};

use crate::{
    builder::Builder,
    config::CompilerConfig,
    diagnostics::{DiagnosticSink, Problem},
    resolve::resolve_all,
    result::CompilationResult,
    session::Session,
};

/// Compiles `entries` and everything they import.
///
/// Built-in units of the metamodel are consulted before `sources`. Returns
/// one result per unit touched, in processing order, followed by any unit
/// that only received problems.
pub(crate) fn compile_units<M, B, S>(
    metamodel: &M,
    config: &CompilerConfig,
    backend: &mut B,
    entries: &[&str],
    sources: &S,
) -> Vec<CompilationResult>
where
    M: Metamodel + ?Sized,
    B: Backend,
    S: SourceAccess + ?Sized,
{
    let sources = Layered::new(metamodel.built_in_sources(), sources);
    let mut session = Session::new(config.fatal_scope());
    let mut builder = Builder::new(metamodel);

    let mut pending: IndexSet<String> = IndexSet::new();
    if config.implicit_builtins() {
        pending.extend(metamodel.built_in_sources().names());
    }
    pending.extend(entries.iter().map(|entry| entry.to_string()));

    let mut processed: IndexSet<String> = IndexSet::new();
    let mut built: IndexMap<String, Vec<ObjectId>> = IndexMap::new();
    let mut batch_number = 0;

    while !pending.is_empty() {
        batch_number += 1;
        let batch = mem::take(&mut pending);
        info!(batch = batch_number, units = batch.len(); "Processing unit batch");

        let mut discovered: IndexSet<String> = IndexSet::new();
        for name in &batch {
            let Some(text) = sources.fetch(name) else {
                warn!(source = name.as_str(); "No source found");
                session.report(Problem::unpositioned(
                    name.as_str(),
                    Diagnostic::fatal(format!("No source found for unit `{name}`"))
                        .with_category(Category::MissingElement),
                ));
                built.insert(name.clone(), Vec::new());
                continue;
            };

            let outcome = builder.build_unit(name, &text, backend, &mut session);
            debug!(
                source = name.as_str(),
                roots = outcome.roots.len(),
                imports = outcome.imports.len();
                "Unit built"
            );
            built.insert(name.clone(), outcome.roots);
            discovered.extend(outcome.imports);
        }

        processed.extend(batch);
        pending = discovered
            .into_iter()
            .filter(|name| !processed.contains(name))
            .collect();
    }

    let requests = session.take_requests();
    resolve_all(requests, backend, session.diagnostics_mut());

    info!(units = built.len(), fatal = session.has_fatal(); "Compilation finished");
    merge_results(built, session.diagnostics_mut(), config)
}

/// Attaches every source's problems to its result.
fn merge_results(
    built: IndexMap<String, Vec<ObjectId>>,
    sink: &mut DiagnosticSink,
    config: &CompilerConfig,
) -> Vec<CompilationResult> {
    let mut results = Vec::with_capacity(built.len());

    for (source, mut roots) in built {
        let problems = sink.take(&source);
        if config.suppress_roots_on_error()
            && problems.iter().any(|problem| problem.severity().is_error())
        {
            debug!(source = source.as_str(), roots = roots.len(); "Roots suppressed by errors");
            roots.clear();
        }
        results.push(CompilationResult::new(source, roots, problems));
    }

    let remaining: Vec<String> = sink.sources().map(str::to_string).collect();
    for source in remaining {
        let problems = sink.take(&source);
        results.push(CompilationResult::new(source, Vec::new(), problems));
    }
    results
}
