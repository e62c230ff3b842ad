//! Simon - a compiler front-end for a textual object-construction language.
//!
//! Source units written against a metamodel are parsed into an object graph
//! that conforms to it. Imports are followed transitively, names (including
//! forward and cross-unit references) are resolved in a second pass once
//! every unit is parsed, and every failure is reported as a positioned,
//! categorized [`Problem`].
//!
//! # Example
//!
//! ```
//! use simon::{Compiler, config::CompilerConfig, metamodel::Catalog, source::MemorySources};
//!
//! let catalog = Catalog::from_toml_str(
//!     r#"
//!     [[languages]]
//!     name = "UI"
//!
//!     [[languages.objects]]
//!     name = "Application"
//!     root = true
//!     compositions = [{ name = "screens", type = "Screen", many = true }]
//!     references = [{ name = "home", type = "Screen" }]
//!
//!     [[languages.objects]]
//!     name = "Screen"
//!     "#,
//! )
//! .unwrap();
//!
//! let sources = MemorySources::new().with(
//!     "main",
//!     "language UI\nApplication main { home: welcome screens { screen welcome } }",
//! );
//!
//! let compiler = Compiler::new(&catalog, CompilerConfig::default());
//! let compilation = compiler.compile_graph(&["main"], &sources).unwrap();
//!
//! let result = &compilation.results()[0];
//! assert!(result.problems().is_empty());
//! let app = result.roots()[0];
//! let home = compilation.graph().linked(app, "home").unwrap();
//! assert_eq!(compilation.graph().children_of(app, "screens"), &[home]);
//! ```

pub mod config;

mod builder;
mod diagnostics;
mod driver;
mod error;
mod resolve;
mod result;
mod scope;
mod session;

pub use simon_core::{backend, graph, identifier, metamodel, source, value};
pub use simon_parser::error::{Category, Diagnostic, Severity};

pub use diagnostics::{DiagnosticSink, Problem};
pub use error::SimonError;
pub use result::CompilationResult;

use log::info;

use simon_core::{
    backend::Backend,
    graph::ModelGraph,
    metamodel::{Catalog, Metamodel},
    source::SourceAccess,
};

use config::{CompilerConfig, MetamodelConfig};

/// Compiles source units against a metamodel.
///
/// The compiler holds no state between calls; every call to
/// [`compile`](Compiler::compile) is one backend session.
pub struct Compiler<'m, M: ?Sized> {
    metamodel: &'m M,
    config: CompilerConfig,
}

impl<'m, M: Metamodel + ?Sized> Compiler<'m, M> {
    /// Create a compiler for `metamodel`.
    pub fn new(metamodel: &'m M, config: CompilerConfig) -> Self {
        Self { metamodel, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `entries` and every unit they import into `backend`.
    ///
    /// Returns one [`CompilationResult`] per unit touched: the entry points,
    /// the units they import transitively, and any built-in unit pulled in.
    /// Problems in sources never fail the call; they are carried by the
    /// results.
    ///
    /// # Errors
    ///
    /// Returns [`SimonError::NoEntryPoints`] if there is nothing to compile.
    pub fn compile<B, S>(
        &self,
        backend: &mut B,
        entries: &[&str],
        sources: &S,
    ) -> Result<Vec<CompilationResult>, SimonError>
    where
        B: Backend,
        S: SourceAccess + ?Sized,
    {
        if entries.is_empty() && !self.config.implicit_builtins() {
            return Err(SimonError::NoEntryPoints);
        }

        info!(entries = entries.len(); "Starting compilation");
        let results = backend.run_session(|backend| {
            driver::compile_units(self.metamodel, &self.config, backend, entries, sources)
        });
        Ok(results)
    }

    /// Compile into a fresh [`ModelGraph`].
    ///
    /// # Errors
    ///
    /// See [`compile`](Compiler::compile).
    pub fn compile_graph<S>(&self, entries: &[&str], sources: &S) -> Result<Compilation, SimonError>
    where
        S: SourceAccess + ?Sized,
    {
        let mut graph = ModelGraph::new();
        let results = self.compile(&mut graph, entries, sources)?;
        Ok(Compilation { graph, results })
    }
}

/// A model graph together with the results that describe it.
#[derive(Debug)]
pub struct Compilation {
    graph: ModelGraph,
    results: Vec<CompilationResult>,
}

impl Compilation {
    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    pub fn results(&self) -> &[CompilationResult] {
        &self.results
    }

    /// The result of unit `source`, if it was touched.
    pub fn result(&self, source: &str) -> Option<&CompilationResult> {
        self.results.iter().find(|result| result.source() == source)
    }

    /// Returns `true` if any unit has an error or fatal problem.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(CompilationResult::has_errors)
    }

    pub fn into_parts(self) -> (ModelGraph, Vec<CompilationResult>) {
        (self.graph, self.results)
    }
}

/// Load the catalog named by the metamodel section of the configuration.
///
/// # Errors
///
/// Returns [`SimonError::NoMetamodel`] if no path is configured, or
/// [`SimonError::Metamodel`] if the catalog cannot be read or is invalid.
pub fn load_metamodel(config: &MetamodelConfig) -> Result<Catalog, SimonError> {
    let path = config.path().ok_or(SimonError::NoMetamodel)?;
    Ok(Catalog::from_path(path)?)
}
