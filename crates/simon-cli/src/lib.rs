//! Simon CLI library
//!
//! This module contains the core CLI logic for the Simon compiler: loading
//! configuration and the metamodel, compiling entry units from a source
//! directory, and presenting the result.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fmt::Write as _;

use log::{info, warn};

use simon::{
    Compilation, Compiler, SimonError,
    identifier::Id,
    metamodel::{Catalog, LanguageSet, Metamodel},
    source::{DirectorySources, Layered, SourceAccess},
};

/// Everything a finished run produced.
#[derive(Debug)]
pub struct Report {
    catalog: Catalog,
    sources: DirectorySources,
    compilation: Compilation,
}

impl Report {
    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns `true` if any unit reported an error or fatal problem.
    pub fn has_errors(&self) -> bool {
        self.compilation.has_errors()
    }

    /// Render the object tree of every root, grouped by unit.
    pub fn render_trees(&self) -> String {
        let graph = self.compilation.graph();
        let mut out = String::new();
        for result in self.compilation.results() {
            if result.roots().is_empty() {
                continue;
            }
            // Writing to a String cannot fail.
            let _ = writeln!(out, "== {} ==", result.source());
            for &root in result.roots() {
                out.push_str(&graph.render_tree(root));
            }
        }
        out
    }

    /// Text of unit `name`, looked up the same way the compiler did.
    pub fn source_text(&self, name: &str) -> Option<String> {
        Layered::new(self.catalog.built_in_sources(), &self.sources).fetch(name)
    }
}

/// Run the Simon CLI application
///
/// Compiles the entry units named in `args` from the source directory and
/// returns the compilation. Problems in source units do not fail the run;
/// callers inspect [`Report::has_errors`].
///
/// # Errors
///
/// Returns `SimonError` for:
/// - Configuration loading errors
/// - A missing or invalid metamodel
/// - An empty entry list
pub fn run(args: &Args) -> Result<Report, SimonError> {
    info!(
        root = args.root,
        entries:? = args.entries;
        "Compiling units"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let catalog = load_catalog(args, &app_config)?;

    let sources = DirectorySources::new(
        args.root.as_str(),
        app_config.compiler().source_extension(),
    );
    let entries: Vec<&str> = args.entries.iter().map(String::as_str).collect();

    let compiler = Compiler::new(&catalog, app_config.compiler().clone());
    let compilation = compiler.compile_graph(&entries, &sources)?;

    info!(
        units = compilation.results().len(),
        objects = compilation.graph().len();
        "Compilation finished"
    );

    Ok(Report {
        catalog,
        sources,
        compilation,
    })
}

/// List the types visible under the languages named in `args.list_types`.
///
/// Each line holds a type name followed by its kind.
///
/// # Errors
///
/// Returns `SimonError` if the configuration or metamodel cannot be loaded.
pub fn list_types(args: &Args) -> Result<Vec<String>, SimonError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let catalog = load_catalog(args, &app_config)?;

    let mut languages = LanguageSet::new();
    for name in &args.list_types {
        let language = Id::new(name);
        if !catalog.has_language(language) {
            warn!(language = name.as_str(); "Unknown language");
            continue;
        }
        languages.insert(language);
    }

    Ok(catalog
        .enumerate(&languages)
        .iter()
        .map(|ty| format!("{} ({})", ty.name(), ty.kind_name()))
        .collect())
}

/// The command-line path wins over the configured one.
fn load_catalog(args: &Args, app_config: &simon::config::AppConfig) -> Result<Catalog, SimonError> {
    match &args.metamodel {
        Some(path) => Ok(Catalog::from_path(path)?),
        None => simon::load_metamodel(app_config.metamodel()),
    }
}
