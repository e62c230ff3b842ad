//! Error types for Simon operations.
//!
//! Problems in source units are reported as [`Problem`](crate::Problem)s
//! inside each [`CompilationResult`](crate::CompilationResult); [`SimonError`]
//! covers failures that prevent a compilation from running at all.

use std::io;

use thiserror::Error;

use simon_core::metamodel::CatalogError;

/// The main error type for Simon operations.
#[derive(Debug, Error)]
pub enum SimonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Metamodel error: {0}")]
    Metamodel(#[from] CatalogError),

    #[error("No metamodel configured")]
    NoMetamodel,

    #[error("No entry points given")]
    NoEntryPoints,
}
