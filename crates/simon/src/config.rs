//! Configuration types for Simon compilation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML configuration file. Every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the compiler and
//!   metamodel sections.
//! - [`CompilerConfig`] - Controls how units are discovered and when their
//!   roots are kept.
//! - [`MetamodelConfig`] - Where the type catalog is loaded from.
//!
//! # Example
//!
//! ```
//! # use simon::config::{AppConfig, FatalScope};
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [compiler]
//!     fatal_scope = "unit"
//!
//!     [metamodel]
//!     path = "ui.toml"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.compiler().fatal_scope(), FatalScope::Unit);
//! assert!(!config.compiler().implicit_builtins());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    compiler: CompilerConfig,

    #[serde(default)]
    metamodel: MetamodelConfig,
}

impl AppConfig {
    pub fn new(compiler: CompilerConfig, metamodel: MetamodelConfig) -> Self {
        Self {
            compiler,
            metamodel,
        }
    }

    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    pub fn metamodel(&self) -> &MetamodelConfig {
        &self.metamodel
    }
}

/// Which fatal problems stop a unit's roots from being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatalScope {
    /// A fatal problem anywhere in the session drops every root closed
    /// after it, in any unit.
    #[default]
    Session,

    /// Only fatal problems of the unit itself drop its roots.
    Unit,
}

/// Settings of the compilation engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Seed every built-in unit of the metamodel as an entry point.
    implicit_builtins: bool,

    fatal_scope: FatalScope,

    /// Drop the roots of any unit that has an error or fatal problem.
    suppress_roots_on_error: bool,

    /// File extension of source units found on disk.
    source_extension: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            implicit_builtins: false,
            fatal_scope: FatalScope::default(),
            suppress_roots_on_error: false,
            source_extension: "simon".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn implicit_builtins(&self) -> bool {
        self.implicit_builtins
    }

    pub fn fatal_scope(&self) -> FatalScope {
        self.fatal_scope
    }

    pub fn suppress_roots_on_error(&self) -> bool {
        self.suppress_roots_on_error
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn with_implicit_builtins(mut self, enabled: bool) -> Self {
        self.implicit_builtins = enabled;
        self
    }

    pub fn with_fatal_scope(mut self, scope: FatalScope) -> Self {
        self.fatal_scope = scope;
        self
    }

    pub fn with_suppress_roots_on_error(mut self, enabled: bool) -> Self {
        self.suppress_roots_on_error = enabled;
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }
}

/// Location of the type catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetamodelConfig {
    /// Path of a TOML catalog. Relative paths are resolved by the caller.
    #[serde(default)]
    path: Option<PathBuf>,
}

impl MetamodelConfig {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert!(!config.implicit_builtins());
        assert_eq!(config.fatal_scope(), FatalScope::Session);
        assert!(!config.suppress_roots_on_error());
        assert_eq!(config.source_extension(), "simon");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [compiler]
            suppress_roots_on_error = true
            "#,
        )
        .unwrap();

        assert!(config.compiler().suppress_roots_on_error());
        assert_eq!(config.compiler().source_extension(), "simon");
        assert!(config.metamodel().path().is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[compiler]\nfatal = true\n");
        assert!(result.is_err());
    }
}
