//! Simon Core Types
//!
//! Foundational types shared by the Simon parser, compiler and CLI:
//!
//! - **Identifiers**: interned names ([`identifier::Id`])
//! - **Metamodel**: type descriptors, the [`metamodel::Metamodel`] query
//!   trait and the TOML-loadable [`metamodel::Catalog`]
//! - **Values**: slot values ([`value::Value`])
//! - **Backend**: the construction interface ([`backend::Backend`]) and an
//!   arena implementation ([`graph::ModelGraph`])
//! - **Sources**: unit lookup by name ([`source::SourceAccess`])

pub mod backend;
pub mod graph;
pub mod identifier;
pub mod metamodel;
pub mod source;
pub mod value;
