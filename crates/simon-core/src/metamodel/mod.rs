//! Metamodel descriptors and the query interface the compiler consumes.

mod catalog;
mod descriptor;
mod schema;

use indexmap::IndexSet;

pub use catalog::{Catalog, CatalogBuilder, CatalogError};
pub use descriptor::{
    Composition, EnumType, ObjectType, PrimitiveKind, PrimitiveType, RecordType, Reference, Slot,
    Slotted, TypeDescriptor,
};
pub use schema::{
    DefaultValue, EnumDef, FeatureDef, LanguageDef, ObjectDef, PrimitiveDef, RecordDef, Schema,
    SlotDef,
};

use crate::{identifier::Id, source::SourceAccess};

/// Read-only access to a catalog of types.
pub trait Metamodel {
    /// Resolves a type name, visible only if its language is active.
    fn resolve_type(&self, name: Id, languages: &LanguageSet) -> Option<TypeDescriptor>;

    /// Lists every type visible under `languages`.
    fn enumerate(&self, languages: &LanguageSet) -> Vec<TypeDescriptor>;

    /// Looks up a type regardless of the active languages.
    ///
    /// Used for the target types of features, which may be declared by a
    /// language the unit never named.
    fn descriptor(&self, name: Id) -> Option<TypeDescriptor>;

    /// Units that every compilation may import without a source provider.
    fn built_in_sources(&self) -> &dyn SourceAccess;
}

/// The languages declared by a unit, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet(IndexSet<Id>);

impl LanguageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a language; returns `false` if it was already active.
    pub fn insert(&mut self, language: Id) -> bool {
        self.0.insert(language)
    }

    pub fn contains(&self, language: Id) -> bool {
        self.0.contains(&language)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Id> for LanguageSet {
    fn from_iter<T: IntoIterator<Item = Id>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_set_keeps_declaration_order() {
        let mut set = LanguageSet::new();
        assert!(set.insert(Id::new("UI")));
        assert!(set.insert(Id::new("Data")));
        assert!(!set.insert(Id::new("UI")));

        let names: Vec<String> = set.iter().map(|id| id.as_string()).collect();
        assert_eq!(names, vec!["UI", "Data"]);
        assert!(set.contains(Id::new("Data")));
        assert_eq!(set.len(), 2);

        set.clear();
        assert!(set.is_empty());
    }
}
