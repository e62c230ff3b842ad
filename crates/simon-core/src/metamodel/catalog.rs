//! In-memory metamodel built from a [`Schema`].

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use thiserror::Error;

use super::{
    LanguageSet, Metamodel,
    descriptor::{
        Composition, EnumType, ObjectType, PrimitiveKind, PrimitiveType, RecordType, Reference,
        Slot, TypeDescriptor,
    },
    schema::{DefaultValue, FeatureDef, LanguageDef, ObjectDef, Schema, SlotDef},
};
use crate::{
    identifier::Id,
    source::{MemorySources, SourceAccess},
    value::Value,
};

/// Names of the primitive types every catalog provides.
const BUILTIN_PRIMITIVES: [(&str, PrimitiveKind); 4] = [
    ("Integer", PrimitiveKind::Integer),
    ("Decimal", PrimitiveKind::Decimal),
    ("Boolean", PrimitiveKind::Boolean),
    ("String", PrimitiveKind::String),
];

/// Errors raised while building a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid metamodel schema: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read metamodel `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("language `{0}` is declared more than once")]
    DuplicateLanguage(String),

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("`{owner}.{feature}` refers to unknown type `{target}`")]
    UnknownType {
        owner: String,
        feature: String,
        target: String,
    },

    #[error("`{owner}.{feature}` must refer to {expected}, but `{target}` is not")]
    InvalidFeatureType {
        owner: String,
        feature: String,
        expected: &'static str,
        target: String,
    },

    #[error("type `{ty}` extends unknown object type `{supertype}`")]
    UnknownSupertype { ty: String, supertype: String },

    #[error("inheritance cycle through type `{0}`")]
    InheritanceCycle(String),

    #[error("invalid default for `{owner}.{slot}`: {reason}")]
    InvalidDefault {
        owner: String,
        slot: String,
        reason: String,
    },
}

/// A metamodel held entirely in memory.
///
/// # Examples
///
/// ```
/// use simon_core::metamodel::{Catalog, LanguageDef, LanguageSet, Metamodel, ObjectDef};
/// use simon_core::identifier::Id;
///
/// let catalog = Catalog::builder()
///     .language(LanguageDef::new("UI").object(ObjectDef::new("Application").root()))
///     .build()
///     .expect("valid catalog");
///
/// let mut languages = LanguageSet::new();
/// assert!(catalog.resolve_type(Id::new("Application"), &languages).is_none());
///
/// languages.insert(Id::new("UI"));
/// assert!(catalog.resolve_type(Id::new("Application"), &languages).is_some());
/// ```
#[derive(Debug)]
pub struct Catalog {
    languages: IndexSet<Id>,
    types: IndexMap<Id, TypeDescriptor>,
    builtins: MemorySources,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Builds a catalog from a schema.
    pub fn from_schema(schema: Schema) -> Result<Self, CatalogError> {
        schema
            .languages
            .into_iter()
            .fold(Self::builder(), CatalogBuilder::language)
            .build()
    }

    /// Parses a TOML schema and builds a catalog from it.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let schema: Schema = toml::from_str(text)?;
        Self::from_schema(schema)
    }

    /// Reads a TOML schema from `path` and builds a catalog from it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading metamodel");
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// All declared languages, in declaration order.
    pub fn languages(&self) -> impl Iterator<Item = Id> + '_ {
        self.languages.iter().copied()
    }

    /// Returns `true` if `language` is declared by this catalog.
    pub fn has_language(&self, language: Id) -> bool {
        self.languages.contains(&language)
    }
}

impl Metamodel for Catalog {
    fn resolve_type(&self, name: Id, languages: &LanguageSet) -> Option<TypeDescriptor> {
        let descriptor = self.types.get(&name)?;
        let language = descriptor.language()?;
        languages.contains(language).then(|| descriptor.clone())
    }

    fn enumerate(&self, languages: &LanguageSet) -> Vec<TypeDescriptor> {
        self.types
            .values()
            .filter(|ty| ty.language().is_some_and(|lang| languages.contains(lang)))
            .cloned()
            .collect()
    }

    fn descriptor(&self, name: Id) -> Option<TypeDescriptor> {
        self.types.get(&name).cloned()
    }

    fn built_in_sources(&self) -> &dyn SourceAccess {
        &self.builtins
    }
}

/// Kind of a declared type, known before descriptors are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaredKind {
    Object,
    Record,
    Enumerated,
    Primitive(PrimitiveKind),
}

/// Incrementally collects language definitions and validates them into a
/// [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    languages: Vec<LanguageDef>,
}

impl CatalogBuilder {
    pub fn language(mut self, language: LanguageDef) -> Self {
        self.languages.push(language);
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut state = BuildState::default();

        for (name, kind) in BUILTIN_PRIMITIVES {
            state.declare(name, DeclaredKind::Primitive(kind))?;
        }

        let mut languages = IndexSet::new();
        let mut builtins = MemorySources::new();
        for language in &self.languages {
            let language_id = Id::new(&language.name);
            if !languages.insert(language_id) {
                return Err(CatalogError::DuplicateLanguage(language.name.clone()));
            }
            for (unit, text) in &language.builtins {
                builtins.insert(unit.clone(), text.clone());
            }
            for object in &language.objects {
                state.declare(&object.name, DeclaredKind::Object)?;
            }
            for record in &language.records {
                state.declare(&record.name, DeclaredKind::Record)?;
            }
            for enumeration in &language.enums {
                state.declare(&enumeration.name, DeclaredKind::Enumerated)?;
            }
            for primitive in &language.primitives {
                state.declare(&primitive.name, DeclaredKind::Primitive(primitive.kind))?;
            }
        }

        // Enumerations first: slot defaults are checked against their literals.
        for language in &self.languages {
            let language_id = Id::new(&language.name);
            for enumeration in &language.enums {
                let literals = enumeration.literals.iter().map(|l| Id::new(l)).collect();
                let ty = EnumType::new(Id::new(&enumeration.name), language_id, literals);
                state.enums.insert(ty.name(), Rc::new(ty));
            }
        }

        for language in &self.languages {
            let language_id = Id::new(&language.name);
            for record in &language.records {
                let slots = record
                    .slots
                    .iter()
                    .map(|slot| state.build_slot(&record.name, slot))
                    .collect::<Result<Vec<_>, _>>()?;
                let ty = RecordType {
                    name: Id::new(&record.name),
                    language: language_id,
                    slots,
                };
                state.records.insert(ty.name, Rc::new(ty));
            }
        }

        let object_defs: HashMap<Id, (Id, &ObjectDef)> = self
            .languages
            .iter()
            .flat_map(|language| {
                let language_id = Id::new(&language.name);
                language
                    .objects
                    .iter()
                    .map(move |object| (Id::new(&object.name), (language_id, object)))
            })
            .collect();
        for name in state.order.clone() {
            if object_defs.contains_key(&name) {
                state.build_object(name, &object_defs, &mut HashSet::new())?;
            }
        }

        let types = state.finish();
        info!(
            languages = languages.len(),
            types = types.len();
            "Metamodel catalog built"
        );

        Ok(Catalog {
            languages,
            types,
            builtins,
        })
    }
}

#[derive(Debug, Default)]
struct BuildState {
    /// Declaration order of every type name.
    order: Vec<Id>,
    kinds: HashMap<Id, DeclaredKind>,
    enums: HashMap<Id, Rc<EnumType>>,
    records: HashMap<Id, Rc<RecordType>>,
    objects: HashMap<Id, Rc<ObjectType>>,
}

impl BuildState {
    fn declare(&mut self, name: &str, kind: DeclaredKind) -> Result<(), CatalogError> {
        let id = Id::new(name);
        if self.kinds.insert(id, kind).is_some() {
            return Err(CatalogError::DuplicateType(name.to_string()));
        }
        self.order.push(id);
        Ok(())
    }

    fn build_slot(&self, owner: &str, def: &SlotDef) -> Result<Slot, CatalogError> {
        let ty = Id::new(&def.ty);
        let kind = self
            .kinds
            .get(&ty)
            .copied()
            .ok_or_else(|| CatalogError::UnknownType {
                owner: owner.to_string(),
                feature: def.name.clone(),
                target: def.ty.clone(),
            })?;
        if kind == DeclaredKind::Object {
            return Err(CatalogError::InvalidFeatureType {
                owner: owner.to_string(),
                feature: def.name.clone(),
                expected: "a primitive, enumerated or record type",
                target: def.ty.clone(),
            });
        }

        let default = match &def.default {
            None => Value::Null,
            Some(value) => self.default_value(kind, ty, value).map_err(|reason| {
                CatalogError::InvalidDefault {
                    owner: owner.to_string(),
                    slot: def.name.clone(),
                    reason,
                }
            })?,
        };

        Ok(Slot::new(
            Id::new(&def.name),
            ty,
            def.required,
            def.many,
            default,
        ))
    }

    fn default_value(
        &self,
        kind: DeclaredKind,
        ty: Id,
        value: &DefaultValue,
    ) -> Result<Value, String> {
        match (kind, value) {
            (DeclaredKind::Primitive(PrimitiveKind::Integer), DefaultValue::Integer(v)) => {
                Ok(Value::Integer(*v))
            }
            (DeclaredKind::Primitive(PrimitiveKind::Decimal), DefaultValue::Decimal(v)) => {
                Ok(Value::Decimal(*v))
            }
            (DeclaredKind::Primitive(PrimitiveKind::Decimal), DefaultValue::Integer(v)) => {
                Ok(Value::Decimal(*v as f64))
            }
            (DeclaredKind::Primitive(PrimitiveKind::Boolean), DefaultValue::Boolean(v)) => {
                Ok(Value::Boolean(*v))
            }
            (
                DeclaredKind::Primitive(PrimitiveKind::String | PrimitiveKind::Other),
                DefaultValue::Text(v),
            ) => Ok(Value::String(v.clone())),
            (DeclaredKind::Enumerated, DefaultValue::Text(v)) => self
                .enums
                .get(&ty)
                .and_then(|enumeration| enumeration.literal(v))
                .map(Value::Enum)
                .ok_or_else(|| format!("`{v}` is not a literal of `{ty}`")),
            (DeclaredKind::Record, _) => Err("record slots cannot declare a default".to_string()),
            (_, value) => Err(format!("{value:?} does not match type `{ty}`")),
        }
    }

    fn check_object_target(&self, owner: &str, def: &FeatureDef) -> Result<Id, CatalogError> {
        let target = Id::new(&def.target);
        match self.kinds.get(&target) {
            Some(DeclaredKind::Object) => Ok(target),
            Some(_) => Err(CatalogError::InvalidFeatureType {
                owner: owner.to_string(),
                feature: def.name.clone(),
                expected: "an object type",
                target: def.target.clone(),
            }),
            None => Err(CatalogError::UnknownType {
                owner: owner.to_string(),
                feature: def.name.clone(),
                target: def.target.clone(),
            }),
        }
    }

    /// Builds `name` after all of its supertypes, flattening inherited
    /// features. `visiting` holds the types on the current inheritance path.
    fn build_object(
        &mut self,
        name: Id,
        defs: &HashMap<Id, (Id, &ObjectDef)>,
        visiting: &mut HashSet<Id>,
    ) -> Result<Rc<ObjectType>, CatalogError> {
        if let Some(built) = self.objects.get(&name) {
            return Ok(Rc::clone(built));
        }
        let Some(&(language, def)) = defs.get(&name) else {
            return Err(CatalogError::InheritanceCycle(name.as_string()));
        };
        if !visiting.insert(name) {
            return Err(CatalogError::InheritanceCycle(def.name.clone()));
        }

        let mut supertypes: Vec<Id> = Vec::new();
        let mut slots: Vec<Slot> = Vec::new();
        let mut compositions: Vec<Composition> = Vec::new();
        let mut references: Vec<Reference> = Vec::new();

        for supertype_name in &def.extends {
            let supertype_id = Id::new(supertype_name);
            if !defs.contains_key(&supertype_id) {
                return Err(CatalogError::UnknownSupertype {
                    ty: def.name.clone(),
                    supertype: supertype_name.clone(),
                });
            }
            let supertype = self.build_object(supertype_id, defs, visiting)?;
            for ancestor in std::iter::once(supertype.name()).chain(supertype.supertypes().iter().copied()) {
                if !supertypes.contains(&ancestor) {
                    supertypes.push(ancestor);
                }
            }
            merge_features(&mut slots, supertype.slots(), Slot::name);
            merge_features(&mut compositions, supertype.compositions(), Composition::name);
            merge_features(&mut references, supertype.references(), Reference::name);
        }

        let own_slots = def
            .slots
            .iter()
            .map(|slot| self.build_slot(&def.name, slot))
            .collect::<Result<Vec<_>, _>>()?;
        merge_features(&mut slots, &own_slots, Slot::name);

        let own_compositions = def
            .compositions
            .iter()
            .map(|feature| {
                let target = self.check_object_target(&def.name, feature)?;
                Ok(Composition::new(
                    Id::new(&feature.name),
                    target,
                    feature.required,
                    feature.many,
                ))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        merge_features(&mut compositions, &own_compositions, Composition::name);

        let own_references = def
            .references
            .iter()
            .map(|feature| {
                let target = self.check_object_target(&def.name, feature)?;
                Ok(Reference::new(
                    Id::new(&feature.name),
                    target,
                    feature.required,
                    feature.many,
                ))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        merge_features(&mut references, &own_references, Reference::name);

        visiting.remove(&name);

        let object = Rc::new(ObjectType {
            name,
            language,
            is_abstract: def.is_abstract,
            is_root: def.root,
            supertypes,
            slots,
            compositions,
            references,
        });
        debug!(
            ty = def.name.as_str(),
            slots = object.slots().len(),
            compositions = object.compositions().len(),
            references = object.references().len();
            "Object type built"
        );
        self.objects.insert(name, Rc::clone(&object));
        Ok(object)
    }

    fn finish(mut self) -> IndexMap<Id, TypeDescriptor> {
        let mut types = IndexMap::with_capacity(self.order.len());
        for name in self.order {
            let descriptor = match self.kinds[&name] {
                DeclaredKind::Primitive(kind) => {
                    TypeDescriptor::Primitive(PrimitiveType::new(name, kind))
                }
                DeclaredKind::Enumerated => match self.enums.remove(&name) {
                    Some(ty) => TypeDescriptor::Enumerated(ty),
                    None => continue,
                },
                DeclaredKind::Record => match self.records.remove(&name) {
                    Some(ty) => TypeDescriptor::Record(ty),
                    None => continue,
                },
                DeclaredKind::Object => match self.objects.remove(&name) {
                    Some(ty) => TypeDescriptor::Object(ty),
                    None => continue,
                },
            };
            types.insert(name, descriptor);
        }
        types
    }
}

/// Appends `features` to `into`, replacing inherited entries of the same name
/// in place.
fn merge_features<F: Clone>(into: &mut Vec<F>, features: &[F], name: impl Fn(&F) -> Id) {
    for feature in features {
        match into.iter().position(|existing| name(existing) == name(feature)) {
            Some(index) => into[index] = feature.clone(),
            None => into.push(feature.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::{EnumDef, RecordDef};

    fn ui_language() -> LanguageDef {
        LanguageDef::new("UI")
            .enumeration(EnumDef::new("Layout", ["horizontal", "vertical"]))
            .record(
                RecordDef::new("Color")
                    .slot(SlotDef::new("red", "Integer"))
                    .slot(SlotDef::new("green", "Integer").default_value(7_i64))
                    .slot(SlotDef::new("blue", "Integer")),
            )
            .object(
                ObjectDef::new("Widget")
                    .abstract_type()
                    .slot(SlotDef::new("visible", "Boolean").default_value(true))
                    .slot(SlotDef::new("layout", "Layout").default_value("vertical")),
            )
            .object(
                ObjectDef::new("Screen")
                    .extends("Widget")
                    .slot(SlotDef::new("background", "Color"))
                    .composition(FeatureDef::new("widgets", "Widget").many()),
            )
            .object(
                ObjectDef::new("Application")
                    .root()
                    .composition(FeatureDef::new("screens", "Screen").many())
                    .reference(FeatureDef::new("home", "Screen")),
            )
    }

    #[test]
    fn test_language_gating() {
        let catalog = Catalog::builder().language(ui_language()).build().unwrap();
        let empty = LanguageSet::new();
        let ui: LanguageSet = [Id::new("UI")].into_iter().collect();

        assert!(catalog.resolve_type(Id::new("Screen"), &empty).is_none());
        assert!(catalog.resolve_type(Id::new("Screen"), &ui).is_some());
        assert!(catalog.resolve_type(Id::new("Integer"), &ui).is_none());
        assert!(catalog.descriptor(Id::new("Integer")).is_some());
        assert!(catalog.enumerate(&empty).is_empty());
        assert_eq!(catalog.enumerate(&ui).len(), 5);
    }

    #[test]
    fn test_inherited_features_are_flattened() {
        let catalog = Catalog::builder().language(ui_language()).build().unwrap();
        let Some(TypeDescriptor::Object(screen)) = catalog.descriptor(Id::new("Screen")) else {
            panic!("Screen should be an object type");
        };

        assert_eq!(screen.supertypes(), &[Id::new("Widget")]);
        assert!(screen.conforms_to(Id::new("Widget")));
        assert!(!screen.conforms_to(Id::new("Application")));
        let names: Vec<String> = screen.slots().iter().map(|s| s.name().as_string()).collect();
        assert_eq!(names, vec!["visible", "layout", "background"]);
        assert_eq!(
            screen.slot("layout").unwrap().default_value(),
            &Value::Enum(Id::new("vertical"))
        );
    }

    #[test]
    fn test_abstract_and_root_flags() {
        let catalog = Catalog::builder().language(ui_language()).build().unwrap();
        let Some(TypeDescriptor::Object(widget)) = catalog.descriptor(Id::new("Widget")) else {
            panic!("Widget should be an object type");
        };
        let Some(TypeDescriptor::Object(app)) = catalog.descriptor(Id::new("Application")) else {
            panic!("Application should be an object type");
        };
        assert!(!widget.is_instantiable());
        assert!(app.is_root());
        assert!(app.reference("home").is_some());
        assert!(app.composition("screens").unwrap().is_many());
    }

    #[test]
    fn test_unknown_target_type() {
        let result = Catalog::builder()
            .language(
                LanguageDef::new("UI")
                    .object(ObjectDef::new("A").reference(FeatureDef::new("b", "Missing"))),
            )
            .build();
        assert!(matches!(result, Err(CatalogError::UnknownType { .. })));
    }

    #[test]
    fn test_composition_must_target_object() {
        let result = Catalog::builder()
            .language(
                LanguageDef::new("UI")
                    .object(ObjectDef::new("A").composition(FeatureDef::new("n", "Integer"))),
            )
            .build();
        assert!(matches!(result, Err(CatalogError::InvalidFeatureType { .. })));
    }

    #[test]
    fn test_inheritance_cycle() {
        let result = Catalog::builder()
            .language(
                LanguageDef::new("UI")
                    .object(ObjectDef::new("A").extends("B"))
                    .object(ObjectDef::new("B").extends("A")),
            )
            .build();
        assert!(matches!(result, Err(CatalogError::InheritanceCycle(_))));
    }

    #[test]
    fn test_duplicate_type() {
        let result = Catalog::builder()
            .language(LanguageDef::new("UI").object(ObjectDef::new("A")))
            .language(LanguageDef::new("Data").object(ObjectDef::new("A")))
            .build();
        assert!(matches!(result, Err(CatalogError::DuplicateType(name)) if name == "A"));
    }

    #[test]
    fn test_invalid_enum_default() {
        let result = Catalog::builder()
            .language(
                LanguageDef::new("UI")
                    .enumeration(EnumDef::new("Layout", ["horizontal"]))
                    .object(
                        ObjectDef::new("A").slot(SlotDef::new("l", "Layout").default_value("diagonal")),
                    ),
            )
            .build();
        assert!(matches!(result, Err(CatalogError::InvalidDefault { .. })));
    }

    #[test]
    fn test_builtin_sources() {
        let catalog = Catalog::builder()
            .language(LanguageDef::new("UI").builtin("ui.prelude", "language UI"))
            .build()
            .unwrap();
        assert_eq!(
            catalog.built_in_sources().fetch("ui.prelude").as_deref(),
            Some("language UI")
        );
        assert_eq!(catalog.built_in_sources().names(), vec!["ui.prelude".to_string()]);
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[languages]]
            name = "Data"

            [[languages.objects]]
            name = "Entity"
            slots = [{ name = "table", type = "String", default = "t" }]
            "#,
        )
        .unwrap();
        assert!(catalog.has_language(Id::new("Data")));
        let data: LanguageSet = [Id::new("Data")].into_iter().collect();
        let Some(TypeDescriptor::Object(entity)) = catalog.resolve_type(Id::new("Entity"), &data)
        else {
            panic!("Entity should resolve");
        };
        assert_eq!(
            entity.slot("table").unwrap().default_value(),
            &Value::String("t".to_string())
        );
    }
}
