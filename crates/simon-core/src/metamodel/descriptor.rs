//! Type and feature descriptors.
//!
//! Descriptors are immutable once a [`Catalog`](super::Catalog) is built.
//! Features refer to their target type by name; the full descriptor is
//! obtained through [`Metamodel::descriptor`](super::Metamodel::descriptor).

use std::{fmt, rc::Rc};

use serde::Deserialize;

use crate::{identifier::Id, value::Value};

/// Kind of a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Integer,
    Decimal,
    Boolean,
    String,
    /// Any other basic type; values are kept as text.
    Other,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Integer => write!(f, "integer"),
            PrimitiveKind::Decimal => write!(f, "decimal"),
            PrimitiveKind::Boolean => write!(f, "boolean"),
            PrimitiveKind::String => write!(f, "string"),
            PrimitiveKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveType {
    name: Id,
    kind: PrimitiveKind,
}

impl PrimitiveType {
    pub fn new(name: Id, kind: PrimitiveKind) -> Self {
        Self { name, kind }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

/// An enumerated type with named literals.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    name: Id,
    language: Id,
    literals: Vec<Id>,
}

impl EnumType {
    pub fn new(name: Id, language: Id, literals: Vec<Id>) -> Self {
        Self {
            name,
            language,
            literals,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn language(&self) -> Id {
        self.language
    }

    pub fn literals(&self) -> &[Id] {
        &self.literals
    }

    /// Looks up a literal by name.
    pub fn literal(&self, name: &str) -> Option<Id> {
        self.literals.iter().copied().find(|literal| *literal == name)
    }
}

/// A basic-valued attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    name: Id,
    ty: Id,
    required: bool,
    many: bool,
    default: Value,
}

impl Slot {
    pub fn new(name: Id, ty: Id, required: bool, many: bool, default: Value) -> Self {
        Self {
            name,
            ty,
            required,
            many,
            default,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// Name of the slot's basic type (primitive, enumerated or record).
    pub fn ty(&self) -> Id {
        self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_many(&self) -> bool {
        self.many
    }

    /// The value reported for this slot while it is unset.
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// An owning, containment-typed feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition {
    name: Id,
    target: Id,
    required: bool,
    many: bool,
}

impl Composition {
    pub fn new(name: Id, target: Id, required: bool, many: bool) -> Self {
        Self {
            name,
            target,
            required,
            many,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_many(&self) -> bool {
        self.many
    }
}

/// A non-owning, name-resolved feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    name: Id,
    target: Id,
    required: bool,
    many: bool,
}

impl Reference {
    pub fn new(name: Id, target: Id, required: bool, many: bool) -> Self {
        Self {
            name,
            target,
            required,
            many,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_many(&self) -> bool {
        self.many
    }
}

/// An object type. Features are flattened: inherited slots, compositions and
/// references are listed ahead of the type's own.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub(crate) name: Id,
    pub(crate) language: Id,
    pub(crate) is_abstract: bool,
    pub(crate) is_root: bool,
    pub(crate) supertypes: Vec<Id>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) compositions: Vec<Composition>,
    pub(crate) references: Vec<Reference>,
}

impl ObjectType {
    pub fn name(&self) -> Id {
        self.name
    }

    pub fn language(&self) -> Id {
        self.language
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_instantiable(&self) -> bool {
        !self.is_abstract
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// All transitive supertypes, nearest first.
    pub fn supertypes(&self) -> &[Id] {
        &self.supertypes
    }

    /// Returns `true` if an instance of this type may stand where `target`
    /// is expected.
    pub fn conforms_to(&self, target: Id) -> bool {
        self.name == target || self.supertypes.contains(&target)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn composition(&self, name: &str) -> Option<&Composition> {
        self.compositions.iter().find(|c| c.name == name)
    }

    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.references.iter().find(|r| r.name == name)
    }
}

/// A slot-only value type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub(crate) name: Id,
    pub(crate) language: Id,
    pub(crate) slots: Vec<Slot>,
}

impl RecordType {
    pub fn name(&self) -> Id {
        self.name
    }

    pub fn language(&self) -> Id {
        self.language
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }
}

/// A type that exposes named slots: an object type or a record type.
#[derive(Debug, Clone, PartialEq)]
pub enum Slotted {
    Object(Rc<ObjectType>),
    Record(Rc<RecordType>),
}

impl Slotted {
    pub fn name(&self) -> Id {
        match self {
            Slotted::Object(ty) => ty.name(),
            Slotted::Record(ty) => ty.name(),
        }
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        match self {
            Slotted::Object(ty) => ty.slot(name),
            Slotted::Record(ty) => ty.slot(name),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        match self {
            Slotted::Object(ty) => ty.slots(),
            Slotted::Record(ty) => ty.slots(),
        }
    }

    pub fn as_object(&self) -> Option<&Rc<ObjectType>> {
        match self {
            Slotted::Object(ty) => Some(ty),
            Slotted::Record(_) => None,
        }
    }

    /// Returns `true` if an instance may stand where `target` is expected.
    pub fn conforms_to(&self, target: Id) -> bool {
        match self {
            Slotted::Object(ty) => ty.conforms_to(target),
            Slotted::Record(ty) => ty.name() == target,
        }
    }
}

/// Any type known to a metamodel.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Object(Rc<ObjectType>),
    Record(Rc<RecordType>),
    Primitive(PrimitiveType),
    Enumerated(Rc<EnumType>),
}

impl TypeDescriptor {
    pub fn name(&self) -> Id {
        match self {
            TypeDescriptor::Object(ty) => ty.name(),
            TypeDescriptor::Record(ty) => ty.name(),
            TypeDescriptor::Primitive(ty) => ty.name(),
            TypeDescriptor::Enumerated(ty) => ty.name(),
        }
    }

    /// The declaring language; primitives belong to no language.
    pub fn language(&self) -> Option<Id> {
        match self {
            TypeDescriptor::Object(ty) => Some(ty.language()),
            TypeDescriptor::Record(ty) => Some(ty.language()),
            TypeDescriptor::Primitive(_) => None,
            TypeDescriptor::Enumerated(ty) => Some(ty.language()),
        }
    }

    /// Returns the slotted view of object and record types.
    pub fn to_slotted(&self) -> Option<Slotted> {
        match self {
            TypeDescriptor::Object(ty) => Some(Slotted::Object(Rc::clone(ty))),
            TypeDescriptor::Record(ty) => Some(Slotted::Record(Rc::clone(ty))),
            _ => None,
        }
    }

    /// Short human-readable kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Object(_) => "object type",
            TypeDescriptor::Record(_) => "record type",
            TypeDescriptor::Primitive(_) => "primitive type",
            TypeDescriptor::Enumerated(_) => "enumerated type",
        }
    }
}
