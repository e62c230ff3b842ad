//! The storage interface the compiler builds models through.

use std::fmt;

use thiserror::Error;

use crate::{
    identifier::Id,
    metamodel::{Composition, Reference, Slot, Slotted},
    value::Value,
};

/// Handle of a model object owned by a [`Backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures of backend operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// The target type of a feature rejects the given object.
    #[error("`{feature}` expects an instance of `{expected}`, found `{found}`")]
    TypeMismatch { feature: Id, expected: Id, found: Id },

    /// A second value was added to a single-valued feature.
    #[error("`{feature}` holds a single value and is already set")]
    MultiplicityViolation { feature: Id },

    /// The object is already contained by another parent.
    #[error("object {0} is already contained by another object")]
    AlreadyContained(ObjectId),

    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
}

/// Primitive operations used to construct a model.
///
/// Name lookup is provided on top of the hierarchy accessors
/// ([`parent`](Backend::parent), [`children`](Backend::children),
/// [`roots`](Backend::roots)); a backend only overrides
/// [`resolve_name`](Backend::resolve_name) when it can search faster.
pub trait Backend {
    /// Creates an instance of `ty`. Root instances are owned by the session.
    fn instantiate(&mut self, is_root: bool, ty: &Slotted) -> ObjectId;

    fn set_name(&mut self, object: ObjectId, name: &str) -> Result<(), BackendError>;

    fn get_name(&self, object: ObjectId) -> Option<&str>;

    /// Assigns a slot. Multi-valued slots accumulate values.
    fn set_value(&mut self, slot: &Slot, object: ObjectId, value: Value)
    -> Result<(), BackendError>;

    fn link(&mut self, reference: &Reference, from: ObjectId, to: ObjectId)
    -> Result<(), BackendError>;

    fn add_child(
        &mut self,
        composition: &Composition,
        parent: ObjectId,
        child: ObjectId,
    ) -> Result<(), BackendError>;

    /// The containing object, or `None` for roots and detached objects.
    fn parent(&self, object: ObjectId) -> Option<ObjectId>;

    /// Directly contained objects, in attachment order.
    fn children(&self, object: ObjectId) -> Vec<ObjectId>;

    /// Root objects of the session, in creation order.
    fn roots(&self) -> Vec<ObjectId>;

    /// Resolves a dotted path from `scope`.
    ///
    /// The first component is searched on `scope` and its children, then on
    /// each ancestor and its children, then among the session roots. Every
    /// further component must name a direct child of the previous match.
    fn resolve_name(&self, scope: ObjectId, path: &[&str]) -> Option<ObjectId> {
        let (first, rest) = path.split_first()?;

        let mut found = None;
        let mut current = Some(scope);
        while let Some(object) = current {
            if self.get_name(object) == Some(*first) {
                found = Some(object);
                break;
            }
            if let Some(child) = self.child_named(object, first) {
                found = Some(child);
                break;
            }
            current = self.parent(object);
        }

        let mut resolved = match found {
            Some(object) => object,
            None => self
                .roots()
                .into_iter()
                .find(|root| self.get_name(*root) == Some(*first))?,
        };

        for component in rest {
            resolved = self.child_named(resolved, component)?;
        }
        Some(resolved)
    }

    /// First direct child of `object` named `name`.
    fn child_named(&self, object: ObjectId, name: &str) -> Option<ObjectId> {
        self.children(object)
            .into_iter()
            .find(|child| self.get_name(*child) == Some(name))
    }

    /// Runs `body` as one backend session.
    fn run_session<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        body(self)
    }
}
