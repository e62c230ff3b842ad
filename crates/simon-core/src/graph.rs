//! Arena-backed object graph.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use log::trace;

use crate::{
    backend::{Backend, BackendError, ObjectId},
    identifier::Id,
    metamodel::{Composition, Reference, Slot, Slotted},
    value::Value,
};

#[derive(Debug, Clone)]
struct Node {
    ty: Slotted,
    name: Option<String>,
    /// Containing object and the composition holding this node.
    parent: Option<(ObjectId, Id)>,
    slots: IndexMap<Id, Vec<Value>>,
    compositions: IndexMap<Id, Vec<ObjectId>>,
    references: IndexMap<Id, Vec<ObjectId>>,
    /// Contained objects across all compositions, in attachment order.
    contained: Vec<ObjectId>,
}

impl Node {
    fn new(ty: Slotted) -> Self {
        Self {
            ty,
            name: None,
            parent: None,
            slots: IndexMap::new(),
            compositions: IndexMap::new(),
            references: IndexMap::new(),
            contained: Vec::new(),
        }
    }
}

/// A [`Backend`] that keeps every object in one arena.
///
/// Objects are never freed; containment is an exclusive parent edge and
/// references are plain ids.
#[derive(Debug, Clone, Default)]
pub struct ModelGraph {
    nodes: Vec<Node>,
    roots: Vec<ObjectId>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, object: ObjectId) -> Result<&Node, BackendError> {
        self.nodes
            .get(object.index())
            .ok_or(BackendError::UnknownObject(object))
    }

    fn node_mut(&mut self, object: ObjectId) -> Result<&mut Node, BackendError> {
        self.nodes
            .get_mut(object.index())
            .ok_or(BackendError::UnknownObject(object))
    }

    /// Name of the object's type.
    pub fn type_name(&self, object: ObjectId) -> Option<Id> {
        self.nodes.get(object.index()).map(|node| node.ty.name())
    }

    /// Type of the object.
    pub fn type_of(&self, object: ObjectId) -> Option<&Slotted> {
        self.nodes.get(object.index()).map(|node| &node.ty)
    }

    /// The first value of a slot, or the slot's declared default while unset.
    pub fn value(&self, object: ObjectId, slot: &str) -> Option<&Value> {
        let node = self.nodes.get(object.index())?;
        let descriptor = node.ty.slot(slot)?;
        node.slots
            .get(&descriptor.name())
            .and_then(|values| values.first())
            .or(Some(descriptor.default_value()))
    }

    /// All values assigned to a slot.
    pub fn values(&self, object: ObjectId, slot: &str) -> &[Value] {
        self.nodes
            .get(object.index())
            .and_then(|node| node.slots.get(&Id::new(slot)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first target of a reference, or `None` while it is unset.
    pub fn linked(&self, object: ObjectId, reference: &str) -> Option<ObjectId> {
        self.linked_all(object, reference).first().copied()
    }

    /// All targets of a reference.
    pub fn linked_all(&self, object: ObjectId, reference: &str) -> &[ObjectId] {
        self.nodes
            .get(object.index())
            .and_then(|node| node.references.get(&Id::new(reference)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Children held by one composition, in attachment order.
    pub fn children_of(&self, object: ObjectId, composition: &str) -> &[ObjectId] {
        self.nodes
            .get(object.index())
            .and_then(|node| node.compositions.get(&Id::new(composition)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Renders `object` and everything it contains as an indented tree.
    ///
    /// ```text
    /// Application myApp
    ///   title = "Demo"
    ///   home -> welcome
    ///   screens:
    ///     Screen welcome
    /// ```
    pub fn render_tree(&self, object: ObjectId) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_tree(&mut out, object, 0);
        out
    }

    fn write_tree(&self, out: &mut String, object: ObjectId, depth: usize) -> fmt::Result {
        let Some(node) = self.nodes.get(object.index()) else {
            return Ok(());
        };
        let indent = "  ".repeat(depth);
        match &node.name {
            Some(name) => writeln!(out, "{indent}{} {name}", node.ty.name())?,
            None => writeln!(out, "{indent}{}", node.ty.name())?,
        }

        for (slot, values) in &node.slots {
            for value in values {
                match value {
                    Value::Record(record) => {
                        writeln!(out, "{indent}  {slot} =")?;
                        self.write_tree(out, *record, depth + 2)?;
                    }
                    value => writeln!(out, "{indent}  {slot} = {value}")?,
                }
            }
        }
        for (reference, targets) in &node.references {
            for target in targets {
                let label = self
                    .get_name(*target)
                    .map_or_else(|| format!("#{target}"), str::to_string);
                writeln!(out, "{indent}  {reference} -> {label}")?;
            }
        }
        for (composition, children) in &node.compositions {
            writeln!(out, "{indent}  {composition}:")?;
            for child in children {
                self.write_tree(out, *child, depth + 2)?;
            }
        }
        Ok(())
    }
}

impl Backend for ModelGraph {
    fn instantiate(&mut self, is_root: bool, ty: &Slotted) -> ObjectId {
        let id = ObjectId::new(self.nodes.len());
        self.nodes.push(Node::new(ty.clone()));
        if is_root {
            self.roots.push(id);
        }
        trace!(
            object = id.index(),
            ty = ty.name().as_string(),
            is_root = is_root;
            "Instantiated object"
        );
        id
    }

    fn set_name(&mut self, object: ObjectId, name: &str) -> Result<(), BackendError> {
        self.node_mut(object)?.name = Some(name.to_string());
        Ok(())
    }

    fn get_name(&self, object: ObjectId) -> Option<&str> {
        self.nodes.get(object.index())?.name.as_deref()
    }

    fn set_value(
        &mut self,
        slot: &Slot,
        object: ObjectId,
        value: Value,
    ) -> Result<(), BackendError> {
        let node = self.node_mut(object)?;
        let values = node.slots.entry(slot.name()).or_default();
        if slot.is_many() {
            values.push(value);
        } else {
            *values = vec![value];
        }
        Ok(())
    }

    fn link(
        &mut self,
        reference: &Reference,
        from: ObjectId,
        to: ObjectId,
    ) -> Result<(), BackendError> {
        let target = self.node(to)?;
        if !target.ty.conforms_to(reference.target()) {
            return Err(BackendError::TypeMismatch {
                feature: reference.name(),
                expected: reference.target(),
                found: target.ty.name(),
            });
        }

        let node = self.node_mut(from)?;
        let targets = node.references.entry(reference.name()).or_default();
        if !reference.is_many() && !targets.is_empty() {
            return Err(BackendError::MultiplicityViolation {
                feature: reference.name(),
            });
        }
        targets.push(to);
        Ok(())
    }

    fn add_child(
        &mut self,
        composition: &Composition,
        parent: ObjectId,
        child: ObjectId,
    ) -> Result<(), BackendError> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if child_node.parent.is_some() {
            return Err(BackendError::AlreadyContained(child));
        }
        if !child_node.ty.conforms_to(composition.target()) {
            return Err(BackendError::TypeMismatch {
                feature: composition.name(),
                expected: composition.target(),
                found: child_node.ty.name(),
            });
        }

        let node = self.node_mut(parent)?;
        let children = node.compositions.entry(composition.name()).or_default();
        if !composition.is_many() && !children.is_empty() {
            return Err(BackendError::MultiplicityViolation {
                feature: composition.name(),
            });
        }
        children.push(child);
        node.contained.push(child);
        self.node_mut(child)?.parent = Some((parent, composition.name()));
        Ok(())
    }

    fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.nodes
            .get(object.index())?
            .parent
            .map(|(parent, _)| parent)
    }

    fn children(&self, object: ObjectId) -> Vec<ObjectId> {
        self.nodes
            .get(object.index())
            .map(|node| node.contained.clone())
            .unwrap_or_default()
    }

    fn roots(&self) -> Vec<ObjectId> {
        self.roots.clone()
    }
}
