//! The stack of objects under construction.

use simon_core::{backend::ObjectId, metamodel::Slotted};
use simon_parser::Spanned;

/// An object (or record literal) under construction.
#[derive(Debug, Clone)]
pub(crate) struct ElementInfo {
    object: ObjectId,
    ty: Slotted,
    modifiers: Vec<Spanned<String>>,
}

impl ElementInfo {
    pub fn new(object: ObjectId, ty: Slotted, modifiers: Vec<Spanned<String>>) -> Self {
        Self {
            object,
            ty,
            modifiers,
        }
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn ty(&self) -> &Slotted {
        &self.ty
    }

    /// Removes the pending modifiers so each is applied once.
    pub fn take_modifiers(&mut self) -> Vec<Spanned<String>> {
        std::mem::take(&mut self.modifiers)
    }
}

/// LIFO stack of [`ElementInfo`]s for one unit.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    entries: Vec<ElementInfo>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ElementInfo) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<ElementInfo> {
        self.entries.pop()
    }

    /// Pops the top `count` entries, returned in the order they were pushed.
    ///
    /// Returns `None` and leaves the stack untouched if it holds fewer than
    /// `count` entries.
    pub fn pop_many(&mut self, count: usize) -> Option<Vec<ElementInfo>> {
        let split = self.entries.len().checked_sub(count)?;
        Some(self.entries.split_off(split))
    }

    pub fn current(&self) -> Option<&ElementInfo> {
        self.entries.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut ElementInfo> {
        self.entries.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use simon_core::{
        identifier::Id,
        metamodel::{Catalog, LanguageDef, Metamodel, ObjectDef},
    };
    use simon_parser::Span;

    use super::*;

    fn panel_type() -> Slotted {
        let catalog = Catalog::builder()
            .language(LanguageDef::new("UI").object(ObjectDef::new("Panel")))
            .build()
            .unwrap();
        catalog
            .descriptor(Id::new("Panel"))
            .and_then(|ty| ty.to_slotted())
            .expect("Panel should be slotted")
    }

    fn entry(index: usize) -> ElementInfo {
        ElementInfo::new(ObjectId::new(index), panel_type(), Vec::new())
    }

    #[test]
    fn test_pop_many_restores_declaration_order() {
        let mut stack = ScopeStack::new();
        for index in 0..4 {
            stack.push(entry(index));
        }

        let popped = stack.pop_many(3).unwrap();
        let ids: Vec<usize> = popped.iter().map(|e| e.object().index()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().unwrap().object(), ObjectId::new(0));
    }

    #[test]
    fn test_pop_many_underflow_keeps_stack() {
        let mut stack = ScopeStack::new();
        stack.push(entry(0));
        assert!(stack.pop_many(2).is_none());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop_many(0).unwrap().len(), 0);
    }

    #[test]
    fn test_modifiers_are_taken_once() {
        let modifiers = vec![Spanned::new("main".to_string(), Span::new(1..5))];
        let mut info = ElementInfo::new(ObjectId::new(0), panel_type(), modifiers);
        assert_eq!(info.take_modifiers().len(), 1);
        assert!(info.take_modifiers().is_empty());
    }
}
