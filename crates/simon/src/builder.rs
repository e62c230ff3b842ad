//! Scope-stack construction of model objects.
//!
//! The builder consumes the construction events of one unit strictly left
//! to right. Every element or record literal that starts is pushed as an
//! [`ElementInfo`]; slot assignments and link statements target the top of
//! the stack. Children of a containment block stay on the stack until the
//! block closes, then are popped in declaration order and attached to the
//! parent.
//!
//! Immediate operations (instantiation, slot values, containment) go
//! straight to the backend. Link statements are deferred to the resolution
//! pass as [`Deferred`] requests.
//!
//! A fatal diagnostic aborts the rest of the unit. Error and warning
//! diagnostics are reported and construction continues.

use std::{mem, rc::Rc};

use log::{debug, info, trace};

use simon_core::{
    backend::{Backend, ObjectId},
    identifier::Id,
    metamodel::{
        Composition, LanguageSet, Metamodel, ObjectType, PrimitiveKind, RecordType, Slot,
        Slotted, TypeDescriptor,
    },
    value::Value,
};
use simon_parser::{
    Event, LineIndex, Literal, RecordField, Span, Spanned,
    error::{Category, Diagnostic},
};

use crate::{
    diagnostics::{Problem, backend_failure},
    resolve::{Deferred, LinkRequest},
    scope::{ElementInfo, ScopeStack},
    session::Session,
};

/// What a finished unit hands back to the driver.
#[derive(Debug, Default)]
pub(crate) struct UnitOutcome {
    /// Top-level elements kept for the unit, in declaration order.
    pub roots: Vec<ObjectId>,
    /// Imported unit names, in declaration order.
    pub imports: Vec<String>,
}

/// The unit being built and the session it belongs to.
struct UnitContext<'u, B> {
    source: &'u str,
    lines: LineIndex<'u>,
    backend: &'u mut B,
    session: &'u mut Session,
}

impl<B> UnitContext<'_, B> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let problem = Problem::locate(self.source, &self.lines, diagnostic);
        self.session.report(problem);
    }

    /// Reports a recoverable diagnostic, or hands a fatal one back.
    fn recover(&mut self, result: Result<(), Diagnostic>) -> Result<(), Diagnostic> {
        match result {
            Err(diagnostic) if !diagnostic.severity().is_fatal() => {
                self.report(diagnostic);
                Ok(())
            }
            other => other,
        }
    }
}

/// Builds model objects for one unit at a time.
pub(crate) struct Builder<'m, M: ?Sized> {
    metamodel: &'m M,
    scopes: ScopeStack,
    languages: LanguageSet,
    modifiers: Vec<Spanned<String>>,
    imports: Vec<String>,
    roots: Vec<ObjectId>,
    in_unit: bool,
}

impl<'m, M: Metamodel + ?Sized> Builder<'m, M> {
    pub fn new(metamodel: &'m M) -> Self {
        Self {
            metamodel,
            scopes: ScopeStack::new(),
            languages: LanguageSet::new(),
            modifiers: Vec::new(),
            imports: Vec::new(),
            roots: Vec::new(),
            in_unit: false,
        }
    }

    /// Parses `text` and builds its elements through `backend`.
    ///
    /// Problems are reported to `session` under `source`. A syntax error
    /// produces no elements; any other fatal problem stops the unit where it
    /// occurred. Imports declared before that point are still returned.
    pub fn build_unit<B: Backend>(
        &mut self,
        source: &str,
        text: &str,
        backend: &mut B,
        session: &mut Session,
    ) -> UnitOutcome {
        self.begin_unit();
        info!(source = source; "Building unit");

        let mut unit = UnitContext {
            source,
            lines: LineIndex::new(text),
            backend,
            session,
        };

        match simon_parser::parse(text) {
            Ok(events) => {
                let mut completed = true;
                for event in events {
                    let result = self.handle(event, &mut unit);
                    if let Err(diagnostic) = unit.recover(result) {
                        debug!(
                            source = source,
                            message = diagnostic.message();
                            "Unit aborted"
                        );
                        unit.report(diagnostic);
                        completed = false;
                        break;
                    }
                }
                debug_assert!(
                    !completed || self.scopes.is_empty(),
                    "a completed unit leaves no open scopes"
                );
            }
            Err(err) => {
                debug!(source = source; "Syntax errors, unit skipped");
                for diagnostic in err.into_diagnostics() {
                    unit.report(diagnostic);
                }
            }
        }

        self.end_unit()
    }

    fn begin_unit(&mut self) {
        debug_assert!(!self.in_unit, "a unit is already being built");
        self.in_unit = true;
        self.languages.clear();
        self.scopes.clear();
        self.modifiers.clear();
    }

    fn end_unit(&mut self) -> UnitOutcome {
        // An aborted unit leaves its partial scopes behind.
        self.scopes.clear();
        self.modifiers.clear();
        self.in_unit = false;
        UnitOutcome {
            roots: mem::take(&mut self.roots),
            imports: mem::take(&mut self.imports),
        }
    }

    fn handle<B: Backend>(
        &mut self,
        event: Spanned<Event>,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        let span = event.span();
        trace!(event:? = event.inner(); "Construction event");

        match event.into_inner() {
            Event::Language(name) => {
                self.declare_language(&name, span, unit);
                Ok(())
            }
            Event::Import(name) => {
                if !self.imports.contains(&name) {
                    self.imports.push(name);
                }
                Ok(())
            }
            Event::Modifier(tag) => {
                self.modifiers.push(Spanned::new(tag, span));
                Ok(())
            }
            Event::ObjectStart { type_word, name } => self.start_element(&type_word, name, unit),
            Event::ObjectEnd => self.end_element(span, unit),
            Event::Slot { name, value } => self.assign(&name, &value, unit),
            Event::BlockStart { feature } => self.composition(&feature).map(|_| ()),
            Event::BlockEnd { feature, children } => {
                self.end_block(&feature, children, span, unit)
            }
            Event::Link { feature, path } => self.link(feature, path, span, unit),
        }
    }

    fn declare_language<B>(&mut self, name: &str, span: Span, unit: &mut UnitContext<'_, B>) {
        let language = Id::new(name);
        if !self.languages.insert(language) {
            return;
        }

        let alone: LanguageSet = [language].into_iter().collect();
        if self.metamodel.enumerate(&alone).is_empty() {
            unit.report(
                Diagnostic::warning(format!("Language `{name}` defines no types"))
                    .with_category(Category::UnknownElement)
                    .with_label(span, "unknown language"),
            );
        }
    }

    fn start_element<B: Backend>(
        &mut self,
        type_word: &Spanned<String>,
        name: Option<Spanned<String>>,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        let is_root = self.scopes.is_empty();
        if is_root && self.languages.is_empty() {
            return Err(Diagnostic::fatal("No languages defined")
                .with_category(Category::MissingElement)
                .with_label(type_word.span(), "element declared before any language")
                .with_help("declare a language first, for example `language UI`"));
        }

        let type_name = Id::capitalized(type_word.inner());
        let object_type = self.element_type(type_name, type_word.span())?;

        if is_root && !object_type.is_root() {
            unit.report(
                Diagnostic::warning(format!("`{type_name}` is not a root type"))
                    .with_label(type_word.span(), "declared at the top level"),
            );
        }

        // Session roots follow the type; the unit's roots follow nesting depth.
        let root_type = object_type.is_root();
        let ty = Slotted::Object(object_type);
        let object = unit.backend.instantiate(root_type, &ty);
        if let Some(name) = &name {
            unit.backend
                .set_name(object, name.inner())
                .map_err(|err| backend_failure(&err).with_label(name.span(), "named here"))?;
        }
        debug!(
            object = object.index(),
            ty = type_name.as_string(),
            name = name.as_ref().map_or("", |name| name.inner().as_str()),
            top_level = is_root,
            root_type = root_type;
            "Element started"
        );

        let modifiers = mem::take(&mut self.modifiers);
        self.scopes.push(ElementInfo::new(object, ty, modifiers));
        self.apply_modifiers(unit)
    }

    /// Resolves an element header to an instantiable object type.
    fn element_type(&self, type_name: Id, span: Span) -> Result<Rc<ObjectType>, Diagnostic> {
        let descriptor = self
            .metamodel
            .resolve_type(type_name, &self.languages)
            .ok_or_else(|| {
                Diagnostic::fatal(format!("Unknown element type `{type_name}`"))
                    .with_category(Category::UnknownElement)
                    .with_label(span, "not defined by the declared languages")
            })?;

        let kind = descriptor.kind_name();
        let TypeDescriptor::Object(object_type) = descriptor else {
            return Err(Diagnostic::fatal(format!(
                "`{type_name}` is a {kind}, not an element type"
            ))
            .with_category(Category::UnknownElement)
            .with_label(span, "cannot be declared as an element"));
        };

        if !object_type.is_instantiable() {
            return Err(Diagnostic::fatal(format!(
                "Cannot instantiate abstract element type `{type_name}`"
            ))
            .with_category(Category::AbstractElement)
            .with_label(span, "abstract type"));
        }
        Ok(object_type)
    }

    fn end_element<B: Backend>(
        &mut self,
        span: Span,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        // Nested elements stay open until their containment block closes.
        if self.scopes.depth() > 1 {
            return Ok(());
        }

        let Some(scope) = self.scopes.pop() else {
            return Err(internal("Element end without a matching start", span));
        };
        let object = scope.object();
        if unit.session.accepts_roots(unit.source) {
            debug!(source = unit.source, object = object.index(); "Root collected");
            self.roots.push(object);
        } else {
            debug!(
                source = unit.source,
                object = object.index();
                "Root dropped after fatal problem"
            );
        }
        Ok(())
    }

    fn apply_modifiers<B: Backend>(
        &mut self,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        let Some(scope) = self.scopes.current_mut() else {
            return Ok(());
        };
        let modifiers = scope.take_modifiers();
        let object = scope.object();
        let ty = scope.ty().clone();

        for modifier in &modifiers {
            let (slot, value) = self.modifier_assignment(&ty, modifier)?;
            trace!(modifier = modifier.inner().as_str(), slot = slot.name().as_string(); "Modifier applied");
            unit.backend
                .set_value(slot, object, value)
                .map_err(|err| backend_failure(&err).with_label(modifier.span(), "modifier"))?;
        }
        Ok(())
    }

    /// A modifier sets a boolean slot of the same name to `true`, or sets an
    /// enumerated slot to the literal of the same name.
    fn modifier_assignment<'t>(
        &self,
        ty: &'t Slotted,
        modifier: &Spanned<String>,
    ) -> Result<(&'t Slot, Value), Diagnostic> {
        let tag = modifier.inner().as_str();

        if let Some(slot) = ty.slot(tag) {
            match self.metamodel.descriptor(slot.ty()) {
                Some(TypeDescriptor::Primitive(primitive))
                    if primitive.kind() == PrimitiveKind::Boolean =>
                {
                    return Ok((slot, Value::Boolean(true)));
                }
                Some(TypeDescriptor::Enumerated(_)) => {}
                _ => {
                    return Err(internal(
                        format!(
                            "Modifier `{tag}` targets slot `{tag}` of type `{}`, which is neither boolean nor enumerated",
                            slot.ty()
                        ),
                        modifier.span(),
                    ));
                }
            }
        }

        for slot in ty.slots() {
            if let Some(TypeDescriptor::Enumerated(enumeration)) =
                self.metamodel.descriptor(slot.ty())
            {
                if let Some(literal) = enumeration.literal(tag) {
                    return Ok((slot, Value::Enum(literal)));
                }
            }
        }

        Err(Diagnostic::fatal(format!(
            "Modifier `{tag}` matches no boolean slot or enumerated literal of `{}`",
            ty.name()
        ))
        .with_category(Category::MissingFeature)
        .with_label(modifier.span(), "unknown modifier"))
    }

    /// Assigns a literal to a slot of the current scope.
    fn assign<B: Backend>(
        &mut self,
        name: &Spanned<String>,
        literal: &Spanned<Literal>,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        let Some(scope) = self.scopes.current() else {
            return Err(internal("Slot assignment outside of any element", name.span()));
        };
        let object = scope.object();
        let ty = scope.ty().clone();
        let Some(slot) = ty.slot(name.inner()) else {
            return Err(unknown_slot(&ty, name));
        };

        let value = self.literal_value(slot, literal, unit)?;
        trace!(slot = name.inner().as_str(), value = value.to_string(); "Slot assigned");
        unit.backend
            .set_value(slot, object, value)
            .map_err(|err| backend_failure(&err).with_label(name.span(), "assigned here"))
    }

    /// Converts a literal according to the slot's declared type.
    fn literal_value<B: Backend>(
        &mut self,
        slot: &Slot,
        literal: &Spanned<Literal>,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<Value, Diagnostic> {
        let Some(descriptor) = self.metamodel.descriptor(slot.ty()) else {
            return Err(internal(
                format!("Slot `{}` has unknown type `{}`", slot.name(), slot.ty()),
                literal.span(),
            ));
        };

        match (&descriptor, literal.inner()) {
            (TypeDescriptor::Primitive(primitive), value) => primitive_value(primitive.kind(), value)
                .ok_or_else(|| type_error(slot, &descriptor, literal)),
            (TypeDescriptor::Enumerated(enumeration), Literal::Identifier(name)) => {
                enumeration.literal(name).map(Value::Enum).ok_or_else(|| {
                    let expected: Vec<String> = enumeration
                        .literals()
                        .iter()
                        .map(|known| format!("`{known}`"))
                        .collect();
                    Diagnostic::error(format!(
                        "`{name}` is not a literal of `{}`",
                        enumeration.name()
                    ))
                    .with_category(Category::TypeError)
                    .with_label(literal.span(), "unknown literal")
                    .with_help(format!("expected one of {}", expected.join(", ")))
                })
            }
            (TypeDescriptor::Record(record), Literal::Record(fields)) => {
                self.record_value(Rc::clone(record), fields, unit)
            }
            _ => Err(type_error(slot, &descriptor, literal)),
        }
    }

    /// Builds a record literal in its own scope.
    fn record_value<B: Backend>(
        &mut self,
        record: Rc<RecordType>,
        fields: &[RecordField],
        unit: &mut UnitContext<'_, B>,
    ) -> Result<Value, Diagnostic> {
        let ty = Slotted::Record(record);
        let object = unit.backend.instantiate(false, &ty);
        self.scopes.push(ElementInfo::new(object, ty, Vec::new()));

        for field in fields {
            let result = self.assign(&field.name, &field.value, unit);
            unit.recover(result)?;
        }

        self.scopes.pop();
        Ok(Value::Record(object))
    }

    /// The composition named by a containment block on the current element.
    fn composition(&self, feature: &Spanned<String>) -> Result<(ObjectId, Composition), Diagnostic> {
        let (object, object_type) = self.current_element(feature)?;
        match object_type.composition(feature.inner()) {
            Some(composition) => Ok((object, *composition)),
            None => Err(missing_feature(&object_type, feature, "composition")),
        }
    }

    /// The current scope, which must be an element for features to apply.
    fn current_element(
        &self,
        feature: &Spanned<String>,
    ) -> Result<(ObjectId, Rc<ObjectType>), Diagnostic> {
        let Some(scope) = self.scopes.current() else {
            return Err(internal(
                format!("Feature `{}` used outside of any element", feature.inner()),
                feature.span(),
            ));
        };
        match scope.ty().as_object() {
            Some(object_type) => Ok((scope.object(), Rc::clone(object_type))),
            None => Err(Diagnostic::fatal(format!("`{}` admits no features", scope.ty().name()))
                .with_category(Category::ElementAdmitsNoFeatures)
                .with_label(feature.span(), "feature used here")),
        }
    }

    fn end_block<B: Backend>(
        &mut self,
        feature: &Spanned<String>,
        children: usize,
        span: Span,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        let Some(children) = self.scopes.pop_many(children) else {
            return Err(internal("Block closes more elements than it opened", span));
        };
        let (parent, composition) = self.composition(feature)?;

        for child in children {
            let result = unit
                .backend
                .add_child(&composition, parent, child.object())
                .map_err(|err| backend_failure(&err).with_label(feature.span(), "attached here"));
            unit.recover(result)?;
        }
        Ok(())
    }

    fn link<B: Backend>(
        &mut self,
        feature: Spanned<String>,
        path: Spanned<Vec<String>>,
        span: Span,
        unit: &mut UnitContext<'_, B>,
    ) -> Result<(), Diagnostic> {
        let (object, object_type) = self.current_element(&feature)?;

        if let Some(reference) = object_type.reference(feature.inner()) {
            let (line, column) = unit.lines.line_col(span.start());
            trace!(feature = feature.inner().as_str(), line = line, column = column; "Link deferred");
            unit.session.defer(Deferred::LinkReference(LinkRequest {
                source: unit.source.to_string(),
                line,
                column,
                span,
                scope: object,
                reference: *reference,
                path: path.into_inner(),
                languages: self.languages.clone(),
            }));
            return Ok(());
        }

        // `layout: horizontal` names a literal rather than an element.
        if object_type.slot(feature.inner()).is_some() && path.inner().len() == 1 {
            let literal = path.map(|mut components| {
                Literal::Identifier(components.pop().unwrap_or_default())
            });
            return self.assign(&feature, &literal, unit);
        }

        Err(missing_feature(&object_type, &feature, "reference"))
    }
}

fn primitive_value(kind: PrimitiveKind, literal: &Literal) -> Option<Value> {
    match (kind, literal) {
        (PrimitiveKind::Integer, Literal::Integer(value)) => Some(Value::Integer(*value)),
        (PrimitiveKind::Decimal, Literal::Integer(value)) => Some(Value::Decimal(*value as f64)),
        (PrimitiveKind::Decimal, Literal::Decimal(value)) => Some(Value::Decimal(*value)),
        (PrimitiveKind::Boolean, Literal::Boolean(value)) => Some(Value::Boolean(*value)),
        (PrimitiveKind::String, Literal::String(text)) => Some(Value::String(text.clone())),
        (PrimitiveKind::Other, Literal::String(text) | Literal::Identifier(text)) => {
            Some(Value::String(text.clone()))
        }
        (
            PrimitiveKind::Other,
            Literal::Integer(_) | Literal::Decimal(_) | Literal::Boolean(_),
        ) => Some(Value::String(literal.to_string())),
        _ => None,
    }
}

fn internal(message: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::fatal(message)
        .with_category(Category::Internal)
        .with_label(span, "while building this")
}

fn type_error(slot: &Slot, descriptor: &TypeDescriptor, literal: &Spanned<Literal>) -> Diagnostic {
    Diagnostic::error(format!(
        "Slot `{}` expects a `{}` value, found {}",
        slot.name(),
        descriptor.name(),
        literal.inner().kind_name()
    ))
    .with_category(Category::TypeError)
    .with_label(literal.span(), "incompatible value")
}

fn unknown_slot(ty: &Slotted, name: &Spanned<String>) -> Diagnostic {
    let feature = name.inner();
    let diagnostic = internal(
        format!("`{feature}` is not a slot of `{}`", ty.name()),
        name.span(),
    );

    match ty.as_object() {
        Some(object) if object.reference(feature).is_some() => {
            diagnostic.with_help(format!("`{feature}` is a reference, write `{feature}: name`"))
        }
        Some(object) if object.composition(feature).is_some() => diagnostic.with_help(format!(
            "`{feature}` is a composition, write `{feature} {{ ... }}`"
        )),
        _ => diagnostic,
    }
}

fn missing_feature(owner: &ObjectType, feature: &Spanned<String>, kind: &str) -> Diagnostic {
    let declared: Vec<String> = if kind == "composition" {
        owner
            .compositions()
            .iter()
            .map(|c| format!("`{}`", c.name()))
            .collect()
    } else {
        owner
            .references()
            .iter()
            .map(|r| format!("`{}`", r.name()))
            .collect()
    };

    let diagnostic = Diagnostic::fatal(format!(
        "Feature `{}` not found in `{}`",
        feature.inner(),
        owner.name()
    ))
    .with_category(Category::MissingFeature)
    .with_label(feature.span(), format!("unknown {kind}"));

    if declared.is_empty() {
        diagnostic.with_help(format!("`{}` declares no {kind}s", owner.name()))
    } else {
        diagnostic.with_help(format!("declared {kind}s: {}", declared.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use simon_core::{
        graph::ModelGraph,
        metamodel::{Catalog, EnumDef, FeatureDef, LanguageDef, ObjectDef, RecordDef, SlotDef},
    };

    use crate::config::FatalScope;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::builder()
            .language(
                LanguageDef::new("UI")
                    .enumeration(EnumDef::new("Layout", ["horizontal", "vertical"]))
                    .record(
                        RecordDef::new("Color")
                            .slot(SlotDef::new("red", "Integer"))
                            .slot(SlotDef::new("green", "Integer").default_value(0_i64))
                            .slot(SlotDef::new("blue", "Integer")),
                    )
                    .object(
                        ObjectDef::new("Widget")
                            .abstract_type()
                            .slot(SlotDef::new("hidden", "Boolean"))
                            .slot(SlotDef::new("layout", "Layout").default_value("vertical"))
                            .slot(SlotDef::new("width", "Integer")),
                    )
                    .object(ObjectDef::new("Label").extends("Widget"))
                    .object(
                        ObjectDef::new("Screen")
                            .extends("Widget")
                            .slot(SlotDef::new("title", "String"))
                            .slot(SlotDef::new("background", "Color"))
                            .composition(FeatureDef::new("widgets", "Widget").many())
                            .reference(FeatureDef::new("focus", "Widget")),
                    )
                    .object(
                        ObjectDef::new("Application")
                            .root()
                            .composition(FeatureDef::new("screens", "Screen").many()),
                    ),
            )
            .build()
            .unwrap()
    }

    fn build(catalog: &Catalog, text: &str) -> (ModelGraph, UnitOutcome, Session) {
        let mut graph = ModelGraph::new();
        let mut session = Session::new(FatalScope::Session);
        let mut builder = Builder::new(catalog);
        let outcome = builder.build_unit("main", text, &mut graph, &mut session);
        (graph, outcome, session)
    }

    fn categories(session: &Session) -> Vec<Category> {
        session
            .diagnostics()
            .problems("main")
            .iter()
            .map(Problem::category)
            .collect()
    }

    #[test]
    fn test_nested_elements_are_attached() {
        let catalog = catalog();
        let (graph, outcome, session) = build(
            &catalog,
            "language UI\nApplication app { screens { screen a screen b } }",
        );

        assert!(session.diagnostics().is_empty());
        assert_eq!(outcome.roots.len(), 1);
        let screens = graph.children_of(outcome.roots[0], "screens");
        let names: Vec<&str> = screens.iter().filter_map(|s| graph.get_name(*s)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_modifiers_set_boolean_and_enum_slots() {
        let catalog = catalog();
        let (graph, outcome, session) = build(
            &catalog,
            "language UI\nApplication app { screens { [hidden, horizontal] screen a } }",
        );

        assert!(session.diagnostics().is_empty());
        let screen = graph.children_of(outcome.roots[0], "screens")[0];
        assert_eq!(graph.value(screen, "hidden"), Some(&Value::Boolean(true)));
        assert_eq!(
            graph.value(screen, "layout"),
            Some(&Value::Enum(Id::new("horizontal")))
        );
    }

    #[test]
    fn test_unknown_modifier_is_fatal() {
        let catalog = catalog();
        let (_, outcome, session) = build(&catalog, "language UI\n[shiny] Application app {}");

        assert!(outcome.roots.is_empty());
        assert_eq!(categories(&session), vec![Category::MissingFeature]);
    }

    #[test]
    fn test_modifier_on_integer_slot_is_internal() {
        let catalog = catalog();
        let (_, _, session) = build(
            &catalog,
            "language UI\nApplication app { screens { [width] screen a } }",
        );
        assert_eq!(categories(&session), vec![Category::Internal]);
    }

    #[test]
    fn test_record_literal_uses_defaults() {
        let catalog = catalog();
        let (graph, outcome, _) = build(
            &catalog,
            "language UI\nApplication app { screens { screen a { background = #(red = 100 blue = 50) } } }",
        );

        let screen = graph.children_of(outcome.roots[0], "screens")[0];
        let color = graph
            .value(screen, "background")
            .and_then(Value::as_record)
            .expect("a record value");
        assert_eq!(graph.value(color, "red"), Some(&Value::Integer(100)));
        assert_eq!(graph.value(color, "blue"), Some(&Value::Integer(50)));
        assert_eq!(graph.value(color, "green"), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_enum_literal_through_colon() {
        let catalog = catalog();
        let (graph, outcome, session) = build(
            &catalog,
            "language UI\nApplication app { screens { screen a { layout: horizontal } } }",
        );

        assert!(session.diagnostics().is_empty());
        let screen = graph.children_of(outcome.roots[0], "screens")[0];
        assert_eq!(
            graph.value(screen, "layout"),
            Some(&Value::Enum(Id::new("horizontal")))
        );
    }

    #[test]
    fn test_slot_type_error_does_not_abort() {
        let catalog = catalog();
        let (graph, outcome, session) = build(
            &catalog,
            "language UI\nApplication app { screens { screen a { title = 42 width = 3 } } }",
        );

        assert_eq!(categories(&session), vec![Category::TypeError]);
        assert_eq!(outcome.roots.len(), 1);
        let screen = graph.children_of(outcome.roots[0], "screens")[0];
        assert_eq!(graph.value(screen, "width"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_links_are_deferred() {
        let catalog = catalog();
        let (graph, outcome, mut session) = build(
            &catalog,
            "language UI\nApplication app { screens { screen a { focus: later widgets { label later } } } }",
        );

        let screen = graph.children_of(outcome.roots[0], "screens")[0];
        assert!(graph.linked(screen, "focus").is_none());
        let requests = session.take_requests();
        assert_eq!(requests.len(), 1);
        let Deferred::LinkReference(request) = &requests[0];
        assert_eq!(request.path, vec!["later".to_string()]);
        assert_eq!((request.line, request.column), (2, 40));
    }

    #[test]
    fn test_no_languages_is_fatal() {
        let catalog = catalog();
        let (_, outcome, session) = build(&catalog, "Application app {}");

        assert!(outcome.roots.is_empty());
        let problems = session.diagnostics().problems("main");
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].message(), "No languages defined");
        assert!(problems[0].severity().is_fatal());
    }

    #[test]
    fn test_abstract_and_unknown_elements() {
        let catalog = catalog();
        let (_, _, session) = build(&catalog, "language UI\nWidget w {}");
        assert_eq!(categories(&session), vec![Category::AbstractElement]);

        let (_, _, session) = build(&catalog, "language UI\nGizmo g {}");
        assert_eq!(categories(&session), vec![Category::UnknownElement]);

        let (_, _, session) = build(&catalog, "language UI\nlayout l {}");
        assert_eq!(categories(&session), vec![Category::UnknownElement]);
    }

    #[test]
    fn test_fatal_stops_unit_but_keeps_imports() {
        let catalog = catalog();
        let (_, outcome, session) = build(
            &catalog,
            "language UI\nimport lib.one\nApplication app { panels {} }\nimport lib.two",
        );

        assert_eq!(outcome.imports, vec!["lib.one".to_string()]);
        assert!(outcome.roots.is_empty());
        assert_eq!(categories(&session), vec![Category::MissingFeature]);
    }

    #[test]
    fn test_top_level_non_root_warns() {
        let catalog = catalog();
        let (graph, outcome, session) =
            build(&catalog, "language UI\nscreen s { hidden = true }");

        let problems = session.diagnostics().problems("main");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].severity().is_warning());
        assert_eq!(outcome.roots.len(), 1);
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_session_roots_follow_root_type() {
        let catalog = Catalog::builder()
            .language(
                LanguageDef::new("UI").object(
                    ObjectDef::new("Package")
                        .root()
                        .composition(FeatureDef::new("packages", "Package").many()),
                ),
            )
            .build()
            .unwrap();
        let (graph, outcome, session) = build(
            &catalog,
            "language UI\nPackage outer { packages { package inner } }",
        );

        assert!(session.diagnostics().is_empty());
        assert_eq!(outcome.roots.len(), 1);
        let inner = graph.children_of(outcome.roots[0], "packages")[0];
        assert_eq!(graph.roots(), vec![outcome.roots[0], inner]);
    }

    #[test]
    fn test_features_on_a_record_scope() {
        let catalog = catalog();
        let mut graph = ModelGraph::new();
        let mut session = Session::new(FatalScope::Session);
        let mut builder = Builder::new(&catalog);

        let color = catalog
            .descriptor(Id::new("Color"))
            .and_then(|ty| ty.to_slotted())
            .unwrap();
        let record = graph.instantiate(false, &color);
        builder.scopes.push(ElementInfo::new(record, color, Vec::new()));

        let feature = Spanned::new("widgets".to_string(), Span::new(0..7));
        let err = builder.composition(&feature).unwrap_err();
        assert_eq!(err.category(), Category::ElementAdmitsNoFeatures);
        assert_eq!(err.message(), "`Color` admits no features");

        let mut unit = UnitContext {
            source: "main",
            lines: LineIndex::new("widgets: other"),
            backend: &mut graph,
            session: &mut session,
        };
        let path = Spanned::new(vec!["other".to_string()], Span::new(9..14));
        let err = builder
            .link(feature, path, Span::new(0..14), &mut unit)
            .unwrap_err();
        assert_eq!(err.category(), Category::ElementAdmitsNoFeatures);
        assert!(session.take_requests().is_empty());
    }

    #[test]
    fn test_unknown_slot_is_internal() {
        let catalog = catalog();
        let (_, _, session) = build(
            &catalog,
            "language UI\nApplication app { screens { screen a { colour = 3 } } }",
        );
        assert_eq!(categories(&session), vec![Category::Internal]);
    }

    #[test]
    fn test_syntax_error_yields_nothing() {
        let catalog = catalog();
        let (graph, outcome, session) = build(&catalog, "language UI\nApplication app {");

        assert!(graph.is_empty());
        assert!(outcome.roots.is_empty());
        assert_eq!(categories(&session), vec![Category::SyntaxError]);
    }
}
