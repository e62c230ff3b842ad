//! Serializable metamodel definitions.
//!
//! A [`Schema`] is the input of [`Catalog`](super::Catalog) construction.
//! It can be deserialized from TOML or assembled in code with the fluent
//! helpers on each definition type.
//!
//! # Example
//!
//! ```toml
//! [[languages]]
//! name = "UI"
//!
//! [[languages.enums]]
//! name = "Layout"
//! literals = ["horizontal", "vertical"]
//!
//! [[languages.objects]]
//! name = "Application"
//! root = true
//! compositions = [{ name = "screens", type = "Screen", many = true }]
//!
//! [[languages.objects]]
//! name = "Screen"
//! slots = [{ name = "layout", type = "Layout", default = "vertical" }]
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use super::descriptor::PrimitiveKind;

/// Root of a metamodel definition: a list of languages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(default)]
    pub languages: Vec<LanguageDef>,
}

/// One language (dialect) and the types it declares.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageDef {
    pub name: String,

    /// Built-in units shipped with the language: unit name to source text.
    #[serde(default)]
    pub builtins: IndexMap<String, String>,

    #[serde(default)]
    pub objects: Vec<ObjectDef>,

    #[serde(default)]
    pub records: Vec<RecordDef>,

    #[serde(default)]
    pub enums: Vec<EnumDef>,

    #[serde(default)]
    pub primitives: Vec<PrimitiveDef>,
}

impl LanguageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn object(mut self, object: ObjectDef) -> Self {
        self.objects.push(object);
        self
    }

    pub fn record(mut self, record: RecordDef) -> Self {
        self.records.push(record);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumDef) -> Self {
        self.enums.push(enumeration);
        self
    }

    pub fn primitive(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.primitives.push(PrimitiveDef {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn builtin(mut self, unit: impl Into<String>, source: impl Into<String>) -> Self {
        self.builtins.insert(unit.into(), source.into());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDef {
    pub name: String,

    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,

    #[serde(default)]
    pub root: bool,

    /// Direct supertypes.
    #[serde(default)]
    pub extends: Vec<String>,

    #[serde(default)]
    pub slots: Vec<SlotDef>,

    #[serde(default)]
    pub compositions: Vec<FeatureDef>,

    #[serde(default)]
    pub references: Vec<FeatureDef>,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.extends.push(supertype.into());
        self
    }

    pub fn slot(mut self, slot: SlotDef) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn composition(mut self, feature: FeatureDef) -> Self {
        self.compositions.push(feature);
        self
    }

    pub fn reference(mut self, feature: FeatureDef) -> Self {
        self.references.push(feature);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordDef {
    pub name: String,

    #[serde(default)]
    pub slots: Vec<SlotDef>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
        }
    }

    pub fn slot(mut self, slot: SlotDef) -> Self {
        self.slots.push(slot);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDef {
    pub name: String,
    pub literals: Vec<String>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            literals: literals.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveDef {
    pub name: String,
    pub kind: PrimitiveKind,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotDef {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub many: bool,

    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl SlotDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A composition or reference definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureDef {
    pub name: String,

    #[serde(rename = "type")]
    pub target: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub many: bool,
}

impl FeatureDef {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }
}

/// A declared slot default, interpreted against the slot's type when the
/// catalog is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_language() {
        let schema: Schema = toml::from_str(
            r#"
            [[languages]]
            name = "UI"

            [languages.builtins]
            "ui.prelude" = "language UI"

            [[languages.objects]]
            name = "Widget"
            abstract = true
            slots = [{ name = "visible", type = "Boolean", default = true }]

            [[languages.objects]]
            name = "Button"
            extends = ["Widget"]
            references = [{ name = "target", type = "Widget", required = true }]
            "#,
        )
        .expect("schema should deserialize");

        let ui = &schema.languages[0];
        assert_eq!(ui.name, "UI");
        assert_eq!(ui.builtins["ui.prelude"], "language UI");
        assert!(ui.objects[0].is_abstract);
        assert_eq!(ui.objects[0].slots[0].default, Some(DefaultValue::Boolean(true)));
        assert_eq!(ui.objects[1].extends, vec!["Widget".to_string()]);
        assert!(ui.objects[1].references[0].required);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Schema, _> = toml::from_str(
            r#"
            [[languages]]
            name = "UI"
            colour = "blue"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_value_variants() {
        #[derive(Deserialize)]
        struct Holder {
            values: Vec<DefaultValue>,
        }

        let holder: Holder =
            toml::from_str(r#"values = [false, 3, 2.5, "red"]"#).expect("should deserialize");
        assert_eq!(
            holder.values,
            vec![
                DefaultValue::Boolean(false),
                DefaultValue::Integer(3),
                DefaultValue::Decimal(2.5),
                DefaultValue::Text("red".to_string()),
            ]
        );
    }
}
