//! Slot values.

use std::fmt;

use crate::{backend::ObjectId, identifier::Id};

/// A value stored in a slot.
///
/// Record values are model objects of a record type; the slot holding the
/// [`Value::Record`] owns that object.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    String(String),
    /// An enumerated literal, by name.
    Enum(Id),
    Record(ObjectId),
}

impl Value {
    /// Returns `true` if no value is present.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<Id> {
        match self {
            Value::Enum(literal) => Some(*literal),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<ObjectId> {
        match self {
            Value::Record(object) => Some(*object),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value:?}"),
            Value::Enum(literal) => write!(f, "{literal}"),
            Value::Record(object) => write!(f, "#{object}"),
        }
    }
}
