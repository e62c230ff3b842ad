//! Interned identifiers for type, feature, language and literal names.
//!
//! Metamodel lookups compare names constantly, so every name that is part of
//! the catalog vocabulary is interned once and compared as a symbol.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by every [`Id`].
///
/// # Thread Safety
///
/// Access is serialized through a `Mutex`; identifiers themselves are `Copy`
/// and can be sent across threads freely.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// An interned name.
///
/// # Examples
///
/// ```
/// use simon_core::identifier::Id;
///
/// let screen = Id::new("Screen");
/// assert_eq!(screen, "Screen");
/// assert_eq!(screen, Id::new("Screen"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns an owned copy of the interned text.
    pub fn as_string(&self) -> String {
        with_interner(|interner| interner.resolve(self.0).map(str::to_owned).unwrap_or_default())
    }

    /// Returns the identifier of `name` with its first character upper-cased.
    ///
    /// Object headers are written with a lower-case type word (`screen`) and
    /// resolved against the capitalized type name (`Screen`).
    ///
    /// ```
    /// use simon_core::identifier::Id;
    ///
    /// assert_eq!(Id::capitalized("screen"), "Screen");
    /// assert_eq!(Id::capitalized("Application"), "Application");
    /// ```
    pub fn capitalized(name: &str) -> Self {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_lowercase() => {
                let upper: String = first.to_uppercase().chain(chars).collect();
                Self::new(&upper)
            }
            _ => Self::new(name),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_interner(|interner| match interner.resolve(self.0) {
            Some(text) => f.write_str(text),
            None => Err(fmt::Error),
        })
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interns_once() {
        let a = Id::new("Screen");
        let b = Id::new("Screen");
        let c = Id::new("Link");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "Screen");
    }

    #[test]
    fn test_capitalized() {
        assert_eq!(Id::capitalized("screen"), Id::new("Screen"));
        assert_eq!(Id::capitalized("Screen"), Id::new("Screen"));
        assert_eq!(Id::capitalized("x"), "X");
        assert_eq!(Id::capitalized(""), "");
    }

    #[test]
    fn test_display_and_as_string() {
        let id = Id::new("targetScreen");
        assert_eq!(format!("{id}"), "targetScreen");
        assert_eq!(id.as_string(), "targetScreen");
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let id = Id::new("UI");
        let name = String::from("UI");
        assert!(id == name.as_str());
        assert!(id != "Data");
    }
}
