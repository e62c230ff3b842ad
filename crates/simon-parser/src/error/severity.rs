//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Informational; the model is still authoritative.
    Warning,

    /// Recorded without stopping construction; the affected unit's model
    /// should not be trusted.
    Error,

    /// Aborts construction of the current unit.
    Fatal,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`] and [`Severity::Fatal`].
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(Severity::Fatal.is_error());
        assert!(Severity::Fatal.is_fatal());
        assert!(Severity::Error.is_error());
        assert!(!Severity::Error.is_fatal());
        assert!(Severity::Warning.is_warning());
        assert!(!Severity::Warning.is_error());
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }
}
