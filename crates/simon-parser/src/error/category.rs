//! Problem categories.
//!
//! Codes are grouped by phase:
//! - `S0xx` - Unclassified and internal problems
//! - `S1xx` - Syntax problems
//! - `S2xx` - Construction problems
//! - `S3xx` - Resolution problems

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Unspecified,
    Internal,
    SyntaxError,
    MissingElement,
    UnknownElement,
    AbstractElement,
    MissingFeature,
    ElementAdmitsNoFeatures,
    UnresolvedName,
    TypeError,
}

impl Category {
    pub fn code(&self) -> &'static str {
        match self {
            Category::Unspecified => "S000",
            Category::Internal => "S001",
            Category::SyntaxError => "S100",
            Category::MissingElement => "S200",
            Category::UnknownElement => "S201",
            Category::AbstractElement => "S202",
            Category::MissingFeature => "S203",
            Category::ElementAdmitsNoFeatures => "S204",
            Category::UnresolvedName => "S300",
            Category::TypeError => "S301",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Unspecified => "unspecified problem",
            Category::Internal => "internal compiler error",
            Category::SyntaxError => "syntax error",
            Category::MissingElement => "missing element",
            Category::UnknownElement => "unknown element type",
            Category::AbstractElement => "element type is not instantiable",
            Category::MissingFeature => "unknown feature",
            Category::ElementAdmitsNoFeatures => "element admits no features",
            Category::UnresolvedName => "unresolved name",
            Category::TypeError => "type error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(Category::SyntaxError.to_string(), "S100");
        assert_eq!(Category::UnresolvedName.to_string(), "S300");
        assert_eq!(Category::default(), Category::Unspecified);
    }
}
