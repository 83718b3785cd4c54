use std::fmt;

/// Label used for labels that did not resolve to a known test
pub const UNKNOWN: &str = "Unknown";

/// Canonical test identity assigned to a raw label
///
/// Known categories are drawn from the vocabulary; everything else is
/// `Unknown` and gets filtered out before the report is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Known(String),
    Unknown,
}

impl Category {
    /// Returns whether this category is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, Category::Unknown)
    }

    /// Returns the canonical name of a known category
    pub fn as_known(&self) -> Option<&str> {
        match self {
            Category::Known(name) => Some(name),
            Category::Unknown => None,
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &str {
        match self {
            Category::Known(name) => name,
            Category::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
