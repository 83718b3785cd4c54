use serde::Serialize;
use std::fmt;

/// Numeric result split into a base and the multiplier it was written with
///
/// `3.83x10^3` is `base = 3.83`, `multiplier = 1000`; a plain `52` has a
/// multiplier of 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericResult {
    pub base: f64,
    pub multiplier: f64,
}

impl NumericResult {
    /// Creates a new NumericResult
    pub fn new(base: f64, multiplier: f64) -> Self {
        Self { base, multiplier }
    }

    /// Returns the scaled value (`base * multiplier`)
    pub fn value(&self) -> f64 {
        self.base * self.multiplier
    }
}

/// Outcome of parsing a result cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericParse {
    Value(NumericResult),
    Unparseable,
}

impl NumericParse {
    /// Returns the parsed result, if any
    pub fn value(self) -> Option<NumericResult> {
        match self {
            NumericParse::Value(v) => Some(v),
            NumericParse::Unparseable => None,
        }
    }

    /// Returns whether the cell could not be parsed
    pub fn is_unparseable(&self) -> bool {
        matches!(self, NumericParse::Unparseable)
    }
}

/// Inclusive reference interval `[low, high]`
///
/// Serializes as a two-element JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRange(pub f64, pub f64);

impl ReferenceRange {
    /// Creates a new ReferenceRange
    pub fn new(low: f64, high: f64) -> Self {
        Self(low, high)
    }

    /// Lower bound
    pub fn low(&self) -> f64 {
        self.0
    }

    /// Upper bound
    pub fn high(&self) -> f64 {
        self.1
    }

    /// Multiplies both bounds by `multiplier`
    pub fn scaled(self, multiplier: f64) -> Self {
        Self(self.0 * multiplier, self.1 * multiplier)
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.0, self.1)
    }
}
