use super::ReferenceRange;
use serde::Serialize;
use std::collections::BTreeMap;

/// Normalized value of one canonical test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTest {
    /// Scaled numeric result (always finite)
    pub result: f64,

    /// Unit as written in the report
    pub unit: Option<String>,

    /// Reference range scaled by the same multiplier as `result`
    pub reference_range: Option<ReferenceRange>,
}

impl NormalizedTest {
    /// Creates a new NormalizedTest
    pub fn new(result: f64, unit: Option<String>, reference_range: Option<ReferenceRange>) -> Self {
        Self {
            result,
            unit,
            reference_range,
        }
    }
}

/// Final report keyed by canonical category
///
/// A test that could not be parsed, classified or normalized is absent from
/// the report. Absence never means the value is zero.
///
/// Keys iterate (and serialize) in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    tests: BTreeMap<String, NormalizedTest>,
}

impl Report {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for a category
    pub fn get(&self, category: &str) -> Option<&NormalizedTest> {
        self.tests.get(category)
    }

    /// Returns whether the report holds a category
    pub fn contains(&self, category: &str) -> bool {
        self.tests.contains_key(category)
    }

    /// Number of tests in the report
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns whether the report is empty
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Iterates over `(category, test)` pairs in category order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedTest)> {
        self.tests.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Category names in order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    /// Wraps the report with its metadata block
    pub fn envelope(&self) -> ReportEnvelope<'_> {
        ReportEnvelope {
            data: self,
            meta_data: ReportMetadata {
                no_of_tests: self.len(),
            },
        }
    }

    /// Inserts an entry, returning the one it replaced
    pub(crate) fn insert(
        &mut self,
        category: impl Into<String>,
        test: NormalizedTest,
    ) -> Option<NormalizedTest> {
        self.tests.insert(category.into(), test)
    }
}

/// Serialized response shape: `{"data": {...}, "meta_data": {"no_of_tests": n}}`
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub data: &'a Report,
    pub meta_data: ReportMetadata,
}

/// Summary block attached to a serialized report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    pub no_of_tests: usize,
}
