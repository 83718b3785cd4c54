use crate::types::{NormalizedTest, Report};
use log::debug;

/// Test computed from an absolute count and a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTest {
    /// Name of the derived entry
    pub name: &'static str,

    /// Absolute count the percentage applies to (provides the unit)
    pub total: &'static str,

    /// Percentage of the total
    pub percentage: &'static str,
}

/// Derived tests added to every report whose prerequisites are present
pub const DERIVED_TESTS: [DerivedTest; 2] = [
    DerivedTest {
        name: "Absolute Neutrophil count",
        total: "WBC count",
        percentage: "Neutrophil %",
    },
    DerivedTest {
        name: "Absolute Lymphocyte count",
        total: "WBC count",
        percentage: "Lymphocyte %",
    },
];

impl DerivedTest {
    /// Computes the derived entry from a report
    ///
    /// Returns `None` if either prerequisite is missing or the product is
    /// not finite. The derived entry takes the unit of the total and has no
    /// reference range.
    pub fn compute(&self, report: &Report) -> Option<NormalizedTest> {
        let total = report.get(self.total);
        let percentage = report.get(self.percentage);
        let (Some(total), Some(percentage)) = (total, percentage) else {
            debug!(
                "Skipping '{}': needs both '{}' and '{}'",
                self.name, self.total, self.percentage
            );
            return None;
        };

        let result = total.result * percentage.result / 100.0;
        if !result.is_finite() {
            return None;
        }

        Some(NormalizedTest::new(result, total.unit.clone(), None))
    }
}
