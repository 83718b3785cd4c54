//! Report assembly
//!
//! Builds the category-keyed [`Report`] from normalized rows and adds the
//! derived tests whose prerequisites are present.

mod derived;

pub use derived::{DerivedTest, DERIVED_TESTS};

use crate::extraction::NormalizedRow;
use crate::types::{NormalizedTest, Report};
use log::{debug, info};

/// Builds the report and computes derived tests
///
/// Returns the report together with the number of derived tests that were
/// computed. When a category appears in several rows, the last one wins.
/// Derived tests only see entries parsed from the input, never other derived
/// tests.
pub fn assemble_report(rows: Vec<NormalizedRow>) -> (Report, usize) {
    let mut report = base_report(rows);

    let derived: Vec<_> = DERIVED_TESTS
        .iter()
        .filter_map(|rule| rule.compute(&report).map(|test| (rule.name, test)))
        .collect();
    let computed = derived.len();

    for (name, test) in derived {
        debug!("Derived '{}' = {}", name, test.result);
        report.insert(name, test);
    }

    info!(
        "Assembled report with {} tests ({} derived)",
        report.len(),
        computed
    );
    (report, computed)
}

/// Builds the report from parsed entries only
pub fn base_report(rows: Vec<NormalizedRow>) -> Report {
    let mut report = Report::new();
    for row in rows {
        let test = NormalizedTest::new(row.numeric.value(), row.unit, row.reference_range);
        if report.insert(row.category.clone(), test).is_some() {
            debug!(
                "'{}' appears more than once, keeping the last row",
                row.category
            );
        }
    }
    report
}
