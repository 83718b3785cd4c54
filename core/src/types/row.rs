/// Placeholder written into empty cells by the markdown formatter
pub const PLACEHOLDER: &str = "-";

/// One data row of a lab report table
///
/// Fields map positionally to the four columns `TEST | RESULT | UNIT |
/// REFERENCE RANGE`. The placeholder `-` and empty cells are stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub test: String,
    pub result: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
}

impl Row {
    /// Creates a row from already trimmed cell values
    pub fn new(
        test: impl Into<String>,
        result: Option<&str>,
        unit: Option<&str>,
        reference_range: Option<&str>,
    ) -> Self {
        Self {
            test: test.into(),
            result: result.and_then(cell_value),
            unit: unit.and_then(cell_value),
            reference_range: reference_range.and_then(cell_value),
        }
    }

    /// Builds a row from exactly four cells, `None` for any other arity
    pub fn from_cells(cells: &[&str]) -> Option<Self> {
        match cells {
            [test, result, unit, reference_range] => Some(Self::new(
                *test,
                Some(*result),
                Some(*unit),
                Some(*reference_range),
            )),
            _ => None,
        }
    }

    /// Returns whether result, unit and reference range are all missing
    pub fn is_blank(&self) -> bool {
        self.result.is_none() && self.unit.is_none() && self.reference_range.is_none()
    }
}

/// Maps a trimmed cell to its value, treating `-` and empty cells as missing
pub fn cell_value(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() || cell == PLACEHOLDER {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Outcome of parsing one chunk
///
/// `Discarded` is the expected result for decorative, header-only or
/// otherwise data-free tables.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Table(Vec<Row>),
    Discarded,
}

impl ParseOutcome {
    /// Returns whether the chunk was discarded
    pub fn is_discarded(&self) -> bool {
        matches!(self, ParseOutcome::Discarded)
    }

    /// Returns the parsed rows, empty when discarded
    pub fn rows(&self) -> &[Row] {
        match self {
            ParseOutcome::Table(rows) => rows,
            ParseOutcome::Discarded => &[],
        }
    }

    /// Consumes the outcome, yielding the rows of a kept table
    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            ParseOutcome::Table(rows) => Some(rows),
            ParseOutcome::Discarded => None,
        }
    }
}

/// A bundled row whose label resolved to a canonical category
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    /// Canonical category the label resolved to
    pub category: String,

    /// Label as it appeared in the report
    pub source_label: String,

    pub result: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
}

impl ClassifiedRow {
    /// Rewrites a row under its canonical category
    pub fn new(category: impl Into<String>, row: Row) -> Self {
        Self {
            category: category.into(),
            source_label: row.test,
            result: row.result,
            unit: row.unit,
            reference_range: row.reference_range,
        }
    }
}
