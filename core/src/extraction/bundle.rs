use crate::types::{ParseOutcome, Row};
use log::{info, warn};

/// Concatenates parsed tables into one row sequence
///
/// Discarded chunks are dropped; the rows of kept tables stay in chunk order.
/// Empty input yields an empty sequence.
pub fn bundle_chunks(outcomes: Vec<ParseOutcome>) -> Vec<Row> {
    if outcomes.is_empty() {
        warn!("No parsed chunks to bundle");
        return Vec::new();
    }

    let total = outcomes.len();
    let tables: Vec<Vec<Row>> = outcomes
        .into_iter()
        .filter_map(ParseOutcome::into_rows)
        .collect();

    if tables.is_empty() {
        warn!("All {} chunks were discarded", total);
        return Vec::new();
    }

    let kept = tables.len();
    let rows: Vec<Row> = tables.into_iter().flatten().collect();
    info!(
        "Bundled {} rows from {} of {} chunks",
        rows.len(),
        kept,
        total
    );
    rows
}
