use crate::types::{HeaderMode, ParseOutcome, Row};
use log::{debug, warn};

use super::chunks::{Chunk, DELIMITER};

/// Number of leading lines treated as header + alignment separator
const FIXED_HEADER_LINES: usize = 2;

/// Parses one chunk into a table of rows
///
/// # Algorithm
///
/// 1. Trim the chunk and split it into lines
/// 2. Skip the header lines (see [`HeaderMode`])
/// 3. Split each remaining line on `|`, drop the first and last pieces
///    (outside the wrapping delimiters) and trim the rest
/// 4. Keep lines with exactly four cells as (test, result, unit, reference
///    range); silently skip lines of any other arity
/// 5. Discard the table if no row survived or every row is blank
pub fn parse_chunk(chunk: &Chunk, mode: HeaderMode) -> ParseOutcome {
    let text = chunk.text();
    let lines: Vec<&str> = text.trim().lines().collect();
    let skip = header_line_count(&lines, mode);

    let mut rows = Vec::new();
    for line in lines.iter().skip(skip) {
        match parse_line(line) {
            Some(row) => {
                debug!("Parsed row from chunk: {:?}", row);
                rows.push(row);
            }
            None => debug!("Skipping row with unexpected arity: {:?}", line),
        }
    }

    if rows.is_empty() || rows.iter().all(Row::is_blank) {
        warn!("Chunk is empty or irrelevant");
        return ParseOutcome::Discarded;
    }

    ParseOutcome::Table(rows)
}

/// Parses a single table line into a row
///
/// Returns `None` unless the line yields exactly four cells.
pub fn parse_line(line: &str) -> Option<Row> {
    let pieces: Vec<&str> = line.split(DELIMITER).collect();
    if pieces.len() < 2 {
        return None;
    }
    let cells: Vec<&str> = pieces[1..pieces.len() - 1]
        .iter()
        .map(|cell| cell.trim())
        .collect();
    Row::from_cells(&cells)
}

/// Returns how many leading lines of a chunk are header lines
fn header_line_count(lines: &[&str], mode: HeaderMode) -> usize {
    match mode {
        HeaderMode::Fixed => FIXED_HEADER_LINES,
        HeaderMode::Detect => lines
            .iter()
            .take(FIXED_HEADER_LINES)
            .position(|line| is_separator_line(line))
            .map(|idx| idx + 1)
            .unwrap_or(1),
    }
}

/// Checks for a markdown alignment row such as `|---|:---:|`
pub fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}
