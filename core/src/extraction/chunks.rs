use log::{debug, info};

/// Column delimiter of markdown tables
pub const DELIMITER: char = '|';

/// Contiguous run of delimiter-bearing lines believed to form one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    lines: Vec<String>,
}

impl Chunk {
    /// Creates a chunk from its lines
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Lines of the chunk, in input order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines in the chunk
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns whether the chunk has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joins the lines back into text
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Splits raw report text into table-like chunks
///
/// # Algorithm
///
/// 1. Scan lines in order
/// 2. A line containing `|` starts or continues the current chunk
/// 3. A line without `|` closes the current chunk, if one is open
/// 4. A chunk still open at the end of input is closed
///
/// Two tables with no separating line merge into one chunk, and a row that
/// wraps onto a line without `|` splits its table. Both are accepted
/// limitations of this scan.
pub fn segment_chunks(raw: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in raw.trim().lines() {
        if line.contains(DELIMITER) {
            current.push(line.to_string());
        } else if !current.is_empty() {
            chunks.push(Chunk::new(std::mem::take(&mut current)));
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk::new(current));
    }

    info!("Segmented {} chunks from report text", chunks.len());
    debug!(
        "Chunk sizes: {:?}",
        chunks.iter().map(Chunk::len).collect::<Vec<_>>()
    );
    chunks
}
