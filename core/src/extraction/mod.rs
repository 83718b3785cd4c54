pub mod bundle;
pub mod chunks;
pub mod records;
pub mod rows;
pub mod values;

pub use bundle::bundle_chunks;
pub use chunks::{segment_chunks, Chunk, DELIMITER};
pub use records::{filter_records, known_label_lookup};
pub use rows::{parse_chunk, parse_line};
pub use values::{normalize_row, process_reference_range, process_result, NormalizedRow};
