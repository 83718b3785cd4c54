//! Core type definitions for lab report extraction
//!
//! This module provides the fundamental types used throughout the labcat library:
//! - [`Row`]: One parsed table row (test, result, unit, reference range)
//! - [`ParseOutcome`]: Parsed table or discard signal for a chunk
//! - [`Category`]: Canonical test identity or `Unknown`
//! - [`ClassifiedRow`]: Row rewritten under its canonical category
//! - [`NumericResult`] / [`NumericParse`]: Result values with their multiplier
//! - [`ReferenceRange`]: Scaled reference interval
//! - [`NormalizedTest`] / [`Report`]: The pipeline's output
//! - [`PipelineConfig`]: Thresholds and modes for a pipeline run

mod category;
mod config;
mod numeric;
mod report;
mod row;

pub use category::{Category, UNKNOWN};
pub use config::{
    ClassifierBackend, HeaderMode, PipelineConfig, DEFAULT_FUZZY_THRESHOLD,
    DEFAULT_MIN_FUZZY_LENGTH,
};
pub use numeric::{NumericParse, NumericResult, ReferenceRange};
pub use report::{NormalizedTest, Report, ReportEnvelope, ReportMetadata};
pub use row::{cell_value, ClassifiedRow, ParseOutcome, Row, PLACEHOLDER};
