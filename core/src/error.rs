use thiserror::Error;

/// Result type for labcat operations
pub type Result<T> = std::result::Result<T, LabcatError>;

/// Error types for labcat operations
///
/// Only failures that make a pipeline run meaningless are errors. Malformed
/// rows, tables and values are recovered locally and show up as absence in
/// the [`Report`](crate::Report), never as an `Err`.
#[derive(Error, Debug)]
pub enum LabcatError {
    /// Missing, corrupt or empty vocabulary
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    /// Invalid pipeline configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding or encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LabcatError {
    /// Builds a vocabulary error for a file that could not be used
    pub(crate) fn vocabulary_file(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        LabcatError::Vocabulary(format!("{}: {}", path.display(), reason))
    }
}
