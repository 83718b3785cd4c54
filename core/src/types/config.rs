use crate::error::{LabcatError, Result};

/// Default fuzzy-match threshold; a match needs a score strictly above it
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 90;

/// Default minimum label length for fuzzy matching
pub const DEFAULT_MIN_FUZZY_LENGTH: usize = 3;

/// How the row parser finds the first data line of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Always skip the first two lines (header + alignment separator)
    #[default]
    Fixed,

    /// Skip through an alignment separator found in the first two lines,
    /// otherwise skip only the header line
    Detect,
}

/// Phrase classification backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierBackend {
    /// Vocabulary lookup with fuzzy fallback
    #[default]
    Rules,

    /// Externally supplied pre-trained predictor
    Predictor,
}

/// Configuration for a pipeline run
///
/// # Example
///
/// ```
/// use labcat_core::{HeaderMode, PipelineConfig};
///
/// let config = PipelineConfig::default()
///     .fuzzy_threshold(85)
///     .header_mode(HeaderMode::Detect)
///     .parallel(false);
///
/// assert_eq!(config.fuzzy_threshold, 85);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Exclusive fuzzy-match threshold in `[0, 100]`
    pub fuzzy_threshold: u8,

    /// Labels shorter than this skip fuzzy matching (valid short terms are exempt)
    pub min_fuzzy_length: usize,

    /// Header handling for the row parser
    pub header_mode: HeaderMode,

    /// Classification backend
    pub backend: ClassifierBackend,

    /// Run per-chunk and per-row stages on the rayon pool
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            min_fuzzy_length: DEFAULT_MIN_FUZZY_LENGTH,
            header_mode: HeaderMode::Fixed,
            backend: ClassifierBackend::Rules,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Builder: Set the fuzzy-match threshold
    pub fn fuzzy_threshold(mut self, threshold: u8) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Builder: Set the minimum label length for fuzzy matching
    pub fn min_fuzzy_length(mut self, len: usize) -> Self {
        self.min_fuzzy_length = len;
        self
    }

    /// Builder: Set header handling
    pub fn header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    /// Builder: Set the classification backend
    pub fn backend(mut self, backend: ClassifierBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Builder: Enable or disable parallel stages
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the fuzzy threshold is above 100
    pub fn validate(&self) -> Result<()> {
        if self.fuzzy_threshold > 100 {
            return Err(LabcatError::InvalidConfig(format!(
                "fuzzy threshold must be within 0..=100, got {}",
                self.fuzzy_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.fuzzy_threshold, 90);
        assert_eq!(config.min_fuzzy_length, 3);
        assert_eq!(config.header_mode, HeaderMode::Fixed);
        assert_eq!(config.backend, ClassifierBackend::Rules);
        assert!(config.parallel);
    }

    #[test]
    fn test_builder_chain() {
        let config = PipelineConfig::default()
            .fuzzy_threshold(80)
            .min_fuzzy_length(4)
            .header_mode(HeaderMode::Detect)
            .backend(ClassifierBackend::Predictor)
            .parallel(false);

        assert_eq!(config.fuzzy_threshold, 80);
        assert_eq!(config.min_fuzzy_length, 4);
        assert_eq!(config.header_mode, HeaderMode::Detect);
        assert_eq!(config.backend, ClassifierBackend::Predictor);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_threshold() {
        let config = PipelineConfig::default();
        assert!(config.clone().fuzzy_threshold(100).validate().is_ok());
        assert!(config.fuzzy_threshold(101).validate().is_err());
    }
}
