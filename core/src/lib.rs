pub mod api;
pub mod assembly;
pub mod classification;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod types;

pub use api::{Pipeline, PipelineStats};
pub use classification::{Classifier, PredictorClassifier, RuleClassifier, Vocabulary};
pub use cli::report::TextReport;
pub use error::{LabcatError, Result};
pub use types::*;
