use crate::types::{Category, UNKNOWN};
use log::debug;
use std::fmt;
use std::sync::Arc;

use super::vocabulary::Vocabulary;
use super::Classifier;

/// Classifier backed by a pre-trained `phrase -> category` predictor
///
/// The predictor is treated as a black box (e.g. a bag-of-words model trained
/// offline). Its output is only trusted when it names a category of the
/// vocabulary; anything else, including `"Unknown"`, becomes
/// [`Category::Unknown`].
///
/// Inside a pipeline the predictor receives normalized (lowercased, trimmed)
/// labels, one call per distinct label.
pub struct PredictorClassifier<F> {
    predict: F,
    vocabulary: Arc<Vocabulary>,
}

impl<F> PredictorClassifier<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    /// Wraps a predictor, restricting its output to `vocabulary`
    pub fn new(predict: F, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            predict,
            vocabulary,
        }
    }
}

impl<F> Classifier for PredictorClassifier<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn classify(&self, label: &str) -> Category {
        if label.trim().is_empty() {
            return Category::Unknown;
        }

        let predicted = (self.predict)(label);
        let predicted = predicted.trim();

        if predicted.is_empty() || predicted == UNKNOWN {
            return Category::Unknown;
        }

        if !self.vocabulary.has_category(predicted) {
            debug!(
                "Predictor returned '{}' for '{}', which is not a known category",
                predicted, label
            );
            return Category::Unknown;
        }

        Category::Known(predicted.to_string())
    }
}

impl<F> fmt::Debug for PredictorClassifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictorClassifier")
            .field("categories", &self.vocabulary.categories().len())
            .finish_non_exhaustive()
    }
}
