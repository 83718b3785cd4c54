use crate::types::{Category, PipelineConfig, DEFAULT_FUZZY_THRESHOLD, DEFAULT_MIN_FUZZY_LENGTH};
use log::debug;
use std::sync::Arc;

use super::fuzzy::best_match;
use super::vocabulary::Vocabulary;
use super::{normalize_label, Classifier};

/// Vocabulary-driven classifier with fuzzy fallback
///
/// # Algorithm
///
/// For a normalized label, first match wins:
/// 1. Empty → Unknown
/// 2. Common term → Unknown
/// 3. Valid short term → exact alias lookup (Unknown without an alias)
/// 4. Exact alias → its category
/// 5. Labels shorter than the minimum fuzzy length → Unknown
/// 6. Best fuzzy alias scoring strictly above the threshold → its category,
///    otherwise Unknown
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    vocabulary: Arc<Vocabulary>,
    threshold: u8,
    min_fuzzy_length: usize,
}

impl RuleClassifier {
    /// Creates a classifier with the default threshold and length rule
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            vocabulary,
            threshold: DEFAULT_FUZZY_THRESHOLD,
            min_fuzzy_length: DEFAULT_MIN_FUZZY_LENGTH,
        }
    }

    /// Creates a classifier using the thresholds of a pipeline config
    pub fn from_config(vocabulary: Arc<Vocabulary>, config: &PipelineConfig) -> Self {
        Self {
            vocabulary,
            threshold: config.fuzzy_threshold,
            min_fuzzy_length: config.min_fuzzy_length,
        }
    }

    /// Builder: Set the exclusive fuzzy threshold
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, label: &str) -> Category {
        let normalized = normalize_label(label);

        if normalized.is_empty() {
            debug!("Empty label classified as Unknown");
            return Category::Unknown;
        }

        if self.vocabulary.is_common_term(&normalized) {
            debug!("'{}' is a common term, classified as Unknown", label);
            return Category::Unknown;
        }

        if self.vocabulary.is_valid_short_term(&normalized) {
            let category = known(self.vocabulary.lookup(&normalized));
            debug!("'{}' matched as a valid short term: {}", label, category);
            return category;
        }

        if let Some(category) = self.vocabulary.lookup(&normalized) {
            debug!("Exact match for '{}': {}", label, category);
            return Category::Known(category.to_string());
        }

        if normalized.chars().count() < self.min_fuzzy_length {
            debug!("'{}' is too short for fuzzy matching", label);
            return Category::Unknown;
        }

        let aliases = self.vocabulary.aliases().map(|(alias, _)| alias);
        match best_match(&normalized, aliases) {
            Some((alias, score)) if score > self.threshold => {
                let category = known(self.vocabulary.lookup(alias));
                debug!(
                    "Fuzzy match: '{}' -> '{}' (score: {}): {}",
                    label, alias, score, category
                );
                category
            }
            Some((alias, score)) => {
                debug!(
                    "No good match for '{}' (best: '{}', score: {})",
                    label, alias, score
                );
                Category::Unknown
            }
            None => Category::Unknown,
        }
    }
}

fn known(category: Option<&str>) -> Category {
    category
        .map(|c| Category::Known(c.to_string()))
        .unwrap_or(Category::Unknown)
}
