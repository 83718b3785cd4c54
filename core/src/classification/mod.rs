//! Canonicalization of free-text test labels
//!
//! Labels are mapped onto the controlled [`Vocabulary`] by a [`Classifier`].
//! Two backends share that interface: [`RuleClassifier`] (vocabulary lookup
//! with fuzzy fallback) and [`PredictorClassifier`] (a pre-trained
//! statistical model used as a black box).

pub mod fuzzy;
pub mod predictor;
pub mod rules;
pub mod vocabulary;

pub use predictor::PredictorClassifier;
pub use rules::RuleClassifier;
pub use vocabulary::Vocabulary;

use crate::types::Category;
use log::info;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Maps a raw test label to a canonical category
pub trait Classifier: Send + Sync {
    /// Classifies one raw label
    fn classify(&self, label: &str) -> Category;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&self, label: &str) -> Category {
        (**self).classify(label)
    }
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn classify(&self, label: &str) -> Category {
        (**self).classify(label)
    }
}

/// Normalizes a label for lookup: lowercase and trimmed
///
/// The classifier and the record filter must agree on this key.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Classifies every distinct label once
///
/// Labels are deduplicated on their [`normalize_label`] key and the classifier
/// sees that key, so labels differing only in case or surrounding whitespace
/// always share a category. Returns `normalized label -> category`, including
/// Unknown entries.
pub fn canonicalize<C>(
    classifier: &C,
    labels: &[String],
    parallel: bool,
) -> HashMap<String, Category>
where
    C: Classifier + ?Sized,
{
    let distinct: Vec<String> = labels
        .iter()
        .map(|label| normalize_label(label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    info!(
        "Classifying {} distinct labels ({} rows)",
        distinct.len(),
        labels.len()
    );

    let classified: HashMap<String, Category> = if parallel {
        distinct
            .into_par_iter()
            .map(|label| {
                let category = classifier.classify(&label);
                (label, category)
            })
            .collect()
    } else {
        distinct
            .into_iter()
            .map(|label| {
                let category = classifier.classify(&label);
                (label, category)
            })
            .collect()
    };

    let unknown = classified.values().filter(|c| c.is_unknown()).count();
    info!(
        "Phrase classification completed: {} known, {} unknown",
        classified.len() - unknown,
        unknown
    );
    classified
}
