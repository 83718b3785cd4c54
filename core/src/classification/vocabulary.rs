use crate::assembly::DERIVED_TESTS;
use crate::error::{LabcatError, Result};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::normalize_label;

/// Category → alias list file
pub const PHRASE_FILE: &str = "phrase.json";

/// Generic words that never resolve to a category
pub const COMMON_TERMS_FILE: &str = "common_phrases.txt";

/// Abbreviations exempt from the minimum-length rule
pub const SHORT_TERMS_FILE: &str = "valid_short_terms.txt";

const BUILTIN_PHRASES: &str = include_str!("../../data/phrase.json");
const BUILTIN_COMMON_TERMS: &str = include_str!("../../data/common_phrases.txt");
const BUILTIN_SHORT_TERMS: &str = include_str!("../../data/valid_short_terms.txt");

/// One accepted surface form of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Normalized (lowercased, trimmed) alias text
    pub text: String,
    category: usize,
}

/// Controlled vocabulary of canonical test names
///
/// Built once and shared read-only between classifiers. Aliases are kept in
/// a fixed order (categories by name, aliases in file order), which makes
/// fuzzy tie-breaking deterministic.
///
/// # Example
///
/// ```
/// use labcat_core::Vocabulary;
///
/// let vocabulary = Vocabulary::builtin().unwrap();
/// assert_eq!(vocabulary.lookup("total leukocyte count"), Some("WBC count"));
/// assert!(vocabulary.is_common_term("count"));
/// assert!(vocabulary.is_valid_short_term("hb"));
/// ```
#[derive(Debug, Clone)]
pub struct Vocabulary {
    categories: Vec<String>,
    aliases: Vec<Alias>,
    alias_index: HashMap<String, usize>,
    common_terms: HashSet<String>,
    valid_short_terms: HashSet<String>,
}

impl Vocabulary {
    /// Loads the bundled default vocabulary
    pub fn builtin() -> Result<Self> {
        Self::from_parts(BUILTIN_PHRASES, BUILTIN_COMMON_TERMS, BUILTIN_SHORT_TERMS)
    }

    /// Loads a vocabulary directory
    ///
    /// The directory must contain [`PHRASE_FILE`], [`COMMON_TERMS_FILE`] and
    /// [`SHORT_TERMS_FILE`].
    ///
    /// # Errors
    ///
    /// Returns [`LabcatError::Vocabulary`] if any file is missing, unreadable
    /// or malformed, or if no alias is defined.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading vocabulary from {}", dir.display());

        let phrases = read_file(&dir.join(PHRASE_FILE))?;
        let common = read_file(&dir.join(COMMON_TERMS_FILE))?;
        let short = read_file(&dir.join(SHORT_TERMS_FILE))?;

        Self::from_parts(&phrases, &common, &short)
    }

    /// Builds a vocabulary from file contents
    ///
    /// `phrases_json` is a JSON object mapping each category to its aliases.
    /// The term lists are comma- or newline-separated.
    pub fn from_parts(phrases_json: &str, common_terms: &str, short_terms: &str) -> Result<Self> {
        let phrases: BTreeMap<String, Vec<String>> =
            serde_json::from_str(phrases_json).map_err(invalid_alias_table)?;

        Self::from_map(phrases, parse_terms(common_terms), parse_terms(short_terms))
    }

    /// Builds a vocabulary from an alias table and term sets
    ///
    /// # Errors
    ///
    /// Returns [`LabcatError::Vocabulary`] if no alias is defined or a
    /// category is named like a derived test.
    pub fn from_map(
        phrases: BTreeMap<String, Vec<String>>,
        common_terms: HashSet<String>,
        valid_short_terms: HashSet<String>,
    ) -> Result<Self> {
        let mut categories = Vec::with_capacity(phrases.len());
        let mut aliases = Vec::new();
        let mut alias_index = HashMap::new();

        for (category, surface_forms) in phrases {
            if DERIVED_TESTS.iter().any(|rule| rule.name == category) {
                return Err(LabcatError::Vocabulary(format!(
                    "category '{}' is reserved for a derived test",
                    category
                )));
            }

            let idx = categories.len();
            for form in surface_forms {
                let text = normalize_label(&form);
                if text.is_empty() {
                    continue;
                }
                if let Some(&existing) = alias_index.get(&text) {
                    if existing == idx {
                        debug!("Duplicate alias '{}' of '{}'", text, category);
                    } else {
                        warn!(
                            "Alias '{}' of '{}' already registered for '{}', ignoring",
                            text, category, categories[existing]
                        );
                    }
                    continue;
                }
                alias_index.insert(text.clone(), idx);
                aliases.push(Alias {
                    text,
                    category: idx,
                });
            }
            categories.push(category);
        }

        if aliases.is_empty() {
            return Err(LabcatError::Vocabulary(
                "alias table defines no aliases".to_string(),
            ));
        }

        info!(
            "Loaded vocabulary: {} categories, {} aliases, {} common terms, {} short terms",
            categories.len(),
            aliases.len(),
            common_terms.len(),
            valid_short_terms.len()
        );

        Ok(Self {
            categories,
            aliases,
            alias_index,
            common_terms,
            valid_short_terms,
        })
    }

    /// Looks up the category of an exact (normalized) alias
    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.alias_index
            .get(alias)
            .map(|&idx| self.categories[idx].as_str())
    }

    /// Returns whether a normalized label is a common term
    pub fn is_common_term(&self, label: &str) -> bool {
        self.common_terms.contains(label)
    }

    /// Returns whether a normalized label is a valid short term
    pub fn is_valid_short_term(&self, label: &str) -> bool {
        self.valid_short_terms.contains(label)
    }

    /// Returns whether `name` is one of the canonical categories
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Canonical categories in alias order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Iterates over `(alias, category)` pairs in match order
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|a| (a.text.as_str(), self.categories[a.category].as_str()))
    }

    /// Number of registered aliases
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

fn invalid_alias_table(e: serde_json::Error) -> LabcatError {
    LabcatError::Vocabulary(format!("invalid alias table: {}", e))
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| LabcatError::vocabulary_file(path, e))
}

/// Splits a comma- or newline-separated term list into normalized terms
pub fn parse_terms(text: &str) -> HashSet<String> {
    text.split([',', '\n'])
        .map(normalize_label)
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const PHRASES: &str = r#"{
        "WBC count": ["Total leukocyte count", "WBC count"],
        "Haemoglobin": ["Hemoglobin", "Haemoglobin", "Hb"]
    }"#;

    #[test]
    fn test_builtin_vocabulary() {
        let vocabulary = Vocabulary::builtin().unwrap();
        assert_eq!(vocabulary.lookup("hb"), Some("Haemoglobin"));
        assert_eq!(vocabulary.lookup("neutrophils"), Some("Neutrophil %"));
        assert_eq!(vocabulary.lookup("plt"), Some("Platelets"));
        assert!(vocabulary.is_common_term("percentage"));
        assert!(vocabulary.is_valid_short_term("plts"));
        assert!(vocabulary.has_category("Lymphocyte %"));
        assert!(!vocabulary.has_category("Unknown"));
    }

    #[test]
    fn test_alias_order_is_deterministic() {
        let vocabulary = Vocabulary::from_parts(PHRASES, "", "").unwrap();
        let aliases: Vec<_> = vocabulary.aliases().collect();
        assert_eq!(
            aliases,
            vec![
                ("hemoglobin", "Haemoglobin"),
                ("haemoglobin", "Haemoglobin"),
                ("hb", "Haemoglobin"),
                ("total leukocyte count", "WBC count"),
                ("wbc count", "WBC count"),
            ]
        );
    }

    #[test]
    fn test_duplicate_alias_keeps_first_category() {
        let phrases = r#"{"A": ["shared"], "B": ["Shared", "own"]}"#;
        let vocabulary = Vocabulary::from_parts(phrases, "", "").unwrap();
        assert_eq!(vocabulary.lookup("shared"), Some("A"));
        assert_eq!(vocabulary.lookup("own"), Some("B"));
        assert_eq!(vocabulary.alias_count(), 2);
    }

    #[test]
    fn test_duplicate_alias_within_category() {
        let phrases = r#"{"Haemoglobin": ["Hb", "HB", "Haemoglobin"]}"#;
        let vocabulary = Vocabulary::from_parts(phrases, "", "").unwrap();
        assert_eq!(vocabulary.alias_count(), 2);
        assert_eq!(vocabulary.lookup("hb"), Some("Haemoglobin"));
    }

    #[test]
    fn test_derived_test_name_is_rejected() {
        let phrases = r#"{"Absolute Neutrophil count": ["anc"]}"#;
        let err = Vocabulary::from_parts(phrases, "", "").unwrap_err();
        assert!(matches!(err, LabcatError::Vocabulary(_)));
        assert!(err.to_string().contains("Absolute Neutrophil count"));
    }

    #[test]
    fn test_parse_terms_separators() {
        let terms = parse_terms("Count, term\nlevel,\n\n amount ");
        assert_eq!(terms.len(), 4);
        assert!(terms.contains("count"));
        assert!(terms.contains("amount"));
    }

    #[test]
    fn test_empty_alias_table_is_error() {
        let err = Vocabulary::from_parts("{}", "", "").unwrap_err();
        assert!(matches!(err, LabcatError::Vocabulary(_)));
    }

    #[test]
    fn test_corrupt_alias_table_is_error() {
        let err = Vocabulary::from_parts("[1, 2", "", "").unwrap_err();
        assert!(matches!(err, LabcatError::Vocabulary(_)));
    }

    #[test]
    fn test_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::File::create(temp_dir.path().join(PHRASE_FILE))
            .unwrap()
            .write_all(PHRASES.as_bytes())
            .unwrap();
        fs::write(temp_dir.path().join(COMMON_TERMS_FILE), "count,value").unwrap();
        fs::write(temp_dir.path().join(SHORT_TERMS_FILE), "hb\nwbc").unwrap();

        let vocabulary = Vocabulary::from_dir(temp_dir.path()).unwrap();
        assert_eq!(vocabulary.lookup("wbc count"), Some("WBC count"));
        assert!(vocabulary.is_common_term("value"));
        assert!(vocabulary.is_valid_short_term("wbc"));
    }

    #[test]
    fn test_from_dir_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(PHRASE_FILE), PHRASES).unwrap();

        let err = Vocabulary::from_dir(temp_dir.path()).unwrap_err();
        assert!(matches!(err, LabcatError::Vocabulary(_)));
        assert!(err.to_string().contains(COMMON_TERMS_FILE));
    }
}
