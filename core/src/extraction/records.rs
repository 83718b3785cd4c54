use crate::classification::normalize_label;
use crate::types::{Category, ClassifiedRow, Row};
use log::{debug, info};
use std::collections::HashMap;

/// Builds the lookup used to re-match rows against classification results
///
/// `classified` is keyed by [`normalize_label`], as produced by
/// [`canonicalize`](crate::classification::canonicalize). Unknown labels are
/// left out.
pub fn known_label_lookup(classified: &HashMap<String, Category>) -> HashMap<String, String> {
    classified
        .iter()
        .filter_map(|(label, category)| {
            category
                .as_known()
                .map(|name| (label.clone(), name.to_string()))
        })
        .collect()
}

/// Keeps rows whose label resolved to a known category
///
/// Rows are matched on [`normalize_label`] of their test label, the key
/// `classified` was built with, so a row is never dropped because of case or
/// surrounding whitespace. Surviving rows are rewritten under their canonical
/// category and keep their relative order.
pub fn filter_records(
    rows: Vec<Row>,
    classified: &HashMap<String, Category>,
) -> Vec<ClassifiedRow> {
    let lookup = known_label_lookup(classified);
    let total = rows.len();

    let kept: Vec<ClassifiedRow> = rows
        .into_iter()
        .filter_map(|row| match lookup.get(&normalize_label(&row.test)) {
            Some(category) => Some(ClassifiedRow::new(category.clone(), row)),
            None => {
                debug!("Dropping unclassified row '{}'", row.test);
                None
            }
        })
        .collect();

    info!("Kept {} of {} rows after classification", kept.len(), total);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified() -> HashMap<String, Category> {
        HashMap::from([
            (
                "haemoglobin".to_string(),
                Category::Known("Haemoglobin".to_string()),
            ),
            (
                "total leukocyte count".to_string(),
                Category::Known("WBC count".to_string()),
            ),
            ("r.b.c. count".to_string(), Category::Unknown),
        ])
    }

    #[test]
    fn test_filter_drops_unknown_and_renames() {
        let rows = vec![
            Row::new("Haemoglobin", Some("11.3"), Some("gm/dl"), Some("14 - 18")),
            Row::new("R.B.C. Count", Some("3.82"), None, None),
            Row::new("Total leukocyte count", Some("5800"), Some("/cmm"), None),
            Row::new("Monocytes", Some("08"), Some("%"), None),
        ];

        let kept = filter_records(rows, &classified());
        let categories: Vec<_> = kept.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Haemoglobin", "WBC count"]);
        assert_eq!(kept[1].source_label, "Total leukocyte count");
        assert_eq!(kept[1].result.as_deref(), Some("5800"));
    }

    #[test]
    fn test_filter_matches_case_and_whitespace_variants() {
        let rows = vec![Row::new("  HAEMOGLOBIN ", Some("12"), None, None)];
        let kept = filter_records(rows, &classified());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, "Haemoglobin");
    }

    #[test]
    fn test_lookup_excludes_unknown() {
        let lookup = known_label_lookup(&classified());
        assert_eq!(lookup.len(), 2);
        assert_eq!(
            lookup.get("total leukocyte count").map(String::as_str),
            Some("WBC count")
        );
        assert!(!lookup.contains_key("r.b.c. count"));
    }
}
