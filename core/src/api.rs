use crate::assembly::assemble_report;
use crate::classification::{canonicalize, Classifier, RuleClassifier, Vocabulary};
use crate::error::{LabcatError, Result};
use crate::extraction::{
    bundle_chunks, filter_records, normalize_row, parse_chunk, segment_chunks, NormalizedRow,
};
use crate::types::{ClassifierBackend, ParseOutcome, PipelineConfig, Report};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Main entry point turning report text into a normalized [`Report`]
///
/// Runs segmentation, row parsing, bundling, classification, record
/// filtering, value normalization and report assembly in that order.
/// Malformed rows, tables and values are skipped; they never fail a run.
///
/// # Example
///
/// ```
/// use labcat_core::Pipeline;
///
/// let text = "\
/// | TEST | RESULT | UNIT | REFERENCE RANGE |
/// |------|--------|------|-----------------|
/// | Total leukocyte count | 3.83x10^3 | /µL | 4 - 10 |
/// | Neutrophils | 52 | % | - |
/// | R.B.C. Count | 3.82 | mil./cu.mm | 4.5 - 6.5 |
/// ";
///
/// let pipeline = Pipeline::builtin().unwrap();
/// let report = pipeline.process(text);
///
/// // Unknown labels are dropped
/// assert!(!report.contains("R.B.C. Count"));
///
/// let wbc = report.get("WBC count").unwrap();
/// assert!((wbc.result - 3830.0).abs() < 1e-9);
/// assert!(report.contains("Absolute Neutrophil count"));
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    classifier: Box<dyn Classifier>,
}

impl Pipeline {
    /// Creates a pipeline with the rule-based classifier over `vocabulary`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or selects the
    /// predictor backend (use [`Pipeline::with_classifier`] for that).
    pub fn new(config: PipelineConfig, vocabulary: Arc<Vocabulary>) -> Result<Self> {
        config.validate()?;
        match config.backend {
            ClassifierBackend::Rules => {
                let classifier = RuleClassifier::from_config(vocabulary, &config);
                Ok(Self {
                    config,
                    classifier: Box::new(classifier),
                })
            }
            ClassifierBackend::Predictor => Err(LabcatError::InvalidConfig(
                "the predictor backend needs a classifier; use Pipeline::with_classifier"
                    .to_string(),
            )),
        }
    }

    /// Creates a pipeline around any classifier backend
    pub fn with_classifier<C>(config: PipelineConfig, classifier: C) -> Result<Self>
    where
        C: Classifier + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            classifier: Box::new(classifier),
        })
    }

    /// Creates a pipeline with the default config and bundled vocabulary
    pub fn builtin() -> Result<Self> {
        Self::new(PipelineConfig::default(), Arc::new(Vocabulary::builtin()?))
    }

    /// Configuration of this pipeline
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes report text into a report
    pub fn process(&self, raw: &str) -> Report {
        self.process_with_stats(raw).0
    }

    /// Processes report text, also returning per-stage counters
    pub fn process_with_stats(&self, raw: &str) -> (Report, PipelineStats) {
        let parallel = self.config.parallel;
        let mut stats = PipelineStats::default();
        info!("Starting lab report processing");

        let chunks = segment_chunks(raw);
        stats.chunks = chunks.len();

        let mode = self.config.header_mode;
        let outcomes: Vec<ParseOutcome> = if parallel {
            chunks.par_iter().map(|c| parse_chunk(c, mode)).collect()
        } else {
            chunks.iter().map(|c| parse_chunk(c, mode)).collect()
        };
        stats.tables_discarded = outcomes.iter().filter(|o| o.is_discarded()).count();
        stats.tables_kept = outcomes.len() - stats.tables_discarded;

        let rows = bundle_chunks(outcomes);
        stats.rows_bundled = rows.len();

        let labels: Vec<String> = rows.iter().map(|row| row.test.clone()).collect();
        let classified = canonicalize(&*self.classifier, &labels, parallel);
        stats.labels_classified = classified.len();
        stats.labels_unknown = classified.values().filter(|c| c.is_unknown()).count();

        let records = filter_records(rows, &classified);
        stats.rows_kept = records.len();

        let normalized: Vec<NormalizedRow> = if parallel {
            records.par_iter().filter_map(normalize_row).collect()
        } else {
            records.iter().filter_map(normalize_row).collect()
        };
        stats.rows_normalized = normalized.len();

        let (report, derived) = assemble_report(normalized);
        stats.derived_tests = derived;

        info!("Lab report processing completed: {} tests", report.len());
        (report, stats)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Per-stage counters of one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Chunks found by segmentation
    pub chunks: usize,

    /// Chunks that produced a table
    pub tables_kept: usize,

    /// Chunks discarded as empty or irrelevant
    pub tables_discarded: usize,

    /// Rows after bundling
    pub rows_bundled: usize,

    /// Distinct labels sent to the classifier
    pub labels_classified: usize,

    /// Distinct labels classified as Unknown
    pub labels_unknown: usize,

    /// Rows kept by the record filter
    pub rows_kept: usize,

    /// Rows with a parseable numeric result
    pub rows_normalized: usize,

    /// Derived tests added to the report
    pub derived_tests: usize,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Statistics")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Chunks:            {}", self.chunks)?;
        writeln!(f, "Tables Kept:       {}", self.tables_kept)?;
        writeln!(f, "Tables Discarded:  {}", self.tables_discarded)?;
        writeln!(f, "Rows Bundled:      {}", self.rows_bundled)?;
        writeln!(f, "Labels Classified: {}", self.labels_classified)?;
        writeln!(f, "Labels Unknown:    {}", self.labels_unknown)?;
        writeln!(f, "Rows Kept:         {}", self.rows_kept)?;
        writeln!(f, "Rows Normalized:   {}", self.rows_normalized)?;
        write!(f, "Derived Tests:     {}", self.derived_tests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::PredictorClassifier;
    use crate::types::{HeaderMode, ReferenceRange};

    const SAMPLE_REPORT: &str = "\
# **Clinical Analysis Lab**

## **Medical Lab Technical Result Sheet**

### **Lab Details**
- **Reg No.:** -
- **NAME:** -
- **SEX:** Male
- **DATE:** 23/11/2024

---

## **COMPLETE BLOOD COUNT**

| TEST                   | RESULT         | UNIT          | REFERENCE RANGE     |
|------------------------|---------------|--------------|---------------------|
| Haemoglobin           | 11.3          | gm/dl        | 14 - 18             |
| R.B.C. Count          | 3.82          | mil./cu.mm   | 4.5 - 6.5           |
| Total WBC Count       | 3.83x10^3     | /µL         | 4 - 10              |
| Platelets            | 246000        | /cmm        | 150000 - 450000     |

---

## **RED CELL ABSOLUTE VALUES**

| TEST                              | RESULT  | UNIT          | REFERENCE RANGE |
|-----------------------------------|--------|--------------|-----------------|
| Packed Cell Volume               | 32.7   | %            | 40 - 54         |
| Mean Corpuscular Volume          | 85.6   | cubic micron | 76 - 96         |
| Mean Corpuscular Hemoglobin      | 29.5   | picograms    | 27 - 32         |
| Mean corpuscular Hb Con.         | 34.5   | g/dl         | 32 - 36         |

---

## **DIFFERENTIAL COUNT**

| TEST          | RESULT | UNIT | REFERENCE RANGE |
|--------------|--------|------|-----------------|
| Neutrophils  | 52     | %    | -               |
| Lymphocytes  | 39     | %    | -               |
| Eosinophil   | 01     | %    | -               |
| Monocytes    | 08     | %    | -               |
| Basophils    | 00     | %    | -               |

---

## **PERIPHERAL SMEAR EXAMINATION**

| TEST          | RESULT                     | UNIT | REFERENCE RANGE |
|--------------|---------------------------|------|-----------------|
| Erythrocytes | Normocytic Normochromic   | -    | -               |
| Leukocytes   | Normal morphology         | -    | -               |

---

### **NOTE:**
The above results are subject to variations due to technical limitations.
";

    const DIFFERENTIAL_REPORT: &str = "\
| TEST | RESULT | UNIT | REFERENCE RANGE |
|------|--------|------|-----------------|
| Total leukocyte count | 3.83x10^3 | /µL | 4 - 10 |
| Neutrophils | 52 | % | - |
| Lymphocytes | 39 | % | - |
";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_sample_report_keeps_only_known_tests() {
        let pipeline = Pipeline::builtin().unwrap();
        let (report, stats) = pipeline.process_with_stats(SAMPLE_REPORT);

        let categories: Vec<_> = report.categories().collect();
        assert_eq!(
            categories,
            vec!["Haemoglobin", "Lymphocyte %", "Neutrophil %", "Platelets"]
        );

        let hb = report.get("Haemoglobin").unwrap();
        assert_eq!(hb.result, 11.3);
        assert_eq!(hb.unit.as_deref(), Some("gm/dl"));
        assert_eq!(hb.reference_range, Some(ReferenceRange::new(14.0, 18.0)));

        let platelets = report.get("Platelets").unwrap();
        assert_eq!(platelets.result, 246000.0);
        assert_eq!(
            platelets.reference_range,
            Some(ReferenceRange::new(150000.0, 450000.0))
        );

        let neutrophils = report.get("Neutrophil %").unwrap();
        assert_eq!(neutrophils.result, 52.0);
        assert_eq!(neutrophils.reference_range, None);

        assert_eq!(stats.chunks, 4);
        assert_eq!(stats.tables_kept, 4);
        assert_eq!(stats.tables_discarded, 0);
        assert_eq!(stats.rows_bundled, 15);
        assert_eq!(stats.rows_kept, 4);
        assert_eq!(stats.derived_tests, 0);
    }

    #[test]
    fn test_multiplier_and_derived_tests() {
        let pipeline = Pipeline::builtin().unwrap();
        let report = pipeline.process(DIFFERENTIAL_REPORT);

        let wbc = report.get("WBC count").unwrap();
        assert!(approx(wbc.result, 3830.0));
        assert_eq!(wbc.unit.as_deref(), Some("/µL"));
        assert_eq!(
            wbc.reference_range,
            Some(ReferenceRange::new(4000.0, 10000.0))
        );

        let anc = report.get("Absolute Neutrophil count").unwrap();
        assert!(approx(anc.result, 1991.6));
        assert_eq!(anc.unit.as_deref(), Some("/µL"));
        assert_eq!(anc.reference_range, None);

        let alc = report.get("Absolute Lymphocyte count").unwrap();
        assert!(approx(alc.result, 1493.7));
    }

    #[test]
    fn test_processing_is_idempotent() {
        let pipeline = Pipeline::builtin().unwrap();
        let first = serde_json::to_string(&pipeline.process(SAMPLE_REPORT)).unwrap();
        let second = serde_json::to_string(&pipeline.process(SAMPLE_REPORT)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let vocabulary = Arc::new(Vocabulary::builtin().unwrap());
        let parallel = Pipeline::new(PipelineConfig::default(), vocabulary.clone()).unwrap();
        let sequential =
            Pipeline::new(PipelineConfig::default().parallel(false), vocabulary).unwrap();
        assert!(parallel.config().parallel);
        assert!(!sequential.config().parallel);

        assert_eq!(
            parallel.process(SAMPLE_REPORT),
            sequential.process(SAMPLE_REPORT)
        );
        assert_eq!(
            parallel.process(DIFFERENTIAL_REPORT),
            sequential.process(DIFFERENTIAL_REPORT)
        );
    }

    #[test]
    fn test_empty_and_table_free_input() {
        let pipeline = Pipeline::builtin().unwrap();
        assert!(pipeline.process("").is_empty());

        let (report, stats) = pipeline.process_with_stats("Just a note.\nNo tables here.");
        assert!(report.is_empty());
        assert_eq!(stats, PipelineStats::default());
    }

    #[test]
    fn test_detect_header_mode_keeps_first_row() {
        let text = "| Haemoglobin | 11.3 | gm/dl | 14 - 18 |\n| Platelets | 246000 | /cmm | - |";
        let vocabulary = Arc::new(Vocabulary::builtin().unwrap());

        let fixed = Pipeline::new(PipelineConfig::default(), vocabulary.clone()).unwrap();
        assert!(fixed.process(text).is_empty());

        let detect = Pipeline::new(
            PipelineConfig::default().header_mode(HeaderMode::Detect),
            vocabulary,
        )
        .unwrap();
        let report = detect.process(text);
        assert!(!report.contains("Haemoglobin"));
        assert!(report.contains("Platelets"));
    }

    #[test]
    fn test_predictor_backend() {
        let vocabulary = Arc::new(Vocabulary::builtin().unwrap());
        let predict = |label: &str| {
            if label.to_lowercase().contains("leuko") {
                "WBC count".to_string()
            } else {
                "Unknown".to_string()
            }
        };
        let classifier = PredictorClassifier::new(predict, vocabulary);
        let pipeline = Pipeline::with_classifier(
            PipelineConfig::default().backend(ClassifierBackend::Predictor),
            classifier,
        )
        .unwrap();

        let report = pipeline.process(DIFFERENTIAL_REPORT);
        assert_eq!(report.len(), 1);
        assert!(report.contains("WBC count"));
    }

    #[test]
    fn test_case_variants_share_one_category() {
        let vocabulary = Arc::new(Vocabulary::builtin().unwrap());
        let text = "| TEST | RESULT | UNIT | REFERENCE RANGE |\n\
                    |---|---|---|---|\n\
                    | Hb | 11 | g/dl | - |\n\
                    | HB | 12 | g/dl | - |";

        let mut reports = Vec::new();
        for _ in 0..20 {
            let predict = |label: &str| {
                if label == "Hb" {
                    "Haemoglobin".to_string()
                } else {
                    "Platelets".to_string()
                }
            };
            let classifier = PredictorClassifier::new(predict, vocabulary.clone());
            let pipeline =
                Pipeline::with_classifier(PipelineConfig::default(), classifier).unwrap();
            reports.push(pipeline.process(text));
        }

        assert!(reports.windows(2).all(|pair| pair[0] == pair[1]));
        let report = &reports[0];
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("Platelets").unwrap().result, 12.0);
    }

    #[test]
    fn test_predictor_backend_requires_classifier() {
        let vocabulary = Arc::new(Vocabulary::builtin().unwrap());
        let config = PipelineConfig::default().backend(ClassifierBackend::Predictor);
        assert!(matches!(
            Pipeline::new(config, vocabulary),
            Err(LabcatError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let vocabulary = Arc::new(Vocabulary::builtin().unwrap());
        let config = PipelineConfig::default().fuzzy_threshold(150);
        assert!(Pipeline::new(config, vocabulary).is_err());
    }

    #[test]
    fn test_stats_display() {
        let pipeline = Pipeline::builtin().unwrap();
        let (_, stats) = pipeline.process_with_stats(DIFFERENTIAL_REPORT);
        let output = stats.to_string();
        assert!(output.contains("Chunks:            1"));
        assert!(output.contains("Derived Tests:     2"));
    }
}
